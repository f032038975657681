//! Shared fixtures for integration tests.
//!
//! `InMemoryStore` implements every repository trait over one mutex, so each
//! call is atomic the way the SQL store's conditional updates are.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use booking_service_lib::repository::{BookingRepository, EventRepository, UserRepository};
use booking_service_lib::service::Services;
use common::{AppError, AppResult, JwtConfig};
use domain::{
    Actor, Booking, BookingDetails, BookingStatus, BookingWithEvent, BookingWithParticipant,
    Event, EventChanges, EventStatus, NewEvent, SeatChange, StatusTransition, User,
    UserRole,
};

pub const TEST_PASSWORD: &str = "password123";

pub fn jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-testing-only-32chars".to_string(),
        expiration_hours: 24,
    }
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    bookings: HashMap<Uuid, Booking>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn services(self: &Arc<Self>) -> Services {
        Services::new(self.clone(), self.clone(), self.clone(), jwt())
    }

    /// Insert a user directly, bypassing registration
    pub fn seed_user(&self, role: UserRole) -> Actor {
        let id = Uuid::new_v4();
        let user = User {
            id,
            email: format!("{}@example.com", id.simple()),
            password_hash: "not-a-real-hash".to_string(),
            role,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().users.insert(id, user);
        Actor::new(id, role)
    }

    /// Insert an event directly with no confirmed seats
    pub fn seed_event(&self, capacity: i32, status: EventStatus) -> Event {
        let event = Event {
            id: Uuid::new_v4(),
            title: "RustConf".to_string(),
            description: "Talks and workshops".to_string(),
            date: Utc::now() + Duration::days(30),
            location: "Grand Hall".to_string(),
            capacity,
            confirmed_count: 0,
            status,
            organizer_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .events
            .insert(event.id, event.clone());
        event
    }

    pub fn event(&self, id: Uuid) -> Event {
        self.tables.lock().unwrap().events[&id].clone()
    }

    pub fn booking(&self, id: Uuid) -> Booking {
        self.tables.lock().unwrap().bookings[&id].clone()
    }

    /// Confirmed bookings actually stored for an event
    pub fn confirmed_bookings(&self, event_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.event_id == event_id && b.status == BookingStatus::Confirmed)
            .count()
    }
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookings
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, email: String, password_hash: String, role: UserRole) -> AppResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.email == email) {
            return Err(AppError::conflict("Email"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn create(&self, new_event: NewEvent) -> AppResult<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            title: new_event.title,
            description: new_event.description,
            date: new_event.date,
            location: new_event.location,
            capacity: new_event.capacity,
            confirmed_count: 0,
            status: new_event.status,
            organizer_id: new_event.organizer_id,
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .events
            .insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.tables.lock().unwrap().events.get(&id).cloned())
    }

    async fn list(&self, status: Option<EventStatus>) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .tables
            .lock()
            .unwrap()
            .events
            .values()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn list_published(&self) -> AppResult<Vec<Event>> {
        self.list(Some(EventStatus::Published)).await
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> AppResult<Event> {
        let mut tables = self.tables.lock().unwrap();
        let event = tables.events.get_mut(&id).ok_or(AppError::NotFound)?;
        if let Some(capacity) = changes.capacity {
            if capacity < event.confirmed_count {
                return Err(AppError::validation(
                    "Capacity cannot be lower than the number of confirmed bookings",
                ));
            }
        }
        event.apply(&changes);
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.events.remove(&id).ok_or(AppError::NotFound)?;
        tables.bookings.retain(|_, b| b.event_id != id);
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, event_id: Uuid, participant_id: Uuid) -> AppResult<Booking> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .bookings
            .values()
            .any(|b| b.event_id == event_id && b.participant_id == participant_id)
        {
            return Err(AppError::conflict("Booking"));
        }
        let booking = Booking {
            id: Uuid::new_v4(),
            event_id,
            participant_id,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.tables.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn find_by_event_and_participant(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
    ) -> AppResult<Option<Booking>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .bookings
            .values()
            .find(|b| b.event_id == event_id && b.participant_id == participant_id)
            .cloned())
    }

    async fn find_by_participant(&self, participant_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = self
            .tables
            .lock()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.participant_id == participant_id)
            .cloned()
            .collect();
        Ok(newest_first(bookings))
    }

    async fn find_by_event_with_participants(
        &self,
        event_id: Uuid,
    ) -> AppResult<Vec<BookingWithParticipant>> {
        let tables = self.tables.lock().unwrap();
        let bookings = tables
            .bookings
            .values()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect();
        Ok(newest_first(bookings)
            .into_iter()
            .map(|b| {
                let participant = &tables.users[&b.participant_id];
                BookingWithParticipant::new(b, participant)
            })
            .collect())
    }

    async fn find_by_participant_with_events(
        &self,
        participant_id: Uuid,
    ) -> AppResult<Vec<BookingWithEvent>> {
        let bookings = self.find_by_participant(participant_id).await?;
        let tables = self.tables.lock().unwrap();
        Ok(bookings
            .into_iter()
            .map(|b| {
                let event = &tables.events[&b.event_id];
                BookingWithEvent::new(b, event)
            })
            .collect())
    }

    async fn find_details(&self, id: Uuid) -> AppResult<Option<BookingDetails>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.bookings.get(&id).map(|b| BookingDetails {
            booking: b.clone(),
            event: tables.events[&b.event_id].clone(),
            participant: tables.users[&b.participant_id].clone(),
        }))
    }

    async fn apply_transition(&self, transition: StatusTransition) -> AppResult<Booking> {
        let mut tables = self.tables.lock().unwrap();

        let current = tables
            .bookings
            .get(&transition.booking_id)
            .ok_or(AppError::NotFound)?
            .status;
        if current != transition.from {
            return Err(AppError::conflict("Booking status was changed concurrently"));
        }

        let event = tables
            .events
            .get_mut(&transition.event_id)
            .ok_or(AppError::NotFound)?;
        match transition.seats {
            SeatChange::Claim if event.confirmed_count >= event.capacity => {
                return Err(AppError::CapacityExceeded);
            }
            SeatChange::Claim => event.confirmed_count += 1,
            SeatChange::Release if event.confirmed_count > 0 => event.confirmed_count -= 1,
            SeatChange::Release | SeatChange::Keep => {}
        }

        let booking = tables
            .bookings
            .get_mut(&transition.booking_id)
            .ok_or(AppError::NotFound)?;
        booking.status = transition.to;
        Ok(booking.clone())
    }
}
