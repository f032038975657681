//! Store tests against a migrated in-memory SQLite database.
//!
//! These run the real conditional `UPDATE`s that keep the confirmed counter
//! within `0..=capacity` and reject stale status transitions.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use booking_service_lib::infra::Database;
use booking_service_lib::repository::{
    BookingRepository, BookingStore, EventRepository, EventStore, UserRepository, UserStore,
};
use common::{AppError, DatabaseConfig};
use domain::{
    Booking, BookingStatus, Event, EventChanges, EventStatus, NewEvent, SeatChange,
    StatusTransition, UserRole,
};

struct Stores {
    users: UserStore,
    events: EventStore,
    bookings: BookingStore,
}

async fn connect() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    Database::connect(&config).await.unwrap().get_connection()
}

async fn stores() -> Stores {
    let db = connect().await;
    Stores {
        users: UserStore::new(db.clone()),
        events: EventStore::new(db.clone()),
        bookings: BookingStore::new(db),
    }
}

impl Stores {
    async fn event(&self, capacity: i32) -> Event {
        let organizer = self
            .users
            .create(
                format!("admin-{}@example.com", uuid::Uuid::new_v4()),
                "hash".into(),
                UserRole::Admin,
            )
            .await
            .unwrap();

        self.events
            .create(NewEvent {
                title: "Rust Meetup".into(),
                description: "Monthly meetup".into(),
                date: Utc::now() + Duration::days(30),
                location: "Grand Hall".into(),
                capacity,
                status: EventStatus::Published,
                organizer_id: organizer.id,
            })
            .await
            .unwrap()
    }

    async fn booking(&self, event: &Event) -> Booking {
        let participant = self
            .users
            .create(
                format!("p-{}@example.com", uuid::Uuid::new_v4()),
                "hash".into(),
                UserRole::Participant,
            )
            .await
            .unwrap();

        self.bookings.create(event.id, participant.id).await.unwrap()
    }

    async fn confirmed_count(&self, event: &Event) -> i32 {
        self.events
            .find_by_id(event.id)
            .await
            .unwrap()
            .unwrap()
            .confirmed_count
    }

    async fn status(&self, booking: &Booking) -> BookingStatus {
        self.bookings
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap()
            .status
    }
}

// =============================================================================
// Seat accounting
// =============================================================================

#[tokio::test]
async fn test_confirm_claims_seat_and_cancel_returns_it() {
    let s = stores().await;
    let event = s.event(2).await;
    let booking = s.booking(&event).await;

    let confirmed = s
        .bookings
        .apply_transition(booking.transition_to(BookingStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(s.confirmed_count(&event).await, 1);

    let canceled = s
        .bookings
        .apply_transition(confirmed.cancel_by(booking.participant_id).unwrap())
        .await
        .unwrap();
    assert_eq!(canceled.status, BookingStatus::Canceled);
    assert_eq!(s.confirmed_count(&event).await, 0);
}

#[tokio::test]
async fn test_claim_on_full_event_is_rejected_and_rolled_back() {
    let s = stores().await;
    let event = s.event(1).await;
    let first = s.booking(&event).await;
    let second = s.booking(&event).await;

    s.bookings
        .apply_transition(first.transition_to(BookingStatus::Confirmed))
        .await
        .unwrap();
    let result = s
        .bookings
        .apply_transition(second.transition_to(BookingStatus::Confirmed))
        .await;

    assert!(matches!(result, Err(AppError::CapacityExceeded)));
    assert_eq!(s.status(&second).await, BookingStatus::Pending);
    assert_eq!(s.confirmed_count(&event).await, 1);
}

#[tokio::test]
async fn test_stale_transition_is_conflict() {
    let s = stores().await;
    let event = s.event(5).await;
    let booking = s.booking(&event).await;
    let confirm = booking.transition_to(BookingStatus::Confirmed);

    s.bookings.apply_transition(confirm).await.unwrap();
    let replay = s.bookings.apply_transition(confirm).await;

    assert!(matches!(replay, Err(AppError::Conflict(_))));
    assert_eq!(s.confirmed_count(&event).await, 1);
}

#[tokio::test]
async fn test_release_never_drops_counter_below_zero() {
    let s = stores().await;
    let event = s.event(3).await;
    let booking = s.booking(&event).await;

    // Confirmed without a claimed seat
    let confirmed = s
        .bookings
        .apply_transition(StatusTransition {
            seats: SeatChange::Keep,
            ..booking.transition_to(BookingStatus::Confirmed)
        })
        .await
        .unwrap();
    assert_eq!(s.confirmed_count(&event).await, 0);

    let refused = s
        .bookings
        .apply_transition(confirmed.transition_to(BookingStatus::Refused))
        .await
        .unwrap();

    assert_eq!(refused.status, BookingStatus::Refused);
    assert_eq!(s.confirmed_count(&event).await, 0);
}

// =============================================================================
// Bookings and events
// =============================================================================

#[tokio::test]
async fn test_second_booking_for_same_event_is_conflict() {
    let s = stores().await;
    let event = s.event(5).await;
    let booking = s.booking(&event).await;

    let result = s.bookings.create(event.id, booking.participant_id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_capacity_cannot_drop_below_confirmed_count() {
    let s = stores().await;
    let event = s.event(2).await;
    for _ in 0..2 {
        let booking = s.booking(&event).await;
        s.bookings
            .apply_transition(booking.transition_to(BookingStatus::Confirmed))
            .await
            .unwrap();
    }

    let shrink = EventChanges {
        capacity: Some(1),
        title: Some("Smaller room".into()),
        ..Default::default()
    };
    let result = s.events.update(event.id, shrink).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let unchanged = s.events.find_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(unchanged.capacity, 2);
    assert_eq!(unchanged.title, "Rust Meetup");

    let grown = s
        .events
        .update(
            event.id,
            EventChanges {
                capacity: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(grown.capacity, 3);
    assert_eq!(grown.confirmed_count, 2);
}

#[tokio::test]
async fn test_update_of_unknown_event_is_not_found() {
    let s = stores().await;
    let changes = EventChanges {
        capacity: Some(10),
        ..Default::default()
    };

    let result = s.events.update(uuid::Uuid::new_v4(), changes).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_deleting_event_removes_its_bookings() {
    let s = stores().await;
    let event = s.event(5).await;
    let booking = s.booking(&event).await;

    s.events.delete(event.id).await.unwrap();

    assert!(s.bookings.find_by_id(booking.id).await.unwrap().is_none());
    assert!(matches!(
        s.events.delete(event.id).await,
        Err(AppError::NotFound)
    ));
}
