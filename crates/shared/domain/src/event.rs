//! Event domain entity and seat counters.
//!
//! `capacity` is the total number of seats and is never touched by the
//! booking workflow. `confirmed_count` is the number of CONFIRMED bookings and
//! is only moved by booking status transitions, so remaining seats are always
//! `capacity - confirmed_count`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MIN_EVENT_CAPACITY;
use crate::error::{DomainError, DomainResult};

/// Publication state of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Canceled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Published => "PUBLISHED",
            EventStatus::Canceled => "CANCELED",
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(EventStatus::Draft),
            "PUBLISHED" => Ok(EventStatus::Published),
            "CANCELED" => Ok(EventStatus::Canceled),
            other => Err(DomainError::validation(format!(
                "Unknown event status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Total seats
    pub capacity: i32,
    /// Seats held by CONFIRMED bookings
    pub confirmed_count: i32,
    pub status: EventStatus,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn remaining_capacity(&self) -> i32 {
        (self.capacity - self.confirmed_count).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.confirmed_count >= self.capacity
    }

    pub fn is_published(&self) -> bool {
        self.status == EventStatus::Published
    }

    /// Check that a new booking may be opened against this event.
    ///
    /// # Errors
    /// `EventUnavailable` unless the event is published,
    /// `CapacityExceeded` when confirmed bookings already fill every seat.
    pub fn ensure_bookable(&self) -> DomainResult<()> {
        if !self.is_published() {
            return Err(DomainError::EventUnavailable);
        }
        if self.is_full() {
            return Err(DomainError::CapacityExceeded);
        }
        Ok(())
    }

    /// Check that the total capacity can be set to `capacity` without
    /// stranding confirmed bookings.
    pub fn ensure_capacity_change(&self, capacity: i32) -> DomainResult<()> {
        validate_capacity(capacity)?;
        if capacity < self.confirmed_count {
            return Err(DomainError::validation(format!(
                "Capacity cannot be lower than the {} confirmed bookings",
                self.confirmed_count
            )));
        }
        Ok(())
    }

    /// Apply a partial update in memory. Callers validate first.
    pub fn apply(&mut self, changes: &EventChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(location) = &changes.location {
            self.location = location.clone();
        }
        if let Some(capacity) = changes.capacity {
            self.capacity = capacity;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

fn validate_capacity(capacity: i32) -> DomainResult<()> {
    if capacity < MIN_EVENT_CAPACITY {
        return Err(DomainError::validation(format!(
            "Capacity must be at least {}",
            MIN_EVENT_CAPACITY
        )));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Data needed to create an event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub status: EventStatus,
    pub organizer_id: Uuid,
}

impl NewEvent {
    pub fn validate(&self) -> DomainResult<()> {
        validate_text("Title", &self.title)?;
        validate_text("Description", &self.description)?;
        validate_text("Location", &self.location)?;
        validate_capacity(self.capacity)
    }
}

/// Partial event update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
            && self.status.is_none()
    }

    /// Field-level checks that do not depend on the stored event
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            validate_text("Title", title)?;
        }
        if let Some(description) = &self.description {
            validate_text("Description", description)?;
        }
        if let Some(location) = &self.location {
            validate_text("Location", location)?;
        }
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        Ok(())
    }
}

/// Event response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Total seats
    pub capacity: i32,
    /// Seats held by confirmed bookings
    pub confirmed_count: i32,
    /// Seats still available for confirmation
    pub remaining_capacity: i32,
    pub status: EventStatus,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            capacity: event.capacity,
            confirmed_count: event.confirmed_count,
            remaining_capacity: event.remaining_capacity(),
            status: event.status,
            organizer_id: event.organizer_id,
            created_at: event.created_at,
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        EventResponse::from(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(capacity: i32, confirmed_count: i32, status: EventStatus) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Rust Meetup".into(),
            description: "Talks".into(),
            date: Utc::now(),
            location: "Lyon".into(),
            capacity,
            confirmed_count,
            status,
            organizer_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_remaining_capacity() {
        assert_eq!(event(5, 2, EventStatus::Published).remaining_capacity(), 3);
        assert_eq!(event(1, 1, EventStatus::Published).remaining_capacity(), 0);
    }

    #[test]
    fn test_draft_and_canceled_events_are_unavailable() {
        for status in [EventStatus::Draft, EventStatus::Canceled] {
            assert_eq!(
                event(10, 0, status).ensure_bookable(),
                Err(DomainError::EventUnavailable)
            );
        }
    }

    #[test]
    fn test_full_event_rejects_new_bookings() {
        assert_eq!(
            event(1, 1, EventStatus::Published).ensure_bookable(),
            Err(DomainError::CapacityExceeded)
        );
        assert!(event(2, 1, EventStatus::Published).ensure_bookable().is_ok());
    }

    #[test]
    fn test_capacity_cannot_drop_below_confirmed() {
        let e = event(10, 4, EventStatus::Published);
        assert!(e.ensure_capacity_change(4).is_ok());
        assert!(matches!(
            e.ensure_capacity_change(3),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            event(10, 0, EventStatus::Draft).ensure_capacity_change(0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_new_event_validation() {
        let mut new_event = NewEvent {
            title: "Conf".into(),
            description: "Desc".into(),
            date: Utc::now(),
            location: "Paris".into(),
            capacity: 1,
            status: EventStatus::Draft,
            organizer_id: Uuid::new_v4(),
        };
        assert!(new_event.validate().is_ok());

        new_event.capacity = 0;
        assert!(new_event.validate().is_err());

        new_event.capacity = 5;
        new_event.title = "   ".into();
        assert!(new_event.validate().is_err());
    }

    #[test]
    fn test_apply_changes() {
        let mut e = event(10, 0, EventStatus::Draft);
        e.apply(&EventChanges {
            title: Some("Renamed".into()),
            capacity: Some(20),
            ..Default::default()
        });
        assert_eq!(e.title, "Renamed");
        assert_eq!(e.capacity, 20);
        assert_eq!(e.location, "Lyon");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("PUBLISHED".parse::<EventStatus>(), Ok(EventStatus::Published));
        assert!("published".parse::<EventStatus>().is_err());
    }
}
