//! Booking domain entity and its status machine.
//!
//! Every status change, administrative or participant-initiated, is described
//! by a [`StatusTransition`] whose [`SeatChange`] tells the store how to move
//! the event's confirmed counter. Nothing else writes a booking status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::event::{Event, EventResponse};
use crate::user::{User, UserResponse};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    #[serde(alias = "REJECTED")]
    Refused,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Refused => "REFUSED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// Whether a booking in this status occupies a seat
    pub fn holds_seat(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "REFUSED" | "REJECTED" => Ok(BookingStatus::Refused),
            "CANCELED" => Ok(BookingStatus::Canceled),
            other => Err(DomainError::validation(format!(
                "Unknown booking status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect of a status transition on the event's confirmed counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatChange {
    /// Take one seat; must fail if none remain
    Claim,
    /// Give one seat back
    Release,
    Keep,
}

impl SeatChange {
    pub fn between(from: BookingStatus, to: BookingStatus) -> Self {
        match (from.holds_seat(), to.holds_seat()) {
            (false, true) => SeatChange::Claim,
            (true, false) => SeatChange::Release,
            _ => SeatChange::Keep,
        }
    }
}

/// A fully described status change, applied atomically by the store.
///
/// The store must only apply it while the booking is still in `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub booking_id: Uuid,
    pub event_id: Uuid,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub seats: SeatChange,
}

impl StatusTransition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Booking domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.participant_id == user_id
    }

    /// Describe an administrative move to `to`. Any target is accepted.
    pub fn transition_to(&self, to: BookingStatus) -> StatusTransition {
        StatusTransition {
            booking_id: self.id,
            event_id: self.event_id,
            from: self.status,
            to,
            seats: SeatChange::between(self.status, to),
        }
    }

    /// Describe a cancellation requested by `requester_id`.
    ///
    /// # Errors
    /// `Forbidden` when the requester does not own the booking (checked
    /// before anything else), `Validation` when the booking was refused.
    pub fn cancel_by(&self, requester_id: Uuid) -> DomainResult<StatusTransition> {
        if !self.is_owned_by(requester_id) {
            return Err(DomainError::Forbidden);
        }
        if self.status == BookingStatus::Refused {
            return Err(DomainError::validation(
                "A refused booking cannot be canceled",
            ));
        }
        Ok(self.transition_to(BookingStatus::Canceled))
    }
}

/// Booking joined with its event and participant, as needed for tickets
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub event: Event,
    pub participant: User,
}

/// Booking response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            event_id: booking.event_id,
            participant_id: booking.participant_id,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

/// A participant's booking with its event attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingWithEvent {
    pub id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event: EventResponse,
}

impl BookingWithEvent {
    pub fn new(booking: Booking, event: &Event) -> Self {
        Self {
            id: booking.id,
            status: booking.status,
            created_at: booking.created_at,
            event: EventResponse::from(event),
        }
    }
}

/// An event's booking with its participant attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingWithParticipant {
    pub id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub participant: UserResponse,
}

impl BookingWithParticipant {
    pub fn new(booking: Booking, participant: &User) -> Self {
        Self {
            id: booking.id,
            status: booking.status,
            created_at: booking.created_at,
            participant: UserResponse::from(participant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Refused,
        BookingStatus::Canceled,
    ];

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_seat_change_only_on_confirmed_boundary() {
        for from in ALL {
            for to in ALL {
                let expected = match (from, to) {
                    (f, BookingStatus::Confirmed) if f != BookingStatus::Confirmed => {
                        SeatChange::Claim
                    }
                    (BookingStatus::Confirmed, t) if t != BookingStatus::Confirmed => {
                        SeatChange::Release
                    }
                    _ => SeatChange::Keep,
                };
                assert_eq!(SeatChange::between(from, to), expected, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_confirm_then_refuse_is_balanced() {
        let pending = booking(BookingStatus::Pending);
        let confirm = pending.transition_to(BookingStatus::Confirmed);
        let confirmed = Booking {
            status: confirm.to,
            ..pending
        };
        let refuse = confirmed.transition_to(BookingStatus::Refused);

        assert_eq!(confirm.seats, SeatChange::Claim);
        assert_eq!(refuse.seats, SeatChange::Release);
    }

    #[test]
    fn test_cancel_by_non_owner_is_forbidden_for_every_status() {
        for status in ALL {
            let b = booking(status);
            assert_eq!(b.cancel_by(Uuid::new_v4()), Err(DomainError::Forbidden));
        }
    }

    #[test]
    fn test_cancel_confirmed_releases_seat() {
        let b = booking(BookingStatus::Confirmed);
        let t = b.cancel_by(b.participant_id).unwrap();
        assert_eq!(t.to, BookingStatus::Canceled);
        assert_eq!(t.seats, SeatChange::Release);
    }

    #[test]
    fn test_cancel_twice_is_noop() {
        let b = booking(BookingStatus::Canceled);
        let t = b.cancel_by(b.participant_id).unwrap();
        assert!(t.is_noop());
        assert_eq!(t.seats, SeatChange::Keep);
    }

    #[test]
    fn test_refused_booking_cannot_be_canceled() {
        let b = booking(BookingStatus::Refused);
        assert!(matches!(
            b.cancel_by(b.participant_id),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_status_accepts_rejected_alias() {
        assert_eq!("REJECTED".parse::<BookingStatus>(), Ok(BookingStatus::Refused));
        let parsed: BookingStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(parsed, BookingStatus::Refused);
    }
}
