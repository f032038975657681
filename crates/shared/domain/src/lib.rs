//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users, events, bookings with their seat accounting, and the access policy.

pub mod booking;
pub mod constants;
pub mod error;
pub mod event;
pub mod password;
pub mod policy;
pub mod user;

pub use booking::{
    Booking, BookingDetails, BookingResponse, BookingStatus, BookingWithEvent,
    BookingWithParticipant, SeatChange, StatusTransition,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use event::{Event, EventChanges, EventResponse, EventStatus, NewEvent};
pub use password::Password;
pub use policy::{authorize, Action, Actor, Resource};
pub use user::{User, UserResponse, UserRole};
