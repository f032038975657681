//! Repository layer for data access.

mod booking_repository;
pub mod entities;
mod event_repository;
mod user_repository;

pub use booking_repository::{BookingRepository, BookingStore};
pub use event_repository::{EventRepository, EventStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use event_repository::MockEventRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
