//! Service layer - business logic.

mod auth_service;
mod booking_service;
mod container;
mod event_service;
pub mod ticket;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use booking_service::{BookingService, BookingWorkflow};
pub use container::Services;
pub use event_service::{EventCatalog, EventService, PublicEventResponse};
pub use ticket::{PdfTicketRenderer, Ticket, TicketRenderer};
pub use user_service::{UserManager, UserService};
