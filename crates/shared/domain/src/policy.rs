//! Role and ownership based access rules.

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::user::UserRole;

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateEvent,
    UpdateEvent,
    PublishEvent,
    DeleteEvent,
    BookEvent,
    ViewEventBookings,
    UpdateBookingStatus,
    CancelBooking,
    DownloadTicket,
    ViewOwnBookings,
}

/// What the action targets, as far as ownership matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Any,
    OwnedBy(Uuid),
}

impl Resource {
    fn is_owned_by(&self, actor: &Actor) -> bool {
        matches!(self, Resource::OwnedBy(owner) if *owner == actor.id)
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
///
/// # Errors
/// `Forbidden` on denial.
pub fn authorize(actor: &Actor, action: Action, resource: Resource) -> DomainResult<()> {
    let allowed = match action {
        Action::CreateEvent
        | Action::UpdateEvent
        | Action::PublishEvent
        | Action::DeleteEvent
        | Action::ViewEventBookings
        | Action::UpdateBookingStatus => actor.is_admin(),
        Action::BookEvent => actor.role.is_participant(),
        Action::CancelBooking => resource.is_owned_by(actor),
        Action::DownloadTicket => actor.is_admin() || resource.is_owned_by(actor),
        Action::ViewOwnBookings => true,
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
