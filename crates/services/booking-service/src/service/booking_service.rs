//! Booking workflow - creation, status transitions and tickets.
//!
//! Administrative status updates and participant cancellations both end in
//! [`BookingWorkflow::transition`], which hands a fully described
//! [`StatusTransition`] to the store. Seat accounting therefore follows the
//! same rule whichever route triggered the change.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    authorize, Action, Actor, Booking, BookingStatus, BookingWithEvent, BookingWithParticipant,
    DomainError, Resource, SeatChange, StatusTransition,
};

use super::ticket::{ticket_filename, Ticket, TicketRenderer};
use crate::repository::{BookingRepository, EventRepository};

/// Booking service trait for dependency injection.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Open a PENDING booking for the calling participant
    async fn create_booking(&self, actor: &Actor, event_id: Uuid) -> AppResult<Booking>;

    /// Administrative move to any status
    async fn update_status(
        &self,
        actor: &Actor,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking>;

    /// Owner cancellation; a confirmed seat is released
    async fn cancel_booking(&self, actor: &Actor, booking_id: Uuid) -> AppResult<Booking>;

    /// Bookings of an event with participants, newest first
    async fn find_by_event(
        &self,
        actor: &Actor,
        event_id: Uuid,
    ) -> AppResult<Vec<BookingWithParticipant>>;

    /// The caller's bookings with events, newest first
    async fn find_my_bookings(&self, actor: &Actor) -> AppResult<Vec<BookingWithEvent>>;

    /// Render the PDF ticket of a confirmed booking.
    ///
    /// Unknown booking is `NotFound`; a stranger's booking and a booking
    /// that is not CONFIRMED are both `BadRequest`.
    async fn ticket(&self, actor: &Actor, booking_id: Uuid) -> AppResult<Ticket>;
}

/// Concrete implementation of BookingService.
pub struct BookingWorkflow {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
    renderer: Arc<dyn TicketRenderer>,
}

impl BookingWorkflow {
    pub fn new(
        events: Arc<dyn EventRepository>,
        bookings: Arc<dyn BookingRepository>,
        renderer: Arc<dyn TicketRenderer>,
    ) -> Self {
        Self {
            events,
            bookings,
            renderer,
        }
    }

    async fn find_booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.bookings.find_by_id(booking_id).await?.ok_or_not_found()
    }

    /// Apply a status change and its seat movement as one unit.
    async fn transition(
        &self,
        booking: Booking,
        transition: StatusTransition,
    ) -> AppResult<Booking> {
        if transition.is_noop() {
            return Ok(booking);
        }

        let updated = match self.bookings.apply_transition(transition).await {
            Err(AppError::CapacityExceeded) => {
                tracing::warn!(
                    booking_id = %transition.booking_id,
                    event_id = %transition.event_id,
                    "Confirmation blocked, no seats left"
                );
                return Err(AppError::CapacityExceeded);
            }
            other => other?,
        };

        match transition.seats {
            SeatChange::Claim => {
                tracing::info!(event_id = %transition.event_id, "Seat claimed")
            }
            SeatChange::Release => {
                tracing::info!(event_id = %transition.event_id, "Seat released")
            }
            SeatChange::Keep => {}
        }
        tracing::info!(
            booking_id = %updated.id,
            from = %transition.from,
            to = %transition.to,
            "Booking status changed"
        );

        Ok(updated)
    }
}

#[async_trait]
impl BookingService for BookingWorkflow {
    async fn create_booking(&self, actor: &Actor, event_id: Uuid) -> AppResult<Booking> {
        authorize(actor, Action::BookEvent, Resource::Any)?;

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventUnavailable)?;

        if let Err(e) = event.ensure_bookable() {
            if e == DomainError::CapacityExceeded {
                tracing::warn!(%event_id, "Booking rejected, event is full");
            }
            return Err(e.into());
        }

        if self
            .bookings
            .find_by_event_and_participant(event_id, actor.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Booking"));
        }

        let booking = self.bookings.create(event_id, actor.id).await?;
        tracing::info!(
            booking_id = %booking.id,
            %event_id,
            participant_id = %actor.id,
            "Booking created"
        );
        Ok(booking)
    }

    async fn update_status(
        &self,
        actor: &Actor,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        authorize(actor, Action::UpdateBookingStatus, Resource::Any)?;

        let booking = self.find_booking(booking_id).await?;
        let transition = booking.transition_to(status);
        self.transition(booking, transition).await
    }

    async fn cancel_booking(&self, actor: &Actor, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.find_booking(booking_id).await?;
        authorize(
            actor,
            Action::CancelBooking,
            Resource::OwnedBy(booking.participant_id),
        )?;

        let transition = booking.cancel_by(actor.id)?;
        self.transition(booking, transition).await
    }

    async fn find_by_event(
        &self,
        actor: &Actor,
        event_id: Uuid,
    ) -> AppResult<Vec<BookingWithParticipant>> {
        authorize(actor, Action::ViewEventBookings, Resource::Any)?;

        self.events.find_by_id(event_id).await?.ok_or_not_found()?;
        self.bookings.find_by_event_with_participants(event_id).await
    }

    async fn find_my_bookings(&self, actor: &Actor) -> AppResult<Vec<BookingWithEvent>> {
        authorize(actor, Action::ViewOwnBookings, Resource::Any)?;
        self.bookings.find_by_participant_with_events(actor.id).await
    }

    async fn ticket(&self, actor: &Actor, booking_id: Uuid) -> AppResult<Ticket> {
        let details = self
            .bookings
            .find_details(booking_id)
            .await?
            .ok_or_not_found()?;

        authorize(
            actor,
            Action::DownloadTicket,
            Resource::OwnedBy(details.booking.participant_id),
        )
        .map_err(|_| AppError::bad_request("You can only download your own tickets"))?;

        if details.booking.status != BookingStatus::Confirmed {
            return Err(AppError::bad_request(
                "Tickets are only available for confirmed bookings",
            ));
        }

        let content = self.renderer.render(&details)?;
        Ok(Ticket {
            filename: ticket_filename(&details),
            content,
        })
    }
}
