//! Booking repository implementation.
//!
//! Status changes are applied through [`BookingRepository::apply_transition`]
//! only. The booking row and the event's confirmed counter move together in
//! one transaction, each behind a conditional `UPDATE`:
//!
//! - the booking is updated only while it still has the expected status;
//! - a claimed seat is taken only while `confirmed_count < capacity`;
//! - a released seat is returned only while `confirmed_count > 0`.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use super::entities::event::{self, Entity as EventEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::infra::in_transaction;
use common::{map_unique_violation, AppError, AppResult, OptionExt};
use domain::{
    Booking, BookingDetails, BookingStatus, BookingWithEvent, BookingWithParticipant, Event,
    SeatChange, StatusTransition, User,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Booking repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a PENDING booking; an existing (event, participant) pair is a
    /// `Conflict`
    async fn create(&self, event_id: Uuid, participant_id: Uuid) -> AppResult<Booking>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    async fn find_by_event_and_participant(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
    ) -> AppResult<Option<Booking>>;

    /// Every booking of a participant, newest first
    async fn find_by_participant(&self, participant_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Bookings of an event with participants attached, newest first
    async fn find_by_event_with_participants(
        &self,
        event_id: Uuid,
    ) -> AppResult<Vec<BookingWithParticipant>>;

    /// Bookings of a participant with events attached, newest first
    async fn find_by_participant_with_events(
        &self,
        participant_id: Uuid,
    ) -> AppResult<Vec<BookingWithEvent>>;

    /// Booking with its event and participant
    async fn find_details(&self, id: Uuid) -> AppResult<Option<BookingDetails>>;

    /// Atomically move a booking from `transition.from` to `transition.to`
    /// and adjust the event's confirmed counter.
    ///
    /// # Errors
    /// `Conflict` when the booking no longer has status `from`,
    /// `CapacityExceeded` when a seat is claimed on a full event.
    async fn apply_transition(&self, transition: StatusTransition) -> AppResult<Booking>;
}

/// Concrete implementation of BookingRepository
pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_bookings(models: Vec<booking::Model>) -> AppResult<Vec<Booking>> {
    models.into_iter().map(Booking::try_from).collect()
}

async fn move_seat<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
    seats: SeatChange,
) -> AppResult<()> {
    match seats {
        SeatChange::Claim => {
            let result = EventEntity::update_many()
                .col_expr(
                    event::Column::ConfirmedCount,
                    Expr::col(event::Column::ConfirmedCount).add(1),
                )
                .filter(event::Column::Id.eq(event_id))
                .filter(
                    Expr::col(event::Column::ConfirmedCount)
                        .lt(Expr::col(event::Column::Capacity)),
                )
                .exec(conn)
                .await?;

            if result.rows_affected == 0 {
                return Err(AppError::CapacityExceeded);
            }
        }
        SeatChange::Release => {
            let result = EventEntity::update_many()
                .col_expr(
                    event::Column::ConfirmedCount,
                    Expr::col(event::Column::ConfirmedCount).sub(1),
                )
                .filter(event::Column::Id.eq(event_id))
                .filter(event::Column::ConfirmedCount.gt(0))
                .exec(conn)
                .await?;

            if result.rows_affected == 0 {
                tracing::warn!(%event_id, "Seat release found no confirmed seat to return");
            }
        }
        SeatChange::Keep => {}
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn create(&self, event_id: Uuid, participant_id: Uuid) -> AppResult<Booking> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event_id),
            participant_id: Set(participant_id),
            status: Set(BookingStatus::Pending.as_str().to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, "Booking"))?;
        Booking::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        BookingEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn find_by_event_and_participant(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
    ) -> AppResult<Option<Booking>> {
        BookingEntity::find()
            .filter(booking::Column::EventId.eq(event_id))
            .filter(booking::Column::ParticipantId.eq(participant_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn find_by_participant(&self, participant_id: Uuid) -> AppResult<Vec<Booking>> {
        let models = BookingEntity::find()
            .filter(booking::Column::ParticipantId.eq(participant_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        to_bookings(models)
    }

    async fn find_by_event_with_participants(
        &self,
        event_id: Uuid,
    ) -> AppResult<Vec<BookingWithParticipant>> {
        let bookings = to_bookings(
            BookingEntity::find()
                .filter(booking::Column::EventId.eq(event_id))
                .order_by_desc(booking::Column::CreatedAt)
                .all(&self.db)
                .await?,
        )?;

        let participant_ids: Vec<Uuid> = bookings.iter().map(|b| b.participant_id).collect();
        let participants: HashMap<Uuid, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(participant_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        bookings
            .into_iter()
            .map(|b| {
                let participant = participants.get(&b.participant_id).ok_or_else(|| {
                    AppError::internal(format!("Booking {} has no participant", b.id))
                })?;
                Ok(BookingWithParticipant::new(b, participant))
            })
            .collect()
    }

    async fn find_by_participant_with_events(
        &self,
        participant_id: Uuid,
    ) -> AppResult<Vec<BookingWithEvent>> {
        let bookings = self.find_by_participant(participant_id).await?;

        let event_ids: Vec<Uuid> = bookings.iter().map(|b| b.event_id).collect();
        let events: HashMap<Uuid, Event> = EventEntity::find()
            .filter(event::Column::Id.is_in(event_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| Event::try_from(m).map(|e| (e.id, e)))
            .collect::<AppResult<_>>()?;

        bookings
            .into_iter()
            .map(|b| {
                let event = events
                    .get(&b.event_id)
                    .ok_or_else(|| AppError::internal(format!("Booking {} has no event", b.id)))?;
                Ok(BookingWithEvent::new(b, event))
            })
            .collect()
    }

    async fn find_details(&self, id: Uuid) -> AppResult<Option<BookingDetails>> {
        let Some(booking) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let event = EventEntity::find_by_id(booking.event_id)
            .one(&self.db)
            .await?
            .ok_or_not_found()
            .and_then(Event::try_from)?;
        let participant = UserEntity::find_by_id(booking.participant_id)
            .one(&self.db)
            .await?
            .map(User::from)
            .ok_or_not_found()?;

        Ok(Some(BookingDetails {
            booking,
            event,
            participant,
        }))
    }

    async fn apply_transition(&self, transition: StatusTransition) -> AppResult<Booking> {
        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let updated = BookingEntity::update_many()
                    .col_expr(booking::Column::Status, Expr::value(transition.to.as_str()))
                    .filter(booking::Column::Id.eq(transition.booking_id))
                    .filter(booking::Column::Status.eq(transition.from.as_str()))
                    .exec(txn)
                    .await?;

                if updated.rows_affected == 0 {
                    return Err(AppError::conflict("Booking status was changed concurrently"));
                }

                move_seat(txn, transition.event_id, transition.seats).await?;

                BookingEntity::find_by_id(transition.booking_id)
                    .one(txn)
                    .await?
                    .ok_or_not_found()
                    .and_then(Booking::try_from)
            })
        })
        .await
    }
}
