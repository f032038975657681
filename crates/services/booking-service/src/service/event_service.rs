//! Event catalog service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::{
    authorize, Action, Actor, BookingStatus, Event, EventChanges, EventResponse, EventStatus,
    NewEvent, Resource,
};

use crate::repository::{BookingRepository, EventRepository};

/// Published event as seen by a (possibly anonymous) visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    /// Status of the caller's booking for this event, when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_booking_status: Option<BookingStatus>,
}

/// Event service trait for dependency injection.
#[async_trait]
pub trait EventService: Send + Sync {
    /// Create an event organized by `actor`
    async fn create_event(&self, actor: &Actor, new_event: NewEvent) -> AppResult<Event>;

    /// All events, optionally filtered by status
    async fn list_events(&self, status: Option<EventStatus>) -> AppResult<Vec<Event>>;

    /// PUBLISHED events by date, annotated with the viewer's booking status
    async fn list_public(&self, viewer: Option<Actor>) -> AppResult<Vec<PublicEventResponse>>;

    async fn get_event(&self, id: Uuid) -> AppResult<Event>;

    async fn update_event(&self, actor: &Actor, id: Uuid, changes: EventChanges)
        -> AppResult<Event>;

    /// Mark an event PUBLISHED. Publishing twice rewrites the same status.
    async fn publish_event(&self, actor: &Actor, id: Uuid) -> AppResult<Event>;

    async fn delete_event(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EventService.
pub struct EventCatalog {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl EventCatalog {
    pub fn new(events: Arc<dyn EventRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { events, bookings }
    }
}

#[async_trait]
impl EventService for EventCatalog {
    async fn create_event(&self, actor: &Actor, mut new_event: NewEvent) -> AppResult<Event> {
        authorize(actor, Action::CreateEvent, Resource::Any)?;
        new_event.organizer_id = actor.id;
        new_event.validate()?;

        let event = self.events.create(new_event).await?;
        tracing::info!(event_id = %event.id, status = %event.status, "Event created");
        Ok(event)
    }

    async fn list_events(&self, status: Option<EventStatus>) -> AppResult<Vec<Event>> {
        self.events.list(status).await
    }

    async fn list_public(&self, viewer: Option<Actor>) -> AppResult<Vec<PublicEventResponse>> {
        let events = self.events.list_published().await?;

        let my_statuses: HashMap<Uuid, BookingStatus> = match viewer {
            Some(actor) => self
                .bookings
                .find_by_participant(actor.id)
                .await?
                .into_iter()
                .map(|b| (b.event_id, b.status))
                .collect(),
            None => HashMap::new(),
        };

        Ok(events
            .into_iter()
            .map(|event| PublicEventResponse {
                my_booking_status: my_statuses.get(&event.id).copied(),
                event: EventResponse::from(event),
            })
            .collect())
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Event> {
        self.events.find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_event(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: EventChanges,
    ) -> AppResult<Event> {
        authorize(actor, Action::UpdateEvent, Resource::Any)?;
        changes.validate()?;

        if let Some(capacity) = changes.capacity {
            self.get_event(id).await?.ensure_capacity_change(capacity)?;
        }

        let event = self.events.update(id, changes).await?;
        tracing::info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    async fn publish_event(&self, actor: &Actor, id: Uuid) -> AppResult<Event> {
        authorize(actor, Action::PublishEvent, Resource::Any)?;

        let changes = EventChanges {
            status: Some(EventStatus::Published),
            ..Default::default()
        };
        let event = self.events.update(id, changes).await?;
        tracing::info!(event_id = %event.id, "Event published");
        Ok(event)
    }

    async fn delete_event(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        authorize(actor, Action::DeleteEvent, Resource::Any)?;

        self.events.delete(id).await?;
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
