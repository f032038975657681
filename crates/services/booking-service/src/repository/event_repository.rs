//! Event repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::event::{self, ActiveModel, Entity as EventEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{Event, EventChanges, EventStatus, NewEvent};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Event repository trait for dependency injection.
///
/// The confirmed seat counter is never written here; only booking status
/// transitions move it.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a validated event with no confirmed seats
    async fn create(&self, new_event: NewEvent) -> AppResult<Event>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    /// All events, optionally filtered by status, by date ascending
    async fn list(&self, status: Option<EventStatus>) -> AppResult<Vec<Event>>;

    /// PUBLISHED events by date ascending
    async fn list_published(&self) -> AppResult<Vec<Event>>;

    /// Apply a partial update.
    ///
    /// A capacity change is only written while it stays at or above the
    /// confirmed count; otherwise `Validation`. Unknown id is `NotFound`.
    async fn update(&self, id: Uuid, changes: EventChanges) -> AppResult<Event>;

    /// Delete the event and, by cascade, its bookings
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EventRepository
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_events(models: Vec<event::Model>) -> AppResult<Vec<Event>> {
    models.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl EventRepository for EventStore {
    async fn create(&self, new_event: NewEvent) -> AppResult<Event> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_event.title),
            description: Set(new_event.description),
            date: Set(new_event.date),
            location: Set(new_event.location),
            capacity: Set(new_event.capacity),
            confirmed_count: Set(0),
            status: Set(new_event.status.as_str().to_string()),
            organizer_id: Set(new_event.organizer_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Event::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        EventEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Event::try_from)
            .transpose()
    }

    async fn list(&self, status: Option<EventStatus>) -> AppResult<Vec<Event>> {
        let mut query = EventEntity::find();
        if let Some(status) = status {
            query = query.filter(event::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_asc(event::Column::Date)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        to_events(models)
    }

    async fn list_published(&self) -> AppResult<Vec<Event>> {
        self.list(Some(EventStatus::Published)).await
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> AppResult<Event> {
        if changes.is_empty() {
            return self.find_by_id(id).await?.ok_or_not_found();
        }

        let mut update = EventEntity::update_many().filter(event::Column::Id.eq(id));

        if let Some(title) = changes.title {
            update = update.col_expr(event::Column::Title, Expr::value(title));
        }
        if let Some(description) = changes.description {
            update = update.col_expr(event::Column::Description, Expr::value(description));
        }
        if let Some(date) = changes.date {
            update = update.col_expr(event::Column::Date, Expr::value(date));
        }
        if let Some(location) = changes.location {
            update = update.col_expr(event::Column::Location, Expr::value(location));
        }
        if let Some(status) = changes.status {
            update = update.col_expr(event::Column::Status, Expr::value(status.as_str()));
        }
        if let Some(capacity) = changes.capacity {
            update = update
                .col_expr(event::Column::Capacity, Expr::value(capacity))
                .filter(event::Column::ConfirmedCount.lte(capacity));
        }

        let result = update.exec(&self.db).await.map_err(AppError::from)?;

        let current = self.find_by_id(id).await?.ok_or_not_found()?;
        if result.rows_affected == 0 {
            return Err(AppError::validation(format!(
                "Capacity cannot be lower than the {} confirmed bookings",
                current.confirmed_count
            )));
        }

        Ok(current)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = EventEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
