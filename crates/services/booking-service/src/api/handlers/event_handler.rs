//! Event handlers.
//!
//! Mounted behind the optional auth middleware: reads work anonymously,
//! writes ask for a [`CurrentUser`] and answer 401 without one.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{EventChanges, EventResponse, EventStatus, NewEvent};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::service::PublicEventResponse;

/// Event creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "RustConf 2030")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Start time (RFC 3339)
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Location is required"))]
    #[schema(example = "Grand Hall")]
    pub location: String,
    /// Total seats
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    #[schema(example = 100, minimum = 1)]
    pub capacity: i32,
    /// DRAFT when omitted
    pub status: Option<EventStatus>,
}

/// Partial event update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
}

impl From<UpdateEventRequest> for EventChanges {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            date: req.date,
            location: req.location,
            capacity: req.capacity,
            status: req.status,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Only events with this status
    pub status: Option<EventStatus>,
}

/// Create event routes
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/public", get(list_public_events))
        .route(
            "/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/:id/publish", patch(publish_event))
}

/// List all events
#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events ordered by date", body = Vec<EventResponse>)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = state.event_service.list_events(query.status).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// List published events, with the caller's booking status when authenticated
#[utoipa::path(
    get,
    path = "/events/public",
    tag = "Events",
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Published events ordered by date", body = Vec<PublicEventResponse>)
    )
)]
pub async fn list_public_events(
    current_user: Option<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PublicEventResponse>>> {
    let viewer = current_user.map(|u| u.actor());
    Ok(Json(state.event_service.list_public(viewer).await?))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = state.event_service.get_event(id).await?;
    Ok(Json(EventResponse::from(event)))
}

/// Create an event (admin only)
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_event(
    current_user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    let new_event = NewEvent {
        title: payload.title,
        description: payload.description,
        date: payload.date,
        location: payload.location,
        capacity: payload.capacity,
        status: payload.status.unwrap_or_default(),
        organizer_id: current_user.id,
    };

    let event = state
        .event_service
        .create_event(&current_user.actor(), new_event)
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// Update an event (admin only)
#[utoipa::path(
    patch,
    path = "/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error or capacity below confirmed seats"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_event(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    let event = state
        .event_service
        .update_event(&current_user.actor(), id, payload.into())
        .await?;

    Ok(Json(EventResponse::from(event)))
}

/// Publish an event (admin only)
#[utoipa::path(
    patch,
    path = "/events/{id}/publish",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event published", body = EventResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn publish_event(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = state
        .event_service
        .publish_event(&current_user.actor(), id)
        .await?;

    Ok(Json(EventResponse::from(event)))
}

/// Delete an event and its bookings (admin only)
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .event_service
        .delete_event(&current_user.actor(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
