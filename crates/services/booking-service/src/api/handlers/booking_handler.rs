//! Booking handlers. All routes require authentication.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{BookingResponse, BookingStatus, BookingWithEvent, BookingWithParticipant};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// Booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Event to book a seat for
    #[serde(alias = "eventId")]
    pub event_id: Uuid,
}

/// Administrative status change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Create booking routes
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/my-bookings", get(my_bookings))
        .route("/event/:event_id", get(event_bookings))
        .route("/:id/status", patch(update_booking_status))
        .route("/:id/cancel", patch(cancel_booking))
        .route("/:id/ticket", get(download_ticket))
}

/// Book a seat on a published event (participants only)
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created as PENDING", body = BookingResponse),
        (status = 400, description = "Event is full"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Participants only"),
        (status = 404, description = "Event missing or not published"),
        (status = 409, description = "Already booked")
    )
)]
pub async fn create_booking(
    current_user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let booking = state
        .booking_service
        .create_booking(&current_user.actor(), payload.event_id)
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// The caller's bookings, newest first
#[utoipa::path(
    get,
    path = "/bookings/my-bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings with their events", body = Vec<BookingWithEvent>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_bookings(
    current_user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookingWithEvent>>> {
    let bookings = state
        .booking_service
        .find_my_bookings(&current_user.actor())
        .await?;

    Ok(Json(bookings))
}

/// Bookings of an event (admin only)
#[utoipa::path(
    get,
    path = "/bookings/event/{event_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Bookings with their participants", body = Vec<BookingWithParticipant>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn event_bookings(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<Vec<BookingWithParticipant>>> {
    let bookings = state
        .booking_service
        .find_by_event(&current_user.actor(), event_id)
        .await?;

    Ok(Json(bookings))
}

/// Move a booking to any status (admin only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 400, description = "No seats left to confirm"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking changed concurrently")
    )
)]
pub async fn update_booking_status(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBookingStatusRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .booking_service
        .update_status(&current_user.actor(), id, payload.status)
        .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// Cancel one of the caller's bookings
#[utoipa::path(
    patch,
    path = "/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking canceled", body = BookingResponse),
        (status = 400, description = "Refused bookings cannot be canceled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Owner only"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .booking_service
        .cancel_booking(&current_user.actor(), id)
        .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// Download the PDF ticket of a confirmed booking
#[utoipa::path(
    get,
    path = "/bookings/{id}/ticket",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "PDF ticket", content_type = "application/pdf", body = String),
        (status = 400, description = "Booking is not confirmed or belongs to another participant"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn download_ticket(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let ticket = state
        .booking_service
        .ticket(&current_user.actor(), id)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ticket.filename),
        ),
    ];

    Ok((headers, ticket.content).into_response())
}
