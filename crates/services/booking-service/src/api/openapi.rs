//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::handlers::auth_handler::{LoginRequest, RegisterRequest};
use crate::api::handlers::booking_handler::{CreateBookingRequest, UpdateBookingStatusRequest};
use crate::api::handlers::event_handler::{CreateEventRequest, UpdateEventRequest};
use crate::service::{PublicEventResponse, TokenResponse};
use domain::{
    BookingResponse, BookingStatus, BookingWithEvent, BookingWithParticipant, EventResponse,
    EventStatus, UserResponse, UserRole,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth_handler::register,
        crate::api::handlers::auth_handler::login,
        crate::api::handlers::user_handler::get_current_user,
        crate::api::handlers::event_handler::list_events,
        crate::api::handlers::event_handler::list_public_events,
        crate::api::handlers::event_handler::get_event,
        crate::api::handlers::event_handler::create_event,
        crate::api::handlers::event_handler::update_event,
        crate::api::handlers::event_handler::publish_event,
        crate::api::handlers::event_handler::delete_event,
        crate::api::handlers::booking_handler::create_booking,
        crate::api::handlers::booking_handler::my_bookings,
        crate::api::handlers::booking_handler::event_bookings,
        crate::api::handlers::booking_handler::update_booking_status,
        crate::api::handlers::booking_handler::cancel_booking,
        crate::api::handlers::booking_handler::download_ticket,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            UserRole,
            CreateEventRequest,
            UpdateEventRequest,
            EventResponse,
            EventStatus,
            PublicEventResponse,
            CreateBookingRequest,
            UpdateBookingStatusRequest,
            BookingResponse,
            BookingStatus,
            BookingWithEvent,
            BookingWithParticipant,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User authentication endpoints"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Events", description = "Event catalog endpoints"),
        (name = "Bookings", description = "Booking workflow and tickets"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
