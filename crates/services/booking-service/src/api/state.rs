//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::HealthCheck;
use crate::service::{AuthService, BookingService, EventService, Services, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub event_service: Arc<dyn EventService>,
    pub booking_service: Arc<dyn BookingService>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(services: Services, health: Arc<dyn HealthCheck>) -> Self {
        Self {
            auth_service: services.auth,
            user_service: services.users,
            event_service: services.events,
            booking_service: services.bookings,
            health,
        }
    }
}
