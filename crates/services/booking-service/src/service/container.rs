//! Service container - wires repositories into services.

use std::sync::Arc;

use common::JwtConfig;
use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, BookingService, BookingWorkflow, EventCatalog, EventService,
    PdfTicketRenderer, UserManager, UserService,
};
use crate::repository::{
    BookingRepository, BookingStore, EventRepository, EventStore, UserRepository, UserStore,
};

/// Every application service behind its trait.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub events: Arc<dyn EventService>,
    pub bookings: Arc<dyn BookingService>,
}

impl Services {
    /// Build the services over any set of repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(user_repo.clone(), jwt)),
            users: Arc::new(UserManager::new(user_repo)),
            events: Arc::new(EventCatalog::new(event_repo.clone(), booking_repo.clone())),
            bookings: Arc::new(BookingWorkflow::new(
                event_repo,
                booking_repo,
                Arc::new(PdfTicketRenderer::new()),
            )),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, jwt: JwtConfig) -> Self {
        Self::new(
            Arc::new(UserStore::new(db.clone())),
            Arc::new(EventStore::new(db.clone())),
            Arc::new(BookingStore::new(db)),
            jwt,
        )
    }
}
