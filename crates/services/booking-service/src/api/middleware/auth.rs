//! JWT authentication middleware.
//!
//! `auth_middleware` rejects requests without a valid bearer token.
//! `optional_auth_middleware` lets them through anonymously; handlers that
//! need an identity still ask for [`CurrentUser`] and get a 401.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Actor, UserRole, BEARER_TOKEN_PREFIX};

use crate::api::AppState;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

fn bearer_token(request: &Request) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)
}

fn authenticate(state: &AppState, request: &Request) -> AppResult<CurrentUser> {
    let claims = state.auth_service.verify_token(bearer_token(request)?)?;

    Ok(CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

/// Require a valid bearer token and inject the CurrentUser.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current_user = authenticate(&state, &request)?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Inject the CurrentUser when a valid bearer token is present.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &request) {
        Ok(current_user) => {
            request.extensions_mut().insert(current_user);
        }
        Err(AppError::Unauthorized) => {}
        Err(e) => tracing::debug!("Ignoring invalid token on public route: {}", e),
    }

    next.run(request).await
}
