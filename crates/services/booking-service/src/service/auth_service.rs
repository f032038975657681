//! Authentication service - registration, login and token verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    Actor, Password, User, UserResponse, UserRole, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};

use crate::repository::UserRepository;

/// Verified against when the email is unknown, so both paths cost one argon2 run.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    Password::new("timing-equalizer-password")
        .ok()
        .map(Password::into_string)
});

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.role)
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user with the given role
    async fn register(&self, email: String, password: String, role: UserRole) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    fn generate_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt.expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_hours * SECONDS_PER_HOUR,
            user: UserResponse::from(user),
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, password: String, role: UserRole) -> AppResult<User> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self.users.create(email, password_hash, role).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.users.find_by_email(&email).await?;

        let stored_hash = match (&user, DUMMY_HASH.as_deref()) {
            (Some(user), _) => user.password_hash.as_str(),
            (None, Some(dummy)) => dummy,
            (None, None) => return Err(AppError::InvalidCredentials),
        };
        let password_valid = Password::from_hash(stored_hash).verify(&password);

        match user {
            Some(user) if password_valid => self.generate_token(&user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".into(),
            expiration_hours: 24,
        }
    }

    fn stored_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: UserRole::Participant,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let user = stored_user("correct-horse");
        let expected_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("ada@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(Arc::new(repo), jwt());
        let token = auth
            .login("ada@example.com".into(), "correct-horse".into())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);
        assert_eq!(token.user.id, expected_id);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, expected_id);
        assert_eq!(claims.role, UserRole::Participant);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("correct-horse");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(Arc::new(repo), jwt());
        let result = auth.login("ada@example.com".into(), "battery-staple".into()).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(repo), jwt());
        let result = auth.login("nobody@example.com".into(), "whatever1".into()).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let user = stored_user("correct-horse");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_create().never();

        let auth = Authenticator::new(Arc::new(repo), jwt());
        let result = auth
            .register("ada@example.com".into(), "password123".into(), UserRole::Participant)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|email, hash, role| {
                email == "new@example.com" && hash.starts_with("$argon2") && *role == UserRole::Admin
            })
            .returning(|email, hash, role| {
                Ok(User {
                    id: Uuid::new_v4(),
                    email,
                    password_hash: hash,
                    role,
                    created_at: Utc::now(),
                })
            });

        let auth = Authenticator::new(Arc::new(repo), jwt());
        let user = auth
            .register("new@example.com".into(), "password123".into(), UserRole::Admin)
            .await
            .unwrap();

        assert!(user.is_admin());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = Authenticator::new(Arc::new(MockUserRepository::new()), jwt());
        let result = auth.verify_token("not.a.token");
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }
}
