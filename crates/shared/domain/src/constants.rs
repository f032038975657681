//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Role of users who book seats (default for new accounts)
pub const ROLE_PARTICIPANT: &str = "PARTICIPANT";

/// Administrator role: manages events and bookings
pub const ROLE_ADMIN: &str = "ADMIN";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_PARTICIPANT, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Smallest number of seats an event may offer
pub const MIN_EVENT_CAPACITY: i32 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Tickets
// =============================================================================

/// Prefix of the string encoded in a ticket's QR code
pub const TICKET_QR_PREFIX: &str = "BOOKING:";

/// Maximum number of title characters kept in a ticket filename
pub const TICKET_FILENAME_TITLE_LEN: usize = 30;

/// Number of booking id characters kept in a ticket filename
pub const TICKET_FILENAME_ID_LEN: usize = 8;
