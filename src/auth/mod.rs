pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

lazy_static! {
    // Display names: no control characters, no leading or trailing whitespace.
    static ref NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[^\s\p{Cc}](?:[^\p{Cc}]*[^\s\p{Cc}])?$").unwrap();
}

/// bcrypt only looks at the first 72 bytes of its input.
const MAX_PASSWORD_BYTES: usize = 72;

fn fits_bcrypt(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("length");
        error.message = Some("Password must be at most 72 bytes".into());
        return Err(error);
    }
    Ok(())
}

/// Represents the payload for a user login request.
///
/// Only presence is checked here. Whether the email exists is never revealed,
/// so format errors are not reported separately from bad credentials.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide a password"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 1 to 100 characters.
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = "NAME_REGEX",
            message = "Name must not have surrounding whitespace or control characters"
        )
    )]
    pub name: String,
    /// Email address for the new account. Stored exactly as given.
    #[validate(email)]
    pub email: String,
    /// Longer than 72 bytes is refused rather than silently truncated.
    #[validate(length(min = 1), custom = "fits_bcrypt")]
    pub password: String,
}

/// Response body after a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Bearer token for subsequent requests.
    pub token: String,
}
