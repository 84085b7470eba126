pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{EncodingKey, Header, encode};
use services::caller::Role;
use util::config::AppConfig;

/// Generates a JWT and its expiry timestamp (RFC 3339) for a given user.
///
/// Token lifetime is `JWT_DURATION_MINUTES`. A lifetime that puts the expiry
/// past chrono's range is rejected as `InvalidToken`.
pub fn generate_jwt(
    user_id: i64,
    role: Role,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let config = AppConfig::global();
    let expiry = i64::try_from(config.jwt_duration_minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or(ErrorKind::InvalidToken)?;
    let claims = Claims {
        sub: user_id,
        role,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
