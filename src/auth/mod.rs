use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Session token claims issued by the sign-in flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, role: Option<String>, email: Option<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id.into(),
            role,
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret not configured")]
    InvalidSecret,

    #[error("Session token generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

pub fn generate_session_token(claims: &Claims, security: &SecurityConfig) -> Result<String, SessionError> {
    let secret = &security.session_secret;

    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| SessionError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry. Claim contents are left to the caller.
pub fn decode_session_token(token: &str, security: &SecurityConfig) -> Result<Claims, SessionError> {
    let secret = &security.session_secret;

    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn issued_token_decodes_with_same_secret() {
        let security = AppConfig::development().security;
        let claims = Claims::new("user-1", Some("admin".to_string()), None, 1);

        let token = generate_session_token(&claims, &security).unwrap();
        let decoded = decode_session_token(&token, &security).unwrap();

        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.role.as_deref(), Some("admin"));
        assert!(decoded.email.is_none());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.session_secret = "another-secret".to_string();

        let token = generate_session_token(&Claims::new("user-1", None, None, 1), &other).unwrap();
        assert!(matches!(
            decode_session_token(&token, &security),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let mut security = AppConfig::development().security;
        security.session_secret.clear();
        assert!(matches!(
            generate_session_token(&Claims::new("u", None, None, 1), &security),
            Err(SessionError::InvalidSecret)
        ));
    }
}
