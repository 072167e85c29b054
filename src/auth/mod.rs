use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user: String,
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Authentication required.")]
    Missing,
    #[error("Invalid session: {0}")]
    Invalid(String),
    #[error("Session secret not configured")]
    InvalidSecret,
    #[error("Session token generation error: {0}")]
    TokenGeneration(String),
}

/// Signing material and cookie settings for session tokens
#[derive(Clone)]
pub struct SessionKeys {
    secret: String,
    cookie_name: String,
    expiry: Duration,
}

impl SessionKeys {
    pub fn new(secret: impl Into<String>, cookie_name: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: cookie_name.into(),
            expiry: Duration::hours(expiry_hours as i64),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.secret, &config.cookie_name, config.expiry_hours)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Mint a token for `user` with a fresh session id
    pub fn issue(&self, user: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = Claims {
            user: user.to_string(),
            sid: Uuid::new_v4(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };
        self.encode(&claims)
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, SessionError> {
        if self.secret.is_empty() {
            return Err(SessionError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))
    }

    /// Validate signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        if self.secret.is_empty() {
            return Err(SessionError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| SessionError::Invalid(e.to_string()))?;

        Ok(token_data.claims)
    }
}

/// Authenticated session context injected into protected requests
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthSession {
    pub user: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self {
            user: claims.user,
            session_id: claims.sid,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }
}
