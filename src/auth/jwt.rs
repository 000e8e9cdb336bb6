use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, error::AuthError, state::AppState};

/// Token payload: the subject (username) and the absolute expiry instant.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Signing material derived from the process-wide secret. Built once per use
/// from immutable config; rotation is out of scope.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub algorithm: Algorithm,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            algorithm,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    /// Sign a token for `subject` expiring `ttl` after `now`.
    pub fn issue(
        &self,
        subject: &str,
        now: OffsetDateTime,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let expiry = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: subject.to_string(),
            exp: expiry.unix_timestamp() as usize,
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(anyhow::Error::new(e)))?;
        debug!(subject = %subject, exp = claims.exp, "token issued");
        Ok(token)
    }

    /// Verify a token and return its subject. Expiry is checked against the
    /// caller's `now`, not the process clock.
    pub fn validate(&self, token: &str, now: OffsetDateTime) -> Result<String, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })?;
        if now.unix_timestamp() >= data.claims.exp as i64 {
            return Err(AuthError::Expired);
        }
        debug!(subject = %data.claims.sub, "token verified");
        Ok(data.claims.sub)
    }
}
