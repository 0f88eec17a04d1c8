pub mod password;

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::TypedHeader;
use chrono::{DateTime, Duration, Utc};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    errors::AppError,
    models::{Actor, User, user::Claims},
    state::AppState,
};

/// Signs and verifies session tokens. Cheap to clone.
#[derive(Clone)]
pub struct JwtKeys {
    inner: Arc<JwtKeysInner>,
}

struct JwtKeysInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            inner: Arc::new(JwtKeysInner {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                ttl: Duration::hours(ttl_hours),
            }),
        }
    }

    pub fn generate_jwt(&self, user: &User) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + self.inner.ttl;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.inner.encoding,
        )?;
        Ok((token, expires_at))
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &self.inner.decoding,
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

pub struct AuthClaims(pub Claims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        "Missing or invalid Authorization header".into(),
                    )
                })?;

        AuthClaims::from_token(bearer.token(), &state.jwt)
    }
}

impl AuthClaims {
    pub fn from_token(token: &str, keys: &JwtKeys) -> Result<Self, (StatusCode, String)> {
        let claims = keys.decode_jwt(token).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            (StatusCode::UNAUTHORIZED, "Invalid or expired token".into())
        })?;

        Ok(Self(claims))
    }

    pub fn actor(&self) -> Result<Actor, (StatusCode, String)> {
        self.0.actor().map_err(|e| {
            tracing::error!("Unauthorized access attempt: {}", e);
            e.to_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user() -> User {
        User {
            id: 42,
            email: "critic@example.com".into(),
            password_hash: String::new(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_carries_subject_and_role() {
        let keys = JwtKeys::new("test-secret", 1);
        let (token, expires_at) = keys.generate_jwt(&user()).unwrap();

        let claims = keys.decode_jwt(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp, expires_at.timestamp() as usize);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (token, _) = JwtKeys::new("one", 1).generate_jwt(&user()).unwrap();
        let result = AuthClaims::from_token(&token, &JwtKeys::new("two", 1));
        assert_eq!(result.err().map(|(status, _)| status), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("test-secret", 1);
        let claims = Claims {
            sub: "1".into(),
            email: "a@b.c".into(),
            role: UserRole::User,
            iat: 0,
            exp: 1,
        };
        let token = encode(&Header::default(), &claims, &keys.inner.encoding).unwrap();
        assert!(keys.decode_jwt(&token).is_err());
    }
}
