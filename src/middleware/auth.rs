use std::convert::Infallible;

use axum::{extract::OptionalFromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::models::auth::{AuthenticatedUser, Claims};

/// Resolves the caller's identity from an `Authorization: Bearer` token.
///
/// Anything short of a valid, unexpired token yields `None`: read endpoints
/// stay public and write endpoints decide for themselves how to refuse.
impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
        else {
            return Ok(None);
        };

        let Some(secret) = parts.extensions.get::<JwtSecret>() else {
            tracing::error!("JWT secret not configured; treating request as anonymous");
            return Ok(None);
        };

        match decode_access_token(token.trim(), &secret.0) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                Ok(None)
            }
        }
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthenticatedUser, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let username = data.claims.sub;
    if username.trim().is_empty() {
        anyhow::bail!("token has an empty subject");
    }

    Ok(AuthenticatedUser { username })
}
