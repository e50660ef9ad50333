use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::models::auth::Claims;

pub struct AuthService;

impl AuthService {
    /// Mint an HS256 access token identifying `username`.
    pub fn generate_access_token(
        username: &str,
        secret: &str,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        if username.trim().is_empty() {
            anyhow::bail!("username must not be empty");
        }
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }
}
