use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Decoded bearer-token payload. User tokens carry `id` + `email`; admin
/// tokens carry `id` + `username` + `isAdmin: true`. The `isAdmin` claim is
/// the discriminator between the two credential universes: a well-formed
/// token of the wrong audience is an authorization failure, not an
/// authentication failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, rename = "isAdmin")]
    pub is_admin: bool,

    pub iat: i64,

    pub exp: i64,
}

/// Stateless token issuer/verifier, constructed once from config and injected
/// into the request-handling state. Business logic never reads the secret
/// from ambient environment.
#[derive(Clone)]
pub struct AuthTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_expiry: Duration,
}

impl AuthTokens {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiry: Duration::days(config.token_expiry_days),
        }
    }

    pub fn issue_user(&self, id: i32, email: &str) -> Result<String> {
        let claims = self.claims(id, Some(email.to_string()), None, false);
        self.sign(&claims)
    }

    pub fn issue_admin(&self, id: i32, username: &str) -> Result<String> {
        let claims = self.claims(id, None, Some(username.to_string()), true);
        self.sign(&claims)
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .context("Invalid or expired token")?;
        Ok(data.claims)
    }

    fn claims(
        &self,
        id: i32,
        email: Option<String>,
        username: Option<String>,
        is_admin: bool,
    ) -> TokenClaims {
        let now = Utc::now();
        TokenClaims {
            id,
            email,
            username,
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.token_expiry).timestamp(),
        }
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding).context("Failed to sign token")
    }
}
