//! Bearer-token identity for the CrewTask API.
//!
//! Tokens are HS256-signed JWTs minted out-of-band (provisioning tooling or
//! the identity provider); this module only verifies them and turns claims
//! into an [`AuthUser`]. The axum extractor rejects requests without a
//! valid `Authorization: Bearer` credential before any handler runs.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crewtask_proto::user::{Role, UserId};

use crate::error::ApiError;
use crate::server::AppState;

/// Claims carried by a CrewTask session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject).
    pub sub: String,
    /// Display name, informational only.
    pub name: String,
    /// Authorization role.
    pub role: Role,
    /// Expiry, seconds since epoch.
    pub exp: u64,
}

/// The authenticated identity attached to a request or connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User id from the verified token.
    pub id: UserId,
    /// Role from the verified token.
    pub role: Role,
}

impl AuthUser {
    /// Returns `true` for admin identities.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with 403 unless the identity is an admin.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for non-admin identities.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("admin role required"))
        }
    }
}

/// HS256 signing and verification keys derived from one shared secret.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    /// Derives the key pair from a shared secret.
    #[must_use]
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for the given claims. Used by provisioning and tests;
    /// the request path only verifies.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if signing fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("token signing failed: {e}")))
    }

    /// Verifies a token and extracts the authenticated identity.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for malformed, tampered, or
    /// expired tokens, and for unknown role strings.
    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| ApiError::authentication(format!("invalid token: {e}")))?;
        Ok(AuthUser {
            id: UserId::new(data.claims.sub),
            role: data.claims.role,
        })
    }
}

/// Extracts the token from an `Authorization: Bearer` header, if present.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::authentication("missing bearer token"))?;
        state.auth.verify(token)
    }
}
