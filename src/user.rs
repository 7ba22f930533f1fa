//! The authenticated user's identity.
//!
//! Authentication itself lives in an upstream identity-aware proxy which
//! forwards the verified user id on every request. This module defines the
//! extractor that reads it.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::Error;

/// Alias for the opaque user identifier issued by the identity provider.
pub type UserId = String;

/// The request header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated user forwarded by the proxy.
///
/// Rejects the request with 401 when the header is absent or empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| AuthenticatedUser(value.to_owned()))
            .ok_or(Error::Unauthenticated)
    }
}
