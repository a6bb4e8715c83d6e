use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use super::error::GateError;
use super::traits::IdentityProvider;
use super::types::SessionResolution;
use crate::types::Identity;

/// Identity the session gate resolved for this request.
///
/// Use as an Axum extractor in handlers behind [`protect`](super::protect).
/// Returns `401 Unauthorized` if the gate found no valid session.
///
/// # Example
///
/// ```rust,ignore
/// async fn settings(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
///     format!("Settings for {}", identity.user_id)
/// }
///
/// // Optional: accessible to both authenticated and anonymous users
/// async fn pricing(user: Option<CurrentUser>) -> impl IntoResponse {
///     match user {
///         Some(CurrentUser(identity)) => format!("Welcome back, {}", identity.user_id),
///         None => "Hello, guest".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Self)
            .ok_or(GateError::Unauthenticated)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(Self))
    }
}

/// Ask the provider about `jar`, failing closed.
///
/// Provider errors are logged and normalized to an anonymous resolution;
/// they are never retried and never surfaced to the caller.
pub async fn resolve_session<P: IdentityProvider>(provider: &P, jar: &CookieJar) -> SessionResolution {
    match provider.resolve_session(jar).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(error = %e, "Session validation failed, treating request as unauthenticated");
            SessionResolution::anonymous()
        }
    }
}
