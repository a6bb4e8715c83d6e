use std::future::Future;

use axum_extra::extract::cookie::CookieJar;

use super::types::SessionResolution;

/// The external identity provider, as seen by the session gate.
///
/// Called once per gated request with the exact cookies the client sent.
/// Implementations must validate server-side on every call; the gate keeps
/// no session state of its own.
///
/// [`IdentityClient`](crate::IdentityClient) implements this for the hosted
/// provider. Tests and alternative backends implement it directly:
///
/// ```rust,ignore
/// impl IdentityProvider for MyProvider {
///     async fn resolve_session(
///         &self,
///         jar: &CookieJar,
///     ) -> Result<SessionResolution, Box<dyn std::error::Error + Send + Sync>> {
///         let Some(token) = jar.get("my_session") else {
///             return Ok(SessionResolution::anonymous());
///         };
///         let identity = self.lookup(token.value()).await?;
///         Ok(identity.map_or_else(SessionResolution::anonymous, SessionResolution::authenticated))
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Validate (and refresh, if needed) the session carried by `jar`.
    ///
    /// - `Ok` with `identity: None`: no session, or the provider rejected it.
    /// - `Ok` with non-empty `refreshed`: the provider rotated the session;
    ///   these cookies must reach the client.
    /// - `Err`: the provider could not answer. The gate treats this as
    ///   unauthenticated.
    fn resolve_session(
        &self,
        jar: &CookieJar,
    ) -> impl Future<Output = Result<SessionResolution, Box<dyn std::error::Error + Send + Sync>>>
           + Send;
}
