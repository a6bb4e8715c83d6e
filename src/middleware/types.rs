use axum_extra::extract::cookie::Cookie;

use crate::types::Identity;

/// Result of asking the identity provider about a request's cookies.
#[derive(Debug, Clone, Default)]
pub struct SessionResolution {
    /// Resolved identity, or `None` when the request is unauthenticated.
    pub identity: Option<Identity>,
    /// Session cookies the provider rotated during validation.
    ///
    /// Empty unless a refresh happened. Values are written back onto the
    /// outgoing response verbatim.
    pub refreshed: Vec<Cookie<'static>>,
}

impl SessionResolution {
    /// No identity, nothing refreshed.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A valid session that did not need refreshing.
    #[must_use]
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            refreshed: Vec::new(),
        }
    }

    /// Attach refreshed session cookies.
    #[must_use]
    pub fn with_refreshed(mut self, cookies: Vec<Cookie<'static>>) -> Self {
        self.refreshed = cookies;
        self
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Path classification used by the redirect policy.
///
/// `SignIn`, `Home` and `Other` are all public; only `Protected` requires a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    SignIn,
    Home,
    Other,
}

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Hand the request to the inner service.
    Forward,
    /// Short-circuit with a redirect to this path.
    Redirect(String),
}
