use super::policy;
use super::traits::IdentityProvider;
use super::types::{GateDecision, RouteClass};

/// Shared gate settings used by both config and runtime state.
#[derive(Debug, Clone)]
pub(crate) struct GateSettings {
    pub(crate) sign_in_path: String,
    pub(crate) home_path: String,
    pub(crate) landing_path: String,
    pub(crate) protected_prefixes: Vec<String>,
    pub(crate) cookies_on_redirect: bool,
}

impl GateSettings {
    pub(crate) fn defaults() -> Self {
        Self {
            sign_in_path: "/auth".into(),
            home_path: "/".into(),
            landing_path: "/dashboard".into(),
            protected_prefixes: vec!["/dashboard".into(), "/workspaces".into()],
            cookies_on_redirect: false,
        }
    }
}

/// Session gate configuration.
///
/// Required field (`provider`) is a constructor parameter — no runtime "missing field" errors.
///
/// Use [`new()`](GateConfig::new) with `with_*` methods, or
/// [`from_env()`](GateConfig::from_env) to build the HTTP identity client from
/// the process environment.
pub struct GateConfig<P> {
    pub(super) provider: P,
    pub(super) settings: GateSettings,
}

impl<P: IdentityProvider> GateConfig<P> {
    /// Create config with the required identity provider.
    ///
    /// Defaults: sign-in `/auth`, home `/`, landing `/dashboard`, protected
    /// prefixes `/dashboard` and `/workspaces`, no cookies on redirects.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            settings: GateSettings::defaults(),
        }
    }

    /// Path unauthenticated visitors of protected pages are sent to.
    #[must_use]
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.settings.sign_in_path = path.into();
        self
    }

    #[must_use]
    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.settings.home_path = path.into();
        self
    }

    /// Path signed-in visitors of the sign-in or home page are sent to.
    #[must_use]
    pub fn with_landing_path(mut self, path: impl Into<String>) -> Self {
        self.settings.landing_path = path.into();
        self
    }

    /// Replace the protected path prefixes.
    ///
    /// Matching is per path segment: `/dashboard` covers `/dashboard` and
    /// `/dashboard/settings`, not `/dashboards`.
    #[must_use]
    pub fn with_protected_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.protected_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Also attach refreshed session cookies to redirect responses.
    #[must_use]
    pub fn with_cookies_on_redirect(mut self, enabled: bool) -> Self {
        self.settings.cookies_on_redirect = enabled;
        self
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Classify `path` under this configuration.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        policy::classify(path, &self.settings)
    }

    /// What the gate does for `path` given the session outcome.
    ///
    /// Static assets are not considered here; see
    /// [`is_static_asset`](crate::is_static_asset).
    #[must_use]
    pub fn decide(&self, path: &str, authenticated: bool) -> GateDecision {
        policy::decide(self.classify(path), authenticated, &self.settings)
    }
}

#[cfg(feature = "client")]
impl GateConfig<crate::identity::IdentityClient> {
    /// Create config from environment variables, using default routing.
    ///
    /// See [`IdentityConfig::from_env`](crate::IdentityConfig::from_env) for
    /// the variables read. Call once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the provider endpoint
    /// or key is missing.
    pub fn from_env() -> Result<Self, crate::Error> {
        crate::identity::IdentityClient::from_env().map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::CookieJar;

    use super::*;
    use crate::middleware::SessionResolution;

    struct NoProvider;

    impl IdentityProvider for NoProvider {
        async fn resolve_session(
            &self,
            _jar: &CookieJar,
        ) -> Result<SessionResolution, Box<dyn std::error::Error + Send + Sync>> {
            Ok(SessionResolution::anonymous())
        }
    }

    #[test]
    fn test_defaults() {
        let config = GateConfig::new(NoProvider);

        assert_eq!(config.settings.sign_in_path, "/auth");
        assert_eq!(config.settings.home_path, "/");
        assert_eq!(config.settings.landing_path, "/dashboard");
        assert_eq!(config.settings.protected_prefixes, ["/dashboard", "/workspaces"]);
        assert!(!config.settings.cookies_on_redirect);
    }

    #[test]
    fn test_overrides() {
        let config = GateConfig::new(NoProvider)
            .with_sign_in_path("/login")
            .with_landing_path("/app")
            .with_protected_prefixes(["/app", "/billing"])
            .with_cookies_on_redirect(true);

        assert_eq!(config.settings.sign_in_path, "/login");
        assert_eq!(config.settings.landing_path, "/app");
        assert_eq!(config.settings.protected_prefixes, ["/app", "/billing"]);
        assert!(config.settings.cookies_on_redirect);
    }

    #[test]
    fn test_decide_uses_configured_paths() {
        let config = GateConfig::new(NoProvider)
            .with_sign_in_path("/login")
            .with_landing_path("/app")
            .with_protected_prefixes(["/app"]);

        assert_eq!(config.classify("/app/agents"), RouteClass::Protected);
        assert_eq!(
            config.decide("/app/agents", false),
            GateDecision::Redirect("/login".into())
        );
        assert_eq!(
            config.decide("/login", true),
            GateDecision::Redirect("/app".into())
        );
        assert_eq!(config.decide("/dashboard", false), GateDecision::Forward);
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_from_env_missing_key_is_fatal() {
        temp_env::with_vars(
            [
                ("IDENTITY_PROVIDER_URL", Some("https://id.example.com")),
                ("IDENTITY_PROVIDER_KEY", None),
            ],
            || {
                assert!(matches!(
                    GateConfig::<crate::IdentityClient>::from_env(),
                    Err(crate::Error::Config(_))
                ));
            },
        );
    }
}
