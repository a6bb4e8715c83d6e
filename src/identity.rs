use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::middleware::cookies;
use crate::middleware::{IdentityProvider, SessionResolution};
use crate::types::Identity;

const DEFAULT_COOKIE_PREFIX: &str = "__session";
const DEFAULT_ACCESS_TTL_SECS: u64 = 3600;

/// Identity provider client configuration.
///
/// Required fields are constructor parameters — no runtime "missing field" errors.
///
/// ```rust,ignore
/// use session_gate::IdentityConfig;
///
/// let config = IdentityConfig::new("https://id.example.com".parse()?, "public-anon-key");
/// // Optional overrides via chaining:
/// let config = config.with_cookie_prefix("__console").with_secure_cookies(false);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct IdentityConfig {
    pub(crate) endpoint: Url,
    pub(crate) public_key: String,
    pub(crate) user_url: Url,
    pub(crate) token_url: Url,
    pub(crate) cookie_prefix: String,
    pub(crate) secure_cookies: bool,
    pub(crate) refresh_ttl_days: i64,
}

impl IdentityConfig {
    /// Create a new client configuration.
    ///
    /// Provider API URLs are derived from `endpoint`; override them with
    /// [`with_user_url`](Self::with_user_url) / [`with_token_url`](Self::with_token_url).
    #[must_use]
    pub fn new(endpoint: Url, public_key: impl Into<String>) -> Self {
        Self {
            user_url: api_url(&endpoint, "auth/v1/user"),
            token_url: api_url(&endpoint, "auth/v1/token"),
            endpoint,
            public_key: public_key.into(),
            cookie_prefix: DEFAULT_COOKIE_PREFIX.into(),
            secure_cookies: true,
            refresh_ttl_days: 30,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `IDENTITY_PROVIDER_URL`: identity provider base URL
    /// - `IDENTITY_PROVIDER_KEY`: public client key sent as `apikey`
    ///
    /// # Optional env vars
    /// - `IDENTITY_COOKIE_PREFIX`: session cookie name prefix (default `__session`)
    /// - `DEV_AUTH`: Set to `"1"` or `"true"` to drop the `Secure` attribute on session cookies
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing, empty, or not a URL.
    pub fn from_env() -> Result<Self, Error> {
        let endpoint_str = required_env("IDENTITY_PROVIDER_URL")?;
        let endpoint: Url = endpoint_str
            .parse()
            .map_err(|e| Error::Config(format!("IDENTITY_PROVIDER_URL: {e}")))?;
        let public_key = required_env("IDENTITY_PROVIDER_KEY")?;

        let mut config = Self::new(endpoint, public_key);

        if let Ok(prefix) = std::env::var("IDENTITY_COOKIE_PREFIX")
            && !prefix.trim().is_empty()
        {
            config = config.with_cookie_prefix(prefix.trim());
        }

        let dev_auth = matches!(
            std::env::var("DEV_AUTH").as_deref(),
            Ok("1") | Ok("true"),
        );

        Ok(config.with_secure_cookies(!dev_auth))
    }

    /// Override the user lookup endpoint.
    #[must_use]
    pub fn with_user_url(mut self, url: Url) -> Self {
        self.user_url = url;
        self
    }

    /// Override the token (refresh / code exchange) endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    /// Override the session cookie name prefix.
    #[must_use]
    pub fn with_cookie_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_ttl_days = days;
        self
    }

    /// Identity provider base URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// User lookup endpoint URL.
    #[must_use]
    pub fn user_url(&self) -> &Url {
        &self.user_url
    }

    /// Token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Name of the access token cookie.
    #[must_use]
    pub fn access_cookie_name(&self) -> String {
        cookies::access_cookie_name(&self.cookie_prefix)
    }

    /// Name of the refresh token cookie.
    #[must_use]
    pub fn refresh_cookie_name(&self) -> String {
        cookies::refresh_cookie_name(&self.cookie_prefix)
    }
}

fn required_env(name: &str) -> Result<String, Error> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{name} is required"))),
    }
}

fn api_url(endpoint: &Url, path: &str) -> Url {
    let mut url = endpoint.clone();
    let base = endpoint.path().trim_end_matches('/');
    url.set_path(&format!("{base}/{path}"));
    url.set_query(None);
    url
}

/// Token response from the provider token endpoint.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Identity>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct CodeExchangeRequest<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

/// HTTP client for the hosted identity provider.
///
/// Implements [`IdentityProvider`] so it can be handed straight to
/// [`protect`](crate::middleware::protect).
pub struct IdentityClient {
    config: IdentityConfig,
    http: reqwest::Client,
}

impl IdentityClient {
    /// Create a new identity provider client.
    #[must_use]
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from environment variables (see [`IdentityConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if required env vars are missing or invalid.
    pub fn from_env() -> Result<Self, Error> {
        IdentityConfig::from_env().map(Self::new)
    }

    /// Use a custom HTTP client (for timeouts, connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Look up the user owning an access token.
    ///
    /// Returns `Ok(None)` when the provider rejects the token (`401`/`403`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or
    /// [`Error::Provider`] for any other non-success status.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, Error> {
        let response = self
            .http
            .get(self.config.user_url.clone())
            .header("apikey", &self.config.public_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if matches!(response.status().as_u16(), 401 | 403) {
            return Ok(None);
        }

        let response = Self::ensure_success(response, "user lookup").await?;
        response.json::<Identity>().await.map(Some).map_err(Into::into)
    }

    /// Trade a refresh token for a new session.
    ///
    /// Returns `Ok(None)` when the provider rejects the refresh token
    /// (`400`/`401`/`403`: revoked, reused or expired).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or
    /// [`Error::Provider`] for any other non-success status.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Option<TokenResponse>, Error> {
        let response = self
            .http
            .post(self.config.token_url.clone())
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.config.public_key)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        if matches!(response.status().as_u16(), 400 | 401 | 403) {
            return Ok(None);
        }

        let response = Self::ensure_success(response, "session refresh").await?;
        response.json::<TokenResponse>().await.map(Some).map_err(Into::into)
    }

    /// Exchange a one-time authorization code for a session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or
    /// [`Error::Provider`] if the token endpoint returns an error.
    pub async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, Error> {
        let response = self
            .http
            .post(self.config.token_url.clone())
            .query(&[("grant_type", "pkce")])
            .header("apikey", &self.config.public_key)
            .json(&CodeExchangeRequest {
                auth_code,
                code_verifier,
            })
            .send()
            .await?;

        let response = Self::ensure_success(response, "code exchange").await?;
        response.json::<TokenResponse>().await.map_err(Into::into)
    }

    /// Resolve the session carried by `jar`.
    ///
    /// Tries the access token first, then falls back to the refresh token.
    /// A successful refresh yields the rotated session cookies in
    /// [`SessionResolution::refreshed`].
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures or unexpected provider
    /// statuses; rejected tokens resolve to an anonymous session.
    pub async fn resolve(&self, jar: &CookieJar) -> Result<SessionResolution, Error> {
        let access = jar
            .get(&self.config.access_cookie_name())
            .map(|c| c.value().to_string());
        let refresh = jar
            .get(&self.config.refresh_cookie_name())
            .map(|c| c.value().to_string());

        if let Some(token) = access.as_deref().filter(|t| !t.is_empty())
            && let Some(identity) = self.get_user(token).await?
        {
            return Ok(SessionResolution::authenticated(identity));
        }

        let Some(refresh_token) = refresh.filter(|t| !t.is_empty()) else {
            return Ok(SessionResolution::anonymous());
        };

        let Some(tokens) = self.refresh_session(&refresh_token).await? else {
            return Ok(SessionResolution::anonymous());
        };

        let identity = match tokens.user.clone() {
            Some(user) => Some(user),
            None => self.get_user(&tokens.access_token).await?,
        };
        let Some(identity) = identity else {
            return Ok(SessionResolution::anonymous());
        };

        let refreshed = cookies::session_cookies(
            &self.config.cookie_prefix,
            &tokens.access_token,
            tokens.refresh_token.as_deref(),
            tokens.expires_in.unwrap_or(DEFAULT_ACCESS_TTL_SECS),
            self.config.refresh_ttl_days,
            self.config.secure_cookies,
        );

        Ok(SessionResolution {
            identity: Some(identity),
            refreshed,
        })
    }

    /// Checks HTTP response status; returns the response on success or an error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Provider {
            operation,
            status: Some(status),
            detail: body,
        })
    }
}

impl IdentityProvider for IdentityClient {
    async fn resolve_session(
        &self,
        jar: &CookieJar,
    ) -> Result<SessionResolution, Box<dyn std::error::Error + Send + Sync>> {
        self.resolve(jar).await.map_err(Into::into)
    }
}
