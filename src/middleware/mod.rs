//! Per-request session gate for Axum.
//!
//! For every request that is not a static asset, the gate asks the identity
//! provider to validate (and, if needed, refresh) the session carried in the
//! request cookies, then applies a fixed redirect policy:
//!
//! | path                     | session | result                        |
//! |--------------------------|---------|-------------------------------|
//! | protected prefix         | none    | redirect to sign-in (`/auth`) |
//! | sign-in or home (`/`)    | valid   | redirect to landing (`/dashboard`) |
//! | anything else            | any     | forward, with refreshed cookies |
//!
//! Provider failures count as "no session": protected pages redirect, public
//! pages pass through.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use session_gate::middleware::{GateConfig, protect};
//!
//! // 1. Build the provider client from IDENTITY_PROVIDER_URL / IDENTITY_PROVIDER_KEY
//! let config = GateConfig::from_env()?;
//!
//! // 2. Wrap the app router
//! let app = protect(app_router(), config);
//!
//! // 3. Read the identity in handlers
//! async fn dashboard(CurrentUser(identity): CurrentUser) -> String {
//!     identity.user_id.to_string()
//! }
//! ```

mod config;
pub(crate) mod cookies;
mod error;
mod extractor;
mod gate;
mod policy;
mod state;
mod traits;
mod types;

pub use config::GateConfig;
pub use error::GateError;
pub use extractor::{CurrentUser, resolve_session};
pub use gate::protect;
pub use traits::IdentityProvider;
pub use types::{GateDecision, RouteClass, SessionResolution};

/// Re-export cookie types for provider implementations.
pub use axum_extra::extract::cookie::{Cookie, CookieJar};
