#![doc = include_str!("../README.md")]

pub mod assets;
pub mod error;
#[cfg(feature = "client")]
pub mod identity;
pub mod middleware;
pub mod types;

// Re-exports for convenient access
pub use assets::is_static_asset;
pub use error::Error;
#[cfg(feature = "client")]
pub use identity::{IdentityClient, IdentityConfig, TokenResponse};
pub use middleware::{
    CurrentUser, GateConfig, GateDecision, IdentityProvider, RouteClass, SessionResolution,
    protect,
};
pub use types::{Identity, UserId};
