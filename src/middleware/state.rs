use std::sync::Arc;

use super::config::{GateConfig, GateSettings};
use super::traits::IdentityProvider;

/// Shared state for the gate middleware.
pub(super) struct GateState<P> {
    pub(super) provider: Arc<P>,
    pub(super) settings: Arc<GateSettings>,
}

impl<P: IdentityProvider> From<GateConfig<P>> for GateState<P> {
    fn from(config: GateConfig<P>) -> Self {
        Self {
            provider: Arc::new(config.provider),
            settings: Arc::new(config.settings),
        }
    }
}

// Manual Clone: avoid derive adding a `P: Clone` bound.
impl<P> Clone for GateState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            settings: self.settings.clone(),
        }
    }
}
