//! Entry point that turns configuration into wrapped channels.

use std::sync::Arc;

use crate::{MessageChannel, Metered, MeteredMessageStream, MeterRegistry, MeteringConfig};

/// Node-wide metering context.
///
/// Created once at startup and cloned into whatever accepts peer connections.
/// When disabled there is no registry at all: wrapped channels come back as
/// [`Metered::Passthrough`] and no meter exists to be incremented.
#[derive(Debug, Clone)]
pub struct Metering {
    registry: Option<Arc<MeterRegistry>>,
}

impl Metering {
    /// Build from configuration.
    pub fn new(config: &MeteringConfig) -> Self {
        if config.enabled {
            Self::with_registry(MeterRegistry::shared(config.namespace.clone()))
        } else {
            Self::disabled()
        }
    }

    /// Metering switched off.
    pub fn disabled() -> Self {
        tracing::debug!("traffic metering disabled, channels pass through");
        Self { registry: None }
    }

    /// Metering into an existing registry.
    pub fn with_registry(registry: Arc<MeterRegistry>) -> Self {
        Self { registry: Some(registry) }
    }

    /// Whether wrapped channels are metered.
    pub fn is_enabled(&self) -> bool {
        self.registry.is_some()
    }

    /// Shared registry, if metering is on.
    pub fn registry(&self) -> Option<&Arc<MeterRegistry>> {
        self.registry.as_ref()
    }

    /// Wrap a freshly established peer channel.
    pub fn wrap<C: MessageChannel>(&self, inner: C) -> Metered<C> {
        match &self.registry {
            Some(registry) => {
                Metered::Stream(MeteredMessageStream::new(inner, Arc::clone(registry)))
            },
            None => Metered::Passthrough(inner),
        }
    }
}

impl Default for Metering {
    fn default() -> Self {
        Self::new(&MeteringConfig::default())
    }
}
