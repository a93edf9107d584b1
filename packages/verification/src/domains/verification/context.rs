//! Context handed to verification actions: dependencies, the identity
//! store, tunables, and the fact-event channel.

use tokio::sync::broadcast;

use crate::config::VerificationConfig;
use crate::kernel::VerifierDeps;

use super::events::VerificationEvent;
use super::store::IdentityStore;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct VerificationContext {
    deps: VerifierDeps,
    store: IdentityStore,
    config: VerificationConfig,
    events: broadcast::Sender<VerificationEvent>,
}

impl VerificationContext {
    pub fn new(deps: VerifierDeps, config: VerificationConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            deps,
            store: IdentityStore::new(),
            config,
            events,
        }
    }

    pub fn deps(&self) -> &VerifierDeps {
        &self.deps
    }

    pub fn store(&self) -> &IdentityStore {
        &self.store
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Subscribe to fact events. Listeners that lag simply miss events;
    /// nothing in the core depends on them being consumed.
    pub fn subscribe(&self) -> broadcast::Receiver<VerificationEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: VerificationEvent) {
        // Send fails only when no receiver exists, which is fine.
        let _ = self.events.send(event);
    }
}
