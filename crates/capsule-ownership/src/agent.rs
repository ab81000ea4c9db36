//! Ownership agent lifecycle
//!
//! Loads into a host runtime, negotiates the capabilities the verifier
//! needs, subscribes to host events and then serves move requests against
//! the host heap. A failed load disposes the environment before returning.

use crate::verifier::{MoveOutcome, MoveRequest, MoveVerifier, VerifyPhase};
use capsule_core::{
    CapsuleError, HostCapabilities, HostEnvironment, HostEvent, ObjectId, Result, VerifierConfig,
};
use tracing::{debug, info, instrument, trace, warn};

/// Verifier bound to a host environment.
#[derive(Debug)]
pub struct OwnershipAgent<E: HostEnvironment> {
    env: E,
    verifier: MoveVerifier,
    capabilities: HostCapabilities,
    allocations: u64,
}

impl<E: HostEnvironment> OwnershipAgent<E> {
    /// Attach to `env`.
    ///
    /// Fails with [`CapsuleError::MissingCapability`] if the host cannot
    /// grant a required capability, or with the host's error if acquiring
    /// capabilities or enabling events fails.
    #[instrument(level = "debug", skip(env))]
    pub fn on_load(mut env: E, config: VerifierConfig) -> Result<Self> {
        let negotiated = config.validate().and_then(|()| Self::negotiate(&mut env));
        match negotiated {
            Ok(capabilities) => {
                info!(?capabilities, "ownership agent loaded");
                Ok(Self {
                    env,
                    verifier: MoveVerifier::new(config),
                    capabilities,
                    allocations: 0,
                })
            }
            Err(err) => {
                if let Err(dispose_err) = env.dispose() {
                    warn!(error = %dispose_err, "failed to dispose host environment");
                }
                Err(err)
            }
        }
    }

    fn negotiate(env: &mut E) -> Result<HostCapabilities> {
        let potential = env.potential_capabilities()?;
        let required = HostCapabilities::required();
        if let Some(missing) = potential.first_missing(&required) {
            return Err(CapsuleError::missing_capability(missing));
        }

        let mut acquired = required;
        acquired.can_generate_object_alloc_events = potential.can_generate_object_alloc_events;
        env.add_capabilities(acquired)?;

        env.enable_event(HostEvent::MethodEntry)?;
        if acquired.can_generate_object_alloc_events {
            env.enable_event(HostEvent::VmObjectAlloc)?;
        }
        Ok(acquired)
    }

    /// Check a move reported by the runtime.
    ///
    /// An illegal move is returned as [`CapsuleError::IllegalMove`] carrying
    /// the configured violation message.
    pub fn move_ownership(
        &mut self,
        sender: Option<ObjectId>,
        receiver: Option<ObjectId>,
        root: Option<ObjectId>,
    ) -> Result<MoveOutcome> {
        let request = MoveRequest::from_parts(sender, receiver, root);
        self.verifier.verify(&mut self.env, request)?.into_result()
    }

    /// Host callback for an object allocation.
    pub fn on_object_alloc(&mut self, object: ObjectId, size: u64) {
        self.allocations += 1;
        trace!(%object, size, "object allocated");
    }

    /// Allocations observed since load.
    pub fn allocations_observed(&self) -> u64 {
        self.allocations
    }

    /// Capabilities acquired at load.
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Phase reached by the most recent move check.
    pub fn last_phase(&self) -> VerifyPhase {
        self.verifier.last_phase()
    }

    /// The host environment.
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Mutable access to the host environment.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Detach from the host, disposing the environment and handing it back.
    pub fn on_unload(mut self) -> Result<E> {
        self.env.dispose()?;
        debug!(allocations = self.allocations, "ownership agent unloaded");
        Ok(self.env)
    }
}
