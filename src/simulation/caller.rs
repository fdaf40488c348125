//! Caller identity overrides.
//!
//! Resolution order for the next invocation: single-use override, then persistent
//! override, then whatever identity the stored context already carries.

use crate::context::CircuitContext;
use crate::identity::{CoinPublicKey, IdentityState};

/// Per-simulator override slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerOverrides {
    single_use: Option<CoinPublicKey>,
    persistent: Option<CoinPublicKey>,
}

impl CallerOverrides {
    /// No overrides set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            single_use: None,
            persistent: None,
        }
    }

    /// Override the caller for the next invocation only.
    pub fn set_single_use(&mut self, caller: CoinPublicKey) {
        self.single_use = Some(caller);
    }

    /// Set or clear the persistent override.
    pub fn set_persistent(&mut self, caller: Option<CoinPublicKey>) {
        self.persistent = caller;
    }

    /// Drop a pending single-use override without invoking anything.
    pub fn clear_single_use(&mut self) {
        self.single_use = None;
    }

    /// Clear both slots.
    pub fn reset(&mut self) {
        self.single_use = None;
        self.persistent = None;
    }

    /// The pending single-use override.
    #[must_use]
    pub const fn single_use(&self) -> Option<&CoinPublicKey> {
        self.single_use.as_ref()
    }

    /// The persistent override.
    #[must_use]
    pub const fn persistent(&self) -> Option<&CoinPublicKey> {
        self.persistent.as_ref()
    }

    /// The override that would apply to the next invocation, if any.
    #[must_use]
    pub fn resolve(&self) -> Option<CoinPublicKey> {
        self.single_use.or(self.persistent)
    }

    /// Identity the next invocation would observe against `ctx`.
    #[must_use]
    pub fn effective_identity<P, L>(&self, ctx: &CircuitContext<P, L>) -> IdentityState {
        identity_for(self.resolve(), ctx)
    }

    /// Ephemeral copy of `ctx` with its identity replaced per priority.
    ///
    /// Does not consume the single-use override; see [`CallerOverrides::take_effective`].
    #[must_use]
    pub fn effective_context<P: Clone, L: Clone>(&self, ctx: &CircuitContext<P, L>) -> CircuitContext<P, L> {
        with_identity(ctx, self.effective_identity(ctx))
    }

    /// Consume the single-use override and build the context for one invocation.
    ///
    /// The override is removed before any circuit code runs, so it is gone whether the
    /// invocation succeeds, fails, or unwinds.
    pub fn take_effective<P: Clone, L: Clone>(&mut self, ctx: &CircuitContext<P, L>) -> Invocation<P, L> {
        let caller = self.single_use.take().or(self.persistent);
        Invocation {
            context: with_identity(ctx, identity_for(caller, ctx)),
            overridden: caller.is_some(),
        }
    }
}

/// Context prepared for a single invocation.
#[derive(Debug, Clone)]
pub struct Invocation<P, L> {
    /// Ephemeral context handed to the circuit.
    pub context: CircuitContext<P, L>,
    /// Whether an override replaced the stored identity.
    pub overridden: bool,
}

fn identity_for<P, L>(caller: Option<CoinPublicKey>, ctx: &CircuitContext<P, L>) -> IdentityState {
    match caller {
        Some(key) => IdentityState::new(key),
        None => ctx.identity.clone(),
    }
}

fn with_identity<P: Clone, L: Clone>(ctx: &CircuitContext<P, L>, identity: IdentityState) -> CircuitContext<P, L> {
    CircuitContext {
        private_state: ctx.private_state.clone(),
        ledger: ctx.ledger.clone(),
        identity,
    }
}
