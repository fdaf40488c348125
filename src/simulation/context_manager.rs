//! Ownership of the simulator's circuit context.
//!
//! Key invariants:
//! - The contract initializer runs exactly once, inside `initialize`.
//! - The context is only ever replaced as a whole; the single exception is explicit
//!   private-state injection, which swaps that one field.

use tracing::debug;

use crate::context::{CircuitContext, ConstructorContext, LedgerHandle};
use crate::contract::Contract;
use crate::error::{SimError, SimResult};
use crate::identity::{CoinPublicKey, ContractAddress, IdentityState};
use crate::value::Value;

/// Holds the single live `CircuitContext` of a simulator.
#[derive(Debug, Clone)]
pub struct ContextManager<P, L> {
    context: CircuitContext<P, L>,
}

impl<P, L> ContextManager<P, L> {
    /// Run the contract initializer and build the initial context.
    ///
    /// An initializer failure is reported as [`SimError::Construction`]; nothing is retained.
    pub fn initialize<C>(
        contract: &C,
        initial_private_state: P,
        coin_public_key: CoinPublicKey,
        address: ContractAddress,
        args: &[Value],
    ) -> SimResult<Self>
    where
        C: Contract<PrivateState = P, Ledger = L>,
    {
        let constructor = ConstructorContext {
            initial_private_state,
            identity: IdentityState::new(coin_public_key),
        };

        let result = contract
            .initial_state(constructor, args)
            .map_err(SimError::Construction)?;

        debug!(address = %address, args = args.len(), "contract initialized");

        Ok(Self {
            context: CircuitContext {
                private_state: result.private_state,
                ledger: LedgerHandle::new(result.ledger_state, address),
                identity: result.identity,
            },
        })
    }

    /// The current context.
    #[must_use]
    pub const fn context(&self) -> &CircuitContext<P, L> {
        &self.context
    }

    /// Replace the whole context.
    pub fn set_context(&mut self, context: CircuitContext<P, L>) {
        self.context = context;
    }

    /// Replace only the private state; ledger and identity are left untouched.
    pub fn update_private_state(&mut self, private_state: P) {
        self.context.private_state = private_state;
    }

    /// The current private state.
    #[must_use]
    pub const fn private_state(&self) -> &P {
        &self.context.private_state
    }

    /// The current ledger handle.
    #[must_use]
    pub const fn ledger(&self) -> &LedgerHandle<L> {
        &self.context.ledger
    }
}
