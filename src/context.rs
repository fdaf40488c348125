//! State carried into every circuit call.

use crate::identity::{CoinPublicKey, ContractAddress, IdentityState};

/// Ledger-access handle: the contract's raw ledger state bound to its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerHandle<L> {
    /// Raw ledger state.
    pub state: L,
    /// Address the state is bound to.
    pub address: ContractAddress,
}

impl<L> LedgerHandle<L> {
    /// Bind `state` to `address`.
    #[must_use]
    pub const fn new(state: L, address: ContractAddress) -> Self {
        Self { state, address }
    }
}

/// Aggregate state passed implicitly into every circuit.
///
/// A simulator holds exactly one of these. Impure circuits receive an owned copy and
/// hand back its replacement; the stored value is never edited field by field except
/// through explicit private-state injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitContext<P, L> {
    /// Private state owned by the test.
    pub private_state: P,
    /// Ledger handle.
    pub ledger: LedgerHandle<L>,
    /// Local state of the invoking party.
    pub identity: IdentityState,
}

impl<P, L> CircuitContext<P, L> {
    /// Key of the party this context invokes as.
    #[must_use]
    pub const fn caller(&self) -> &CoinPublicKey {
        &self.identity.coin_public_key
    }

    /// A view suitable for handing to a witness.
    #[must_use]
    pub const fn witness_context(&self) -> WitnessContext<'_, P, L> {
        WitnessContext {
            ledger: &self.ledger.state,
            private_state: &self.private_state,
            contract_address: self.ledger.address,
        }
    }
}

/// Input to a contract's initializer.
#[derive(Debug, Clone)]
pub struct ConstructorContext<P> {
    /// Private state the contract starts from.
    pub initial_private_state: P,
    /// Local state of the deploying party.
    pub identity: IdentityState,
}

/// Output of a contract's initializer.
#[derive(Debug, Clone)]
pub struct ConstructorResult<P, L> {
    /// Private state after initialization.
    pub private_state: P,
    /// Ledger state after initialization.
    pub ledger_state: L,
    /// Local state of the deploying party after initialization.
    pub identity: IdentityState,
}

/// What a witness sees when a circuit consults it.
#[derive(Debug)]
pub struct WitnessContext<'a, P, L> {
    /// Current ledger state.
    pub ledger: &'a L,
    /// Current private state.
    pub private_state: &'a P,
    /// Address of the contract being executed.
    pub contract_address: ContractAddress,
}

impl<P, L> Clone for WitnessContext<'_, P, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, L> Copy for WitnessContext<'_, P, L> {}
