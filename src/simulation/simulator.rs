//! The simulator: contextless access to a contract's circuits.
//!
//! Key invariants:
//! - Exactly one live `CircuitContext`, owned by the context manager.
//! - The single-use caller override is consumed by the next invocation of either kind,
//!   including one that names an unknown circuit.
//! - Replacing witnesses rebuilds the contract and drops cached proxies; the context is
//!   carried over untouched.
//! - Public state is derived from the ledger on every read.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::context::{CircuitContext, WitnessContext};
use crate::contract::{CircuitKind, Contract};
use crate::error::{ContractResult, SimError, SimResult, ValidationError};
use crate::identity::{CoinPublicKey, ContractAddress, IdentityState};
use crate::value::Value;
use crate::witness::WitnessTable;

use super::blueprint::{ContractFactory, PublicStateFn};
use super::caller::CallerOverrides;
use super::context_manager::ContextManager;
use super::history::{CallHistory, CallOutcome, CallRecord};
use super::proxy::ProxyCache;

type PrivateOf<C> = <C as Contract>::PrivateState;
type LedgerOf<C> = <C as Contract>::Ledger;

/// A live simulation of one contract instance.
///
/// Built by [`crate::SimulatorBlueprint::build`]. `Pub` is the public state the
/// blueprint's extractor derives from the ledger.
pub struct Simulator<C: Contract, Pub> {
    contract: C,
    contract_factory: ContractFactory<C>,
    witnesses: WitnessTable<PrivateOf<C>, LedgerOf<C>>,
    public_state: PublicStateFn<C, Pub>,
    context: ContextManager<PrivateOf<C>, LedgerOf<C>>,
    caller: CallerOverrides,
    proxies: ProxyCache<PrivateOf<C>, LedgerOf<C>>,
    history: CallHistory,
    contract_address: ContractAddress,
}

impl<C: Contract, Pub> Simulator<C, Pub> {
    pub(crate) fn from_parts(
        contract: C,
        contract_factory: ContractFactory<C>,
        witnesses: WitnessTable<PrivateOf<C>, LedgerOf<C>>,
        public_state: PublicStateFn<C, Pub>,
        context: ContextManager<PrivateOf<C>, LedgerOf<C>>,
        history: CallHistory,
    ) -> Self {
        let contract_address = context.ledger().address;
        Self {
            contract,
            contract_factory,
            witnesses,
            public_state,
            context,
            caller: CallerOverrides::new(),
            proxies: ProxyCache::new(),
            history,
            contract_address,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Address the contract was deployed at. Fixed for the simulator's lifetime.
    #[must_use]
    pub const fn contract_address(&self) -> ContractAddress {
        self.contract_address
    }

    /// Current private state.
    #[must_use]
    pub fn private_state(&self) -> &PrivateOf<C> {
        self.context.private_state()
    }

    /// Public state derived from the current ledger.
    #[must_use]
    pub fn public_state(&self) -> Pub {
        (self.public_state)(&self.context.ledger().state)
    }

    /// Raw ledger state.
    #[must_use]
    pub fn contract_state(&self) -> &LedgerOf<C> {
        &self.context.ledger().state
    }

    /// The stored circuit context.
    #[must_use]
    pub fn context(&self) -> &CircuitContext<PrivateOf<C>, LedgerOf<C>> {
        self.context.context()
    }

    /// Replace the private state directly. Ledger and identity are untouched.
    pub fn update_private_state(&mut self, private_state: PrivateOf<C>) {
        self.context.update_private_state(private_state);
    }

    // ------------------------------------------------------------------
    // Caller
    // ------------------------------------------------------------------

    /// Invoke the next circuit, and only the next, as `caller`.
    pub fn as_caller(&mut self, caller: CoinPublicKey) -> &mut Self {
        self.caller.set_single_use(caller);
        self
    }

    /// Invoke every following circuit as `caller`, or stop doing so with `None`.
    pub fn set_persistent_caller(&mut self, caller: Option<CoinPublicKey>) {
        self.caller.set_persistent(caller);
    }

    /// Clear both caller overrides.
    pub fn reset_caller(&mut self) {
        self.caller.reset();
    }

    /// Identity the next invocation would observe. Does not consume anything.
    #[must_use]
    pub fn caller_context(&self) -> IdentityState {
        self.caller.effective_identity(self.context.context())
    }

    /// Current override slots.
    #[must_use]
    pub const fn caller_overrides(&self) -> &CallerOverrides {
        &self.caller
    }

    // ------------------------------------------------------------------
    // Witnesses
    // ------------------------------------------------------------------

    /// Replace one witness. Takes effect from the next invocation.
    pub fn override_witness<F>(&mut self, name: &str, witness: F) -> SimResult<()>
    where
        F: Fn(WitnessContext<'_, PrivateOf<C>, LedgerOf<C>>, &[Value]) -> ContractResult<(PrivateOf<C>, Value)>
            + Send
            + Sync
            + 'static,
    {
        if name.is_empty() {
            return Err(ValidationError::EmptyName {
                what: "Witness".to_string(),
            }
            .into());
        }

        let replaced = self.witnesses.insert(name, witness).is_some();
        debug!(witness = name, replaced, "overriding witness");
        self.rebuild_contract();
        Ok(())
    }

    /// The active witness table.
    #[must_use]
    pub const fn witnesses(&self) -> &WitnessTable<PrivateOf<C>, LedgerOf<C>> {
        &self.witnesses
    }

    /// Replace the whole witness table.
    pub fn set_witnesses(&mut self, witnesses: WitnessTable<PrivateOf<C>, LedgerOf<C>>) {
        debug!(witnesses = witnesses.len(), "replacing witness table");
        self.witnesses = witnesses;
        self.rebuild_contract();
    }

    fn rebuild_contract(&mut self) {
        self.contract = (self.contract_factory)(self.witnesses.clone());
        self.proxies.invalidate();
        debug!(address = %self.contract_address, "rebuilt contract");
    }

    // ------------------------------------------------------------------
    // Circuits
    // ------------------------------------------------------------------

    /// Call a pure circuit. Nothing is written back.
    pub fn pure(&mut self, name: &str, args: &[Value]) -> SimResult<Value> {
        let table = self.proxies.pure(&self.contract);
        let Some(proxy) = table.get(name) else {
            return Err(self.unknown(name, CircuitKind::Pure));
        };

        let caller = self.caller.effective_identity(self.context.context()).coin_public_key;
        debug!(circuit = name, kind = %CircuitKind::Pure, caller = %caller, "dispatching");

        let result = proxy.call(&self.context, &mut self.caller, args);
        self.finish(name, CircuitKind::Pure, caller, result, CallOutcome::Discarded)
    }

    /// Call an impure circuit and commit its context on success.
    pub fn impure(&mut self, name: &str, args: &[Value]) -> SimResult<Value> {
        let table = self.proxies.impure(&self.contract);
        let Some(proxy) = table.get(name) else {
            return Err(self.unknown(name, CircuitKind::Impure));
        };

        let caller = self.caller.effective_identity(self.context.context()).coin_public_key;
        debug!(circuit = name, kind = %CircuitKind::Impure, caller = %caller, "dispatching");

        let result = proxy.call(&mut self.context, &mut self.caller, args);
        self.finish(name, CircuitKind::Impure, caller, result, CallOutcome::Committed)
    }

    fn unknown(&mut self, name: &str, kind: CircuitKind) -> SimError {
        self.caller.clear_single_use();
        debug!(circuit = name, %kind, "unknown circuit");
        SimError::UnknownCircuit {
            name: name.to_string(),
            kind,
        }
    }

    fn finish(
        &mut self,
        name: &str,
        kind: CircuitKind,
        caller: CoinPublicKey,
        result: SimResult<Value>,
        success: CallOutcome,
    ) -> SimResult<Value> {
        let outcome = match &result {
            Ok(_) => success,
            Err(err) => {
                debug!(circuit = name, %kind, error = %err, "circuit failed");
                CallOutcome::Failed(err.to_string())
            }
        };
        debug!(circuit = name, %kind, ?outcome, "call finished");
        self.history.record(name, kind, caller, outcome);
        result
    }

    /// Names of the pure circuits, ascending.
    pub fn pure_circuit_names(&mut self) -> Vec<String> {
        self.proxies.pure(&self.contract).names().map(str::to_string).collect()
    }

    /// Names of the impure circuits, ascending.
    pub fn impure_circuit_names(&mut self) -> Vec<String> {
        self.proxies.impure(&self.contract).names().map(str::to_string).collect()
    }

    /// Lazily built proxy tables.
    #[must_use]
    pub const fn proxy_cache(&self) -> &ProxyCache<PrivateOf<C>, LedgerOf<C>> {
        &self.proxies
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Retained calls, oldest first. Older calls are evicted past the journal limit.
    #[must_use]
    pub const fn history(&self) -> &VecDeque<CallRecord> {
        self.history.records()
    }

    /// The call journal, including its limit and eviction count.
    #[must_use]
    pub const fn call_history(&self) -> &CallHistory {
        &self.history
    }

    /// Forget recorded calls. State is unaffected.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl<C, Pub> fmt::Debug for Simulator<C, Pub>
where
    C: Contract,
    PrivateOf<C>: fmt::Debug,
    LedgerOf<C>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("contract", &std::any::type_name::<C>())
            .field("contract_address", &self.contract_address)
            .field("context", self.context.context())
            .field("caller", &self.caller)
            .field("witnesses", &self.witnesses)
            .field("proxies", &self.proxies)
            .field("history", &self.history.len())
            .finish()
    }
}
