//! Contextless proxies over a contract's raw circuits.
//!
//! Key invariants:
//! - Pure proxies never write anything back; the circuit only sees a snapshot.
//! - Impure proxies commit the returned context in one replace, and only on success.
//! - Both consume the single-use caller override before the circuit runs.
//! - Proxy tables are built lazily per kind and dropped by `ProxyCache::invalidate`
//!   whenever the contract instance they close over is replaced.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::contract::{Circuit, CircuitKind, Contract, ImpureCircuit, ImpureResults, PureCircuit};
use crate::error::{SimError, SimResult};
use crate::value::Value;

use super::caller::{CallerOverrides, Invocation};
use super::context_manager::ContextManager;

/// Contextless wrapper around a pure circuit.
pub struct PureProxy<P, L> {
    circuit: PureCircuit<P, L>,
}

impl<P: Clone, L: Clone> PureProxy<P, L> {
    /// Wrap a raw pure circuit.
    #[must_use]
    pub const fn new(circuit: PureCircuit<P, L>) -> Self {
        Self { circuit }
    }

    /// Invoke against a snapshot of the effective context and return only the result.
    pub fn call(
        &self,
        manager: &ContextManager<P, L>,
        caller: &mut CallerOverrides,
        args: &[Value],
    ) -> SimResult<Value> {
        let Invocation { context, .. } = caller.take_effective(manager.context());
        (self.circuit)(&context, args).map_err(SimError::Operation)
    }
}

/// Contextless wrapper around an impure circuit.
pub struct ImpureProxy<P, L> {
    circuit: ImpureCircuit<P, L>,
}

impl<P: Clone, L: Clone> ImpureProxy<P, L> {
    /// Wrap a raw impure circuit.
    #[must_use]
    pub const fn new(circuit: ImpureCircuit<P, L>) -> Self {
        Self { circuit }
    }

    /// Invoke against the effective context and commit the returned context.
    ///
    /// On failure nothing is committed. When an override supplied the caller, the stored
    /// identity is kept so the override does not outlive the invocation.
    pub fn call(
        &self,
        manager: &mut ContextManager<P, L>,
        caller: &mut CallerOverrides,
        args: &[Value],
    ) -> SimResult<Value> {
        let Invocation { context, overridden } = caller.take_effective(manager.context());
        let ImpureResults { result, context: mut next } =
            (self.circuit)(context, args).map_err(SimError::Operation)?;

        if overridden {
            next.identity = manager.context().identity.clone();
        }
        manager.set_context(next);
        Ok(result)
    }
}

/// Proxies of one kind, keyed by circuit name.
pub struct ProxyTable<T> {
    proxies: BTreeMap<String, T>,
}

impl<T> ProxyTable<T> {
    /// Look up a proxy.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.proxies.get(name)
    }

    /// Names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.proxies.keys().map(String::as_str)
    }

    /// Number of proxies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Returns true if there are no proxies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl<T> fmt::Debug for ProxyTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.proxies.keys()).finish()
    }
}

/// Pure proxy table.
pub type PureProxies<P, L> = ProxyTable<PureProxy<P, L>>;
/// Impure proxy table.
pub type ImpureProxies<P, L> = ProxyTable<ImpureProxy<P, L>>;

/// Lazily built proxy tables for one simulator.
pub struct ProxyCache<P, L> {
    pure: Option<Arc<PureProxies<P, L>>>,
    impure: Option<Arc<ImpureProxies<P, L>>>,
    builds: u64,
}

impl<P: Clone, L: Clone> ProxyCache<P, L> {
    /// An empty cache; nothing is built until first access.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pure: None,
            impure: None,
            builds: 0,
        }
    }

    /// The pure proxy table, building it from `contract` on first access.
    pub fn pure<C>(&mut self, contract: &C) -> Arc<PureProxies<P, L>>
    where
        C: Contract<PrivateState = P, Ledger = L>,
    {
        if let Some(table) = &self.pure {
            return Arc::clone(table);
        }

        let proxies = contract
            .circuits()
            .iter()
            .filter_map(|(name, circuit)| match circuit {
                Circuit::Pure(f) => Some((name.to_string(), PureProxy::new(Arc::clone(f)))),
                Circuit::Impure(_) => None,
            })
            .collect();
        let table = Arc::new(ProxyTable { proxies });
        self.record_build(CircuitKind::Pure, table.len());
        self.pure = Some(Arc::clone(&table));
        table
    }

    /// The impure proxy table, building it from `contract` on first access.
    pub fn impure<C>(&mut self, contract: &C) -> Arc<ImpureProxies<P, L>>
    where
        C: Contract<PrivateState = P, Ledger = L>,
    {
        if let Some(table) = &self.impure {
            return Arc::clone(table);
        }

        let proxies = contract
            .circuits()
            .iter()
            .filter_map(|(name, circuit)| match circuit {
                Circuit::Impure(f) => Some((name.to_string(), ImpureProxy::new(Arc::clone(f)))),
                Circuit::Pure(_) => None,
            })
            .collect();
        let table = Arc::new(ProxyTable { proxies });
        self.record_build(CircuitKind::Impure, table.len());
        self.impure = Some(Arc::clone(&table));
        table
    }

    fn record_build(&mut self, kind: CircuitKind, len: usize) {
        self.builds += 1;
        debug!(%kind, circuits = len, "built proxy table");
    }

    /// Drop both tables so the next access rebuilds them.
    pub fn invalidate(&mut self) {
        if self.pure.is_some() || self.impure.is_some() {
            debug!("invalidated proxy tables");
        }
        self.pure = None;
        self.impure = None;
    }

    /// Returns true if the table of `kind` is currently cached.
    #[must_use]
    pub const fn is_built(&self, kind: CircuitKind) -> bool {
        match kind {
            CircuitKind::Pure => self.pure.is_some(),
            CircuitKind::Impure => self.impure.is_some(),
        }
    }

    /// How many tables have been built over this cache's lifetime.
    #[must_use]
    pub const fn builds(&self) -> u64 {
        self.builds
    }
}

impl<P: Clone, L: Clone> Default for ProxyCache<P, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> fmt::Debug for ProxyCache<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCache")
            .field("pure", &self.pure.is_some())
            .field("impure", &self.impure.is_some())
            .field("builds", &self.builds)
            .finish()
    }
}
