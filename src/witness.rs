//! Witness (oracle) tables.
//!
//! A witness is an externally supplied computation that a circuit consults by name. The
//! contract binds its table when it is constructed; replacing an entry therefore means
//! constructing the contract again, which the simulator takes care of.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::WitnessContext;
use crate::error::{ContractError, ContractResult};
use crate::value::Value;

/// A witness implementation: returns the replacement private state and its value.
pub type WitnessFn<P, L> =
    Arc<dyn Fn(WitnessContext<'_, P, L>, &[Value]) -> ContractResult<(P, Value)> + Send + Sync>;

/// Mapping of witness name to implementation.
pub struct WitnessTable<P, L> {
    entries: BTreeMap<String, WitnessFn<P, L>>,
}

impl<P, L> WitnessTable<P, L> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, witness: F) -> Self
    where
        F: Fn(WitnessContext<'_, P, L>, &[Value]) -> ContractResult<(P, Value)> + Send + Sync + 'static,
    {
        self.insert(name, witness);
        self
    }

    /// Insert or replace a witness, returning the previous implementation.
    pub fn insert<F>(&mut self, name: impl Into<String>, witness: F) -> Option<WitnessFn<P, L>>
    where
        F: Fn(WitnessContext<'_, P, L>, &[Value]) -> ContractResult<(P, Value)> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(witness))
    }

    /// Look up a witness.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&WitnessFn<P, L>> {
        self.entries.get(name)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered witnesses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no witness is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke the witness registered under `name`.
    pub fn call(&self, name: &str, ctx: WitnessContext<'_, P, L>, args: &[Value]) -> ContractResult<(P, Value)> {
        let witness = self.entries.get(name).ok_or_else(|| ContractError::MissingWitness {
            name: name.to_string(),
        })?;
        witness(ctx, args)
    }
}

impl<P, L> Default for WitnessTable<P, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> Clone for WitnessTable<P, L> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<P, L> fmt::Debug for WitnessTable<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WitnessTable")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
