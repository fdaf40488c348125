//! The contract engine seen by the simulator.
//!
//! A contract supplies an initializer and a named table of circuits. Each circuit is
//! tagged as pure or impure: pure circuits read a context and return a value, impure
//! circuits consume a context and hand back its replacement alongside the value.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{CircuitContext, ConstructorContext, ConstructorResult};
use crate::error::ContractResult;
use crate::value::Value;

/// Whether a circuit may change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitKind {
    /// Read-only.
    Pure,
    /// State-mutating.
    Impure,
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pure => f.write_str("pure"),
            Self::Impure => f.write_str("impure"),
        }
    }
}

/// Output of an impure circuit.
#[derive(Debug, Clone)]
pub struct ImpureResults<P, L> {
    /// Value returned to the caller.
    pub result: Value,
    /// Replacement context.
    pub context: CircuitContext<P, L>,
}

/// Raw pure circuit.
pub type PureCircuit<P, L> =
    Arc<dyn Fn(&CircuitContext<P, L>, &[Value]) -> ContractResult<Value> + Send + Sync>;

/// Raw impure circuit.
pub type ImpureCircuit<P, L> =
    Arc<dyn Fn(CircuitContext<P, L>, &[Value]) -> ContractResult<ImpureResults<P, L>> + Send + Sync>;

/// A raw circuit, tagged by kind.
pub enum Circuit<P, L> {
    /// Read-only circuit.
    Pure(PureCircuit<P, L>),
    /// State-mutating circuit.
    Impure(ImpureCircuit<P, L>),
}

impl<P, L> Circuit<P, L> {
    /// The circuit's kind.
    #[must_use]
    pub const fn kind(&self) -> CircuitKind {
        match self {
            Self::Pure(_) => CircuitKind::Pure,
            Self::Impure(_) => CircuitKind::Impure,
        }
    }
}

impl<P, L> Clone for Circuit<P, L> {
    fn clone(&self) -> Self {
        match self {
            Self::Pure(f) => Self::Pure(Arc::clone(f)),
            Self::Impure(f) => Self::Impure(Arc::clone(f)),
        }
    }
}

impl<P, L> fmt::Debug for Circuit<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circuit::{}", self.kind())
    }
}

/// Named circuits exported by a contract.
pub struct CircuitTable<P, L> {
    circuits: BTreeMap<String, Circuit<P, L>>,
}

impl<P, L> CircuitTable<P, L> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            circuits: BTreeMap::new(),
        }
    }

    /// Register a pure circuit.
    #[must_use]
    pub fn pure<F>(mut self, name: impl Into<String>, circuit: F) -> Self
    where
        F: Fn(&CircuitContext<P, L>, &[Value]) -> ContractResult<Value> + Send + Sync + 'static,
    {
        self.circuits.insert(name.into(), Circuit::Pure(Arc::new(circuit)));
        self
    }

    /// Register an impure circuit.
    #[must_use]
    pub fn impure<F>(mut self, name: impl Into<String>, circuit: F) -> Self
    where
        F: Fn(CircuitContext<P, L>, &[Value]) -> ContractResult<ImpureResults<P, L>> + Send + Sync + 'static,
    {
        self.circuits.insert(name.into(), Circuit::Impure(Arc::new(circuit)));
        self
    }

    /// Look up a circuit.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Circuit<P, L>> {
        self.circuits.get(name)
    }

    /// Iterate circuits in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Circuit<P, L>)> {
        self.circuits.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Number of circuits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }
}

impl<P, L> Default for CircuitTable<P, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> fmt::Debug for CircuitTable<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.circuits.iter()).finish()
    }
}

/// A contract engine instance.
///
/// Implementations are normally constructed from a [`crate::WitnessTable`] and capture it
/// in the closures returned by [`Contract::circuits`].
pub trait Contract {
    /// Test-owned private state.
    type PrivateState: Clone + 'static;
    /// Raw ledger state.
    type Ledger: Clone + 'static;

    /// Run the contract's initializer. Called exactly once per simulator.
    fn initial_state(
        &self,
        ctx: ConstructorContext<Self::PrivateState>,
        args: &[Value],
    ) -> ContractResult<ConstructorResult<Self::PrivateState, Self::Ledger>>;

    /// The contract's circuits.
    fn circuits(&self) -> CircuitTable<Self::PrivateState, Self::Ledger>;
}
