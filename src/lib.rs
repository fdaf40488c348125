//! # ledgersim - State-transition simulation for contract circuits
//!
//! ledgersim drives a contract's circuits without its real execution engine. It keeps the
//! contract's private state, ledger state and caller identity in a single context, and
//! exposes every circuit as an ordinary call with that context threaded implicitly.
//!
//! ## Core Concepts
//!
//! - **Contract**: an initializer plus a named table of pure and impure circuits
//! - **CircuitContext**: private state, ledger handle and caller identity
//! - **Witness**: a named oracle the contract consults, replaceable at runtime
//! - **Simulator**: owns one context, commits impure results and discards pure ones
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledgersim::{CoinPublicKey, SimulatorBlueprint, Value};
//!
//! let blueprint = SimulatorBlueprint::<Counter, u64, u64>::builder()
//!     .contract(Counter::new)
//!     .default_private_state(CounterPrivate::default)
//!     .constructor_args(|start| vec![Value::Uint(start)])
//!     .public_state(|ledger: &CounterLedger| ledger.counter)
//!     .build()?;
//!
//! let mut sim = blueprint.deploy(0)?;
//! sim.impure("increment", &[])?;
//! sim.as_caller(CoinPublicKey::from_seed("alice")).impure("increment", &[])?;
//! assert_eq!(sim.public_state(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Shared vocabulary
pub mod error;
pub mod identity;
pub mod value;

// Contract collaborator
pub mod context;
pub mod contract;
pub mod witness;

// Simulator
pub mod simulation;

pub use context::{CircuitContext, ConstructorContext, ConstructorResult, LedgerHandle, WitnessContext};
pub use contract::{Circuit, CircuitKind, CircuitTable, Contract, ImpureCircuit, ImpureResults, PureCircuit};
pub use error::{ContractError, ContractResult, SimError, SimResult, ValidationError};
pub use identity::{CoinPublicKey, ContractAddress, IdentityState};
pub use simulation::{
    CallOutcome, CallRecord, SeedConfig, Simulator, SimulatorBlueprint, SimulatorBlueprintBuilder,
    SimulatorOptions,
};
pub use value::Value;
pub use witness::{WitnessFn, WitnessTable};
