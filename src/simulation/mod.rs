//! Simulation of contract circuits without a live execution engine.
//!
//! A [`SimulatorBlueprint`] is configured once per contract and builds independent
//! [`Simulator`] instances. Each simulator owns one circuit context, resolves the caller
//! identity for every invocation, and exposes the contract's circuits as plain calls.

pub mod blueprint;
pub mod caller;
pub mod context_manager;
pub mod history;
pub mod options;
pub mod proxy;
pub mod simulator;

pub use blueprint::{ContractFactory, PublicStateFn, SimulatorBlueprint, SimulatorBlueprintBuilder};
pub use caller::{CallerOverrides, Invocation};
pub use context_manager::ContextManager;
pub use history::{CallHistory, CallOutcome, CallRecord, DEFAULT_HISTORY_LIMIT};
pub use options::{SeedConfig, SimulatorOptions};
pub use proxy::{ImpureProxies, ImpureProxy, ProxyCache, ProxyTable, PureProxies, PureProxy};
pub use simulator::Simulator;
