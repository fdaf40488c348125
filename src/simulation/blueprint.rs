//! Simulator blueprints.
//!
//! A blueprint captures everything that is fixed for one contract: how to construct the
//! engine from a witness table, the default private state and witnesses, how typed
//! constructor arguments become circuit values, and how public state is read from the
//! ledger. Each `build` produces an independent simulator.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::contract::Contract;
use crate::error::{SimResult, ValidationError};
use crate::identity::{CoinPublicKey, ContractAddress};
use crate::value::Value;
use crate::witness::WitnessTable;

use super::context_manager::ContextManager;
use super::history::{CallHistory, DEFAULT_HISTORY_LIMIT};
use super::options::SimulatorOptions;
use super::simulator::Simulator;

type PrivateOf<C> = <C as Contract>::PrivateState;
type LedgerOf<C> = <C as Contract>::Ledger;

/// Builds an engine bound to a witness table.
pub type ContractFactory<C> = Arc<dyn Fn(WitnessTable<PrivateOf<C>, LedgerOf<C>>) -> C + Send + Sync>;

/// Derives public state from raw ledger state.
pub type PublicStateFn<C, Pub> = Arc<dyn Fn(&LedgerOf<C>) -> Pub + Send + Sync>;

type PrivateStateFn<C> = Arc<dyn Fn() -> PrivateOf<C> + Send + Sync>;
type WitnessesFn<C> = Arc<dyn Fn() -> WitnessTable<PrivateOf<C>, LedgerOf<C>> + Send + Sync>;
type ArgsFn<A> = Arc<dyn Fn(A) -> Vec<Value> + Send + Sync>;

/// Recipe for building simulators of contract `C`.
///
/// `Pub` is the extracted public state and `A` the typed constructor arguments.
pub struct SimulatorBlueprint<C: Contract, Pub, A> {
    contract_factory: ContractFactory<C>,
    default_private_state: PrivateStateFn<C>,
    constructor_args: ArgsFn<A>,
    public_state: PublicStateFn<C, Pub>,
    default_witnesses: WitnessesFn<C>,
}

impl<C: Contract, Pub, A> SimulatorBlueprint<C, Pub, A> {
    /// Start building a blueprint.
    #[must_use]
    pub fn builder() -> SimulatorBlueprintBuilder<C, Pub, A> {
        SimulatorBlueprintBuilder::default()
    }

    /// Build a simulator with all defaults.
    pub fn deploy(&self, args: A) -> SimResult<Simulator<C, Pub>> {
        self.build(args, SimulatorOptions::default())
    }

    /// Build a simulator, applying `options` over the blueprint defaults.
    ///
    /// Seeds are validated before any contract code runs. The contract initializer runs
    /// exactly once; if it fails no simulator is returned.
    pub fn build(
        &self,
        args: A,
        options: SimulatorOptions<PrivateOf<C>, LedgerOf<C>>,
    ) -> SimResult<Simulator<C, Pub>> {
        options.seeds.validate()?;
        let coin_public_key = options
            .seeds
            .coin_public_key()?
            .unwrap_or_else(CoinPublicKey::zero);
        let address = options
            .seeds
            .contract_address()?
            .unwrap_or_else(ContractAddress::sample);

        let private_state = options
            .private_state
            .unwrap_or_else(|| (self.default_private_state)());
        let witnesses = options
            .witnesses
            .unwrap_or_else(|| (self.default_witnesses)());

        let contract = (self.contract_factory)(witnesses.clone());
        let args = (self.constructor_args)(args);
        let context = ContextManager::initialize(&contract, private_state, coin_public_key, address, &args)?;

        let history = CallHistory::with_limit(options.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT));

        info!(
            address = %address,
            caller = %coin_public_key,
            witnesses = witnesses.len(),
            history_limit = history.limit(),
            "simulator ready"
        );

        Ok(Simulator::from_parts(
            contract,
            Arc::clone(&self.contract_factory),
            witnesses,
            Arc::clone(&self.public_state),
            context,
            history,
        ))
    }
}

impl<C: Contract, Pub, A> Clone for SimulatorBlueprint<C, Pub, A> {
    fn clone(&self) -> Self {
        Self {
            contract_factory: Arc::clone(&self.contract_factory),
            default_private_state: Arc::clone(&self.default_private_state),
            constructor_args: Arc::clone(&self.constructor_args),
            public_state: Arc::clone(&self.public_state),
            default_witnesses: Arc::clone(&self.default_witnesses),
        }
    }
}

impl<C: Contract, Pub, A> fmt::Debug for SimulatorBlueprint<C, Pub, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatorBlueprint")
            .field("contract", &std::any::type_name::<C>())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SimulatorBlueprint`].
pub struct SimulatorBlueprintBuilder<C: Contract, Pub, A> {
    contract_factory: Option<ContractFactory<C>>,
    default_private_state: Option<PrivateStateFn<C>>,
    constructor_args: Option<ArgsFn<A>>,
    public_state: Option<PublicStateFn<C, Pub>>,
    default_witnesses: Option<WitnessesFn<C>>,
}

impl<C: Contract, Pub, A> Default for SimulatorBlueprintBuilder<C, Pub, A> {
    fn default() -> Self {
        Self {
            contract_factory: None,
            default_private_state: None,
            constructor_args: None,
            public_state: None,
            default_witnesses: None,
        }
    }
}

impl<C: Contract, Pub, A> SimulatorBlueprintBuilder<C, Pub, A> {
    /// Engine constructor, called with the active witness table.
    #[must_use]
    pub fn contract<F>(mut self, factory: F) -> Self
    where
        F: Fn(WitnessTable<PrivateOf<C>, LedgerOf<C>>) -> C + Send + Sync + 'static,
    {
        self.contract_factory = Some(Arc::new(factory));
        self
    }

    /// Producer of the private state used when none is supplied.
    #[must_use]
    pub fn default_private_state<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> PrivateOf<C> + Send + Sync + 'static,
    {
        self.default_private_state = Some(Arc::new(producer));
        self
    }

    /// Transform from typed constructor arguments to circuit values.
    #[must_use]
    pub fn constructor_args<F>(mut self, transform: F) -> Self
    where
        F: Fn(A) -> Vec<Value> + Send + Sync + 'static,
    {
        self.constructor_args = Some(Arc::new(transform));
        self
    }

    /// Extractor deriving public state from the ledger.
    #[must_use]
    pub fn public_state<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&LedgerOf<C>) -> Pub + Send + Sync + 'static,
    {
        self.public_state = Some(Arc::new(extractor));
        self
    }

    /// Producer of the witness table used when none is supplied. Defaults to empty.
    #[must_use]
    pub fn default_witnesses<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> WitnessTable<PrivateOf<C>, LedgerOf<C>> + Send + Sync + 'static,
    {
        self.default_witnesses = Some(Arc::new(producer));
        self
    }

    /// Finish the blueprint.
    pub fn build(self) -> Result<SimulatorBlueprint<C, Pub, A>, ValidationError> {
        fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
            value.ok_or_else(|| ValidationError::MissingField {
                field: field.to_string(),
            })
        }

        let default_witnesses: WitnessesFn<C> = match self.default_witnesses {
            Some(producer) => producer,
            None => Arc::new(WitnessTable::new),
        };

        Ok(SimulatorBlueprint {
            contract_factory: required(self.contract_factory, "contract")?,
            default_private_state: required(self.default_private_state, "default_private_state")?,
            constructor_args: required(self.constructor_args, "constructor_args")?,
            public_state: required(self.public_state, "public_state")?,
            default_witnesses,
        })
    }
}
