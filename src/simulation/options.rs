//! Construction options for a simulator.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{CoinPublicKey, ContractAddress};
use crate::witness::WitnessTable;

/// Identity and address seeds, in their textual (hex) form.
///
/// Unset fields fall back to the blueprint defaults: the zero key for the caller and a
/// freshly sampled contract address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// Hex-encoded coin public key of the default caller.
    pub coin_public_key: Option<String>,
    /// Hex-encoded contract address.
    pub contract_address: Option<String>,
}

impl SeedConfig {
    /// Load seeds from a JSON object.
    pub fn from_json(input: &str) -> Result<Self, ValidationError> {
        let seeds: Self = serde_json::from_str(input).map_err(|e| ValidationError::InvalidConfig {
            reason: format!("seed config: {e}"),
        })?;
        seeds.validate()?;
        Ok(seeds)
    }

    /// Validate seeds.
    ///
    /// This is called by the blueprint before any contract code runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.coin_public_key()?;
        self.contract_address()?;
        Ok(())
    }

    /// The parsed caller key, if set.
    pub fn coin_public_key(&self) -> Result<Option<CoinPublicKey>, ValidationError> {
        self.coin_public_key
            .as_deref()
            .map(CoinPublicKey::from_hex)
            .transpose()
    }

    /// The parsed contract address, if set.
    pub fn contract_address(&self) -> Result<Option<ContractAddress>, ValidationError> {
        self.contract_address
            .as_deref()
            .map(ContractAddress::from_hex)
            .transpose()
    }
}

/// Optional overrides applied when building a simulator.
#[derive(Debug, Clone)]
pub struct SimulatorOptions<P, L> {
    /// Initial private state; defaults to the blueprint's producer.
    pub private_state: Option<P>,
    /// Witness table; defaults to the blueprint's producer.
    pub witnesses: Option<WitnessTable<P, L>>,
    /// Identity and address seeds.
    pub seeds: SeedConfig,
    /// Call journal capacity; zero disables the journal.
    pub history_limit: Option<usize>,
}

impl<P, L> Default for SimulatorOptions<P, L> {
    fn default() -> Self {
        Self {
            private_state: None,
            witnesses: None,
            seeds: SeedConfig::default(),
            history_limit: None,
        }
    }
}

impl<P, L> SimulatorOptions<P, L> {
    /// Options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a specific private state.
    #[must_use]
    pub fn with_private_state(mut self, private_state: P) -> Self {
        self.private_state = Some(private_state);
        self
    }

    /// Use a specific witness table.
    #[must_use]
    pub fn with_witnesses(mut self, witnesses: WitnessTable<P, L>) -> Self {
        self.witnesses = Some(witnesses);
        self
    }

    /// Seed the default caller.
    #[must_use]
    pub fn with_coin_public_key(mut self, key: CoinPublicKey) -> Self {
        self.seeds.coin_public_key = Some(key.to_hex());
        self
    }

    /// Seed the contract address.
    #[must_use]
    pub fn with_contract_address(mut self, address: ContractAddress) -> Self {
        self.seeds.contract_address = Some(address.to_hex());
        self
    }

    /// Bound the call journal to `limit` records. Zero turns it off.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Replace all seeds.
    #[must_use]
    pub fn with_seeds(mut self, seeds: SeedConfig) -> Self {
        self.seeds = seeds;
        self
    }
}
