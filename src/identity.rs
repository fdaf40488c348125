//! Caller identities and contract addresses.
//!
//! Both are 32-byte values rendered as lowercase hex. Deterministic values for tests
//! are derived from a human-readable label with BLAKE3, so `CoinPublicKey::from_seed("alice")`
//! is stable across runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::ValidationError;

/// Byte length of keys and addresses.
pub const ID_LEN: usize = 32;

fn decode_hex32(field: &str, input: &str) -> Result<[u8; ID_LEN], ValidationError> {
    let bytes = hex::decode(input.trim()).map_err(|e| ValidationError::InvalidHex {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    <[u8; ID_LEN]>::try_from(bytes.as_slice()).map_err(|_| ValidationError::InvalidLength {
        field: field.to_string(),
        expected: ID_LEN,
        actual: bytes.len(),
    })
}

fn derive(domain: &str, seed: &str) -> [u8; ID_LEN] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain.as_bytes());
    hasher.update(&[0]);
    hasher.update(seed.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Public key identifying the party that invokes a circuit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CoinPublicKey([u8; ID_LEN]);

impl CoinPublicKey {
    /// The all-zero key, used as the default caller.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; ID_LEN])
    }

    /// Wrap raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic key from a label.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        Self(derive("ledgersim.coin_public_key", seed))
    }

    /// Parse a 64-character hex key.
    pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
        decode_hex32("coin_public_key", input).map(Self)
    }

    /// Raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Address of a deployed (or simulated) contract.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractAddress([u8; ID_LEN]);

impl ContractAddress {
    /// Wrap raw address bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic address from a label.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        Self(derive("ledgersim.contract_address", seed))
    }

    /// A fresh random address.
    #[must_use]
    pub fn sample() -> Self {
        Self::from_seed(&Uuid::new_v4().to_string())
    }

    /// Parse a 64-character hex address.
    pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
        decode_hex32("contract_address", input).map(Self)
    }

    /// Raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

macro_rules! hex_formatting {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.to_hex())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_formatting!(CoinPublicKey);
hex_formatting!(ContractAddress);

/// Local state of the invoking party.
///
/// A caller override replaces this wholesale with a fresh state for the override key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityState {
    /// Key of the invoking party.
    pub coin_public_key: CoinPublicKey,
    /// Index of the next output the party would produce.
    pub current_index: u64,
}

impl IdentityState {
    /// Fresh local state for `coin_public_key`.
    #[must_use]
    pub const fn new(coin_public_key: CoinPublicKey) -> Self {
        Self {
            coin_public_key,
            current_index: 0,
        }
    }
}
