//! Values passed into and returned from circuits.
//!
//! Circuits are dispatched by name, so their arguments and results travel as a single
//! tagged enum rather than per-circuit Rust signatures.

use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};
use crate::identity::{CoinPublicKey, ContractAddress};

/// A circuit argument or result.
///
/// # Examples
///
/// ```
/// use ledgersim::Value;
///
/// let amount = Value::Uint(10);
/// let flag = Value::Bool(true);
///
/// assert_eq!(amount.as_uint(), Some(10));
/// assert!(flag.is_bool());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Uint(u64),
    Bytes(Vec<u8>),
    String(String),
    Key(CoinPublicKey),
    Address(ContractAddress),
    List(Vec<Value>),
    #[default]
    Null,
}

impl Value {
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub const fn is_uint(&self) -> bool {
        matches!(self, Self::Uint(_))
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_key(&self) -> Option<CoinPublicKey> {
        match self {
            Self::Key(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_address(&self) -> Option<ContractAddress> {
        match self {
            Self::Address(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Key(_) => "key",
            Self::Address(_) => "address",
            Self::List(_) => "list",
            Self::Null => "null",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Key(v) => write!(f, "key:{v}"),
            Self::Address(v) => write!(f, "address:{v}"),
            Self::List(v) => write!(f, "list[{}]", v.len()),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<CoinPublicKey> for Value {
    fn from(v: CoinPublicKey) -> Self {
        Self::Key(v)
    }
}

impl From<ContractAddress> for Value {
    fn from(v: ContractAddress) -> Self {
        Self::Address(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

/// Positional argument access for circuit and witness bodies.
///
/// Each accessor reports `MissingArgument` or `InvalidArgument` as a `ContractError`,
/// so circuits can propagate with `?`.
pub mod args {
    use super::{CoinPublicKey, ContractError, ContractResult, Value};

    /// The argument at `index`.
    pub fn get(args: &[Value], index: usize) -> ContractResult<&Value> {
        args.get(index)
            .ok_or(ContractError::MissingArgument { index })
    }

    fn mismatch(index: usize, expected: &str, actual: &Value) -> ContractError {
        ContractError::InvalidArgument {
            index,
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    /// The argument at `index` as an unsigned integer.
    pub fn uint(args: &[Value], index: usize) -> ContractResult<u64> {
        let value = get(args, index)?;
        value.as_uint().ok_or_else(|| mismatch(index, "uint", value))
    }

    /// The argument at `index` as a boolean.
    pub fn bool(args: &[Value], index: usize) -> ContractResult<bool> {
        let value = get(args, index)?;
        value.as_bool().ok_or_else(|| mismatch(index, "bool", value))
    }

    /// The argument at `index` as a byte string.
    pub fn bytes(args: &[Value], index: usize) -> ContractResult<&[u8]> {
        let value = get(args, index)?;
        value.as_bytes().ok_or_else(|| mismatch(index, "bytes", value))
    }

    /// The argument at `index` as a coin public key.
    pub fn key(args: &[Value], index: usize) -> ContractResult<CoinPublicKey> {
        let value = get(args, index)?;
        value.as_key().ok_or_else(|| mismatch(index, "key", value))
    }
}
