//! Error types for ledgersim.
//!
//! All errors are strongly typed using thiserror. Errors raised by contract code
//! (`ContractError`) are kept distinct from the simulator's own failures so callers can
//! assert on exactly what a circuit reported.

use thiserror::Error;

use crate::contract::CircuitKind;

/// Validation errors for simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is not valid hex: {reason}")]
    InvalidHex {
        field: String,
        reason: String,
    },

    #[error("Field '{field}' has {actual} bytes, expected {expected}")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("{what} name cannot be empty")]
    EmptyName {
        what: String,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Errors raised by contract code: initializers, circuits and witnesses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("failed assert: {message}")]
    Assertion {
        message: String,
    },

    #[error("Missing argument at position {index}")]
    MissingArgument {
        index: usize,
    },

    #[error("Argument {index} has type {actual}, expected {expected}")]
    InvalidArgument {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Witness '{name}' is not registered")]
    MissingWitness {
        name: String,
    },

    #[error("Witness '{name}' failed: {message}")]
    Witness {
        name: String,
        message: String,
    },

    #[error("{message}")]
    Custom {
        message: String,
    },
}

impl ContractError {
    /// Creates an assertion failure, the usual way a circuit rejects a call.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Creates a free-form contract error.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Returns true if this is an assertion failure.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}

/// Top-level error type for ledgersim.
#[derive(Debug, Error)]
pub enum SimError {
    /// The contract initializer failed; no simulator exists.
    #[error("Contract initialization failed: {0}")]
    Construction(#[source] ContractError),

    /// A circuit failed. Displayed exactly as the contract reported it.
    #[error(transparent)]
    Operation(ContractError),

    #[error("No {kind} circuit named '{name}'")]
    UnknownCircuit {
        name: String,
        kind: CircuitKind,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SimError {
    /// Returns true if this is a construction error.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }

    /// Returns true if this is an operation error.
    #[must_use]
    pub const fn is_operation(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a circuit or initializer failed an assertion.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        match self {
            Self::Construction(e) | Self::Operation(e) => e.is_assertion(),
            _ => false,
        }
    }

    /// The contract error carried by this error, if any.
    #[must_use]
    pub const fn contract_error(&self) -> Option<&ContractError> {
        match self {
            Self::Construction(e) | Self::Operation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for contract code.
pub type ContractResult<T> = Result<T, ContractError>;

/// Result type alias for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_invalid_length() {
        let err = ValidationError::InvalidLength {
            field: "contract_address".to_string(),
            expected: 32,
            actual: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("contract_address"));
        assert!(msg.contains("32"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn test_contract_error_assertion_display() {
        let err = ContractError::assertion("Insufficient balance");
        assert_eq!(format!("{err}"), "failed assert: Insufficient balance");
        assert!(err.is_assertion());
    }

    #[test]
    fn test_operation_error_is_transparent() {
        let inner = ContractError::assertion("Insufficient balance");
        let err = SimError::Operation(inner.clone());
        assert_eq!(format!("{err}"), format!("{inner}"));
        assert_eq!(err.contract_error(), Some(&inner));
        assert!(err.is_operation());
        assert!(err.is_assertion());
    }

    #[test]
    fn test_construction_error_wraps_source() {
        let err = SimError::Construction(ContractError::custom("bad init"));
        assert!(err.is_construction());
        assert!(!err.is_assertion());
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("bad init"));
    }

    #[test]
    fn test_unknown_circuit_names_kind() {
        let err = SimError::UnknownCircuit {
            name: "mint".to_string(),
            kind: CircuitKind::Impure,
        };
        let msg = format!("{err}");
        assert!(msg.contains("impure"));
        assert!(msg.contains("mint"));
        assert!(err.contract_error().is_none());
    }

    #[test]
    fn test_sim_error_from_validation() {
        let err: SimError = ValidationError::MissingField {
            field: "public_state".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_operation());
    }
}
