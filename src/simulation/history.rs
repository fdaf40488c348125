//! Journal of circuit invocations made through a simulator.
//!
//! The journal is bounded: once `limit` records are held, each new record evicts the
//! oldest. A limit of zero disables recording entirely.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::CircuitKind;
use crate::identity::CoinPublicKey;

/// What happened to the context as a result of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum CallOutcome {
    /// Impure call succeeded and its context was committed.
    Committed,
    /// Pure call succeeded; nothing was written back.
    Discarded,
    /// The call failed; nothing was written back.
    Failed(String),
}

impl CallOutcome {
    /// Returns true unless the call failed.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Unique id of the call.
    pub id: Uuid,
    /// Circuit name.
    pub circuit: String,
    /// Circuit kind.
    pub kind: CircuitKind,
    /// Caller the circuit observed.
    pub caller: CoinPublicKey,
    /// Result of the call.
    pub outcome: CallOutcome,
    /// When the call completed.
    pub at: DateTime<Utc>,
}

/// Records kept when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 1_024;

/// Bounded list of call records, oldest first.
#[derive(Debug, Clone)]
pub struct CallHistory {
    records: VecDeque<CallRecord>,
    limit: usize,
    evicted: u64,
}

impl Default for CallHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CallHistory {
    /// An empty journal holding at most [`DEFAULT_HISTORY_LIMIT`] records.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// An empty journal holding at most `limit` records; zero disables recording.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
            evicted: 0,
        }
    }

    /// Append a record for a completed call, evicting the oldest if full.
    pub fn record(&mut self, circuit: &str, kind: CircuitKind, caller: CoinPublicKey, outcome: CallOutcome) {
        if self.limit == 0 {
            return;
        }
        if self.records.len() == self.limit {
            self.records.pop_front();
            self.evicted += 1;
        }
        self.records.push_back(CallRecord {
            id: Uuid::new_v4(),
            circuit: circuit.to_string(),
            kind,
            caller,
            outcome,
            at: Utc::now(),
        });
    }

    /// Retained records, oldest first.
    #[must_use]
    pub const fn records(&self) -> &VecDeque<CallRecord> {
        &self.records
    }

    /// Maximum number of retained records.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Records dropped to stay within the limit.
    #[must_use]
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Returns true if calls are being recorded at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Records for one circuit, oldest first.
    pub fn for_circuit<'a>(&'a self, circuit: &'a str) -> impl Iterator<Item = &'a CallRecord> + 'a {
        self.records.iter().filter(move |r| r.circuit == circuit)
    }

    /// Drop all records. The limit is kept.
    pub fn clear(&mut self) {
        self.records.clear();
        self.evicted = 0;
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
