//! Per-phase transient context and the bounded phase history.
//!
//! A [`PhaseContext`] is opened when a phase starts and finalized when the
//! phase ends. Its data bag carries phase-local flags such as
//! [`NEEDS_RUNOFF`]; values are `i64` with booleans stored as 0/1.
//! Completed contexts are appended to [`PhaseHistory`], a bounded FIFO that
//! evicts its oldest entry once the configured cap is reached.

use chrono::{DateTime, Utc};
use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::catalog::PhaseId;

/// Context flag: the vote tied and the game must route to the runoff phase.
pub const NEEDS_RUNOFF: &str = "needs_runoff";

/// Lifecycle of a phase context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// The phase is currently open.
    InProgress,
    /// The phase ended and the context is archived.
    Completed,
}

/// Transient data for one phase instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseContext {
    /// The phase this context belongs to.
    pub phase: PhaseId,
    /// The turn active when the context was opened.
    pub turn: u32,
    /// When the phase started.
    pub started_at: DateTime<Utc>,
    /// When the phase ended; `None` while the phase is open.
    pub ended_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: PhaseStatus,
    /// Phase-specific flags and counters. Booleans are 0/1.
    data: FxHashMap<String, i64>,
}

impl PhaseContext {
    /// Open a fresh context for a phase instance.
    #[must_use]
    pub fn open(phase: PhaseId, turn: u32) -> Self {
        Self {
            phase,
            turn,
            started_at: Utc::now(),
            ended_at: None,
            status: PhaseStatus::InProgress,
            data: FxHashMap::default(),
        }
    }

    /// Finalize the context: mark completed and stamp the end time.
    pub fn complete(&mut self) {
        self.status = PhaseStatus::Completed;
        self.ended_at = Some(Utc::now());
    }

    /// Get a data value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<i64> {
        self.data.get(key).copied()
    }

    /// Read a boolean flag (absent counts as false).
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).unwrap_or(0) != 0
    }

    /// Set a data value.
    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.data.insert(key.into(), value);
    }

    /// Set a boolean flag.
    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, i64::from(value));
    }

    /// Shallow-merge entries into the data bag; existing keys are overwritten.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = (String, i64)>) {
        self.data.extend(entries);
    }

    /// Replace the data bag wholesale.
    pub fn replace_data(&mut self, entries: impl IntoIterator<Item = (String, i64)>) {
        self.data = entries.into_iter().collect();
    }

    /// Number of entries in the data bag.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}

/// Bounded FIFO of completed phase contexts.
///
/// Backed by `im::Vector`, so cloning the history for a turn snapshot is
/// O(1).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseHistory {
    entries: Vector<PhaseContext>,
    limit: usize,
}

impl PhaseHistory {
    /// Create a history retaining at most `limit` contexts.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vector::new(),
            limit: limit.max(1),
        }
    }

    /// Append a completed context, evicting the oldest past the cap.
    pub fn push(&mut self, context: PhaseContext) {
        self.entries.push_back(context);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// The most recently archived context.
    #[must_use]
    pub fn latest(&self) -> Option<&PhaseContext> {
        self.entries.last()
    }

    /// Number of retained contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the history empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &PhaseContext> {
        self.entries.iter()
    }
}
