//! Phase definitions.
//!
//! A [`Phase`] is immutable once constructed: it declares which action kinds
//! are legal while the phase is open, which of those must be satisfied
//! before moving on, an optional time limit for the GM's clock, and what
//! observers are allowed to see. Phases are registered with the
//! [`PhaseManager`](super::PhaseManager) at engine initialization (the
//! standard catalog) or explicitly at runtime, and only referenced after
//! that.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;

/// Phase identifier. Unique string id within one game.
///
/// The engine treats ids as opaque; the standard catalog uses the names in
/// [`ids`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseId(String);

impl PhaseId {
    /// Create a phase id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PhaseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PhaseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Standard phase ids.
pub mod ids {
    /// Night: role abilities fire.
    pub const NIGHT: &str = "night";
    /// Day: open discussion.
    pub const DAY: &str = "day";
    /// Vote: choose the execution candidate.
    pub const VOTE: &str = "vote";
    /// Runoff vote after a tie.
    pub const RUNOFF_VOTE: &str = "runoff_vote";
    /// Execution of the vote result.
    pub const EXECUTION: &str = "execution";
    /// Terminal phase: the game is over.
    pub const EPILOGUE: &str = "epilogue";
}

/// What observers may see while a phase is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    /// Is the main chat open to everyone?
    pub open_chat: bool,
    /// Are registered actions visible to observers?
    pub reveal_actions: bool,
    /// Are individual votes visible, or only the tally?
    pub reveal_votes: bool,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            open_chat: true,
            reveal_actions: false,
            reveal_votes: false,
        }
    }
}

impl VisibilityPolicy {
    /// Policy for hidden phases: closed chat, nothing revealed.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            open_chat: false,
            reveal_actions: false,
            reveal_votes: false,
        }
    }
}

/// An immutable phase definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique phase id.
    pub id: PhaseId,
    /// Human-readable name for the GM.
    pub display_name: String,
    /// Action kinds that may be registered while this phase is open.
    pub allowed_actions: Vec<ActionKind>,
    /// Subset of `allowed_actions` that must be satisfied before moving on.
    pub required_actions: Vec<ActionKind>,
    /// Optional wall-clock limit for the GM's timer.
    pub time_limit: Option<Duration>,
    /// Observer visibility flags.
    pub visibility: VisibilityPolicy,
}

impl Phase {
    /// Create a phase with no allowed actions and default visibility.
    pub fn new(id: impl Into<PhaseId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            allowed_actions: Vec::new(),
            required_actions: Vec::new(),
            time_limit: None,
            visibility: VisibilityPolicy::default(),
        }
    }

    /// Allow an action kind (builder).
    #[must_use]
    pub fn allow(mut self, kind: ActionKind) -> Self {
        if !self.allowed_actions.contains(&kind) {
            self.allowed_actions.push(kind);
        }
        self
    }

    /// Require an action kind; implies allowing it (builder).
    #[must_use]
    pub fn require(mut self, kind: ActionKind) -> Self {
        if !self.allowed_actions.contains(&kind) {
            self.allowed_actions.push(kind.clone());
        }
        if !self.required_actions.contains(&kind) {
            self.required_actions.push(kind);
        }
        self
    }

    /// Set the time limit (builder).
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Set the visibility policy (builder).
    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilityPolicy) -> Self {
        self.visibility = visibility;
        self
    }

    /// Is the kind legal in this phase?
    #[must_use]
    pub fn allows(&self, kind: &ActionKind) -> bool {
        self.allowed_actions.contains(kind)
    }
}

/// The standard six-phase catalog.
///
/// night -> day -> vote -> (runoff_vote) -> execution -> night, with
/// `epilogue` as the terminal phase.
#[must_use]
pub fn standard_catalog() -> Vec<Phase> {
    vec![
        Phase::new(ids::NIGHT, "Night")
            .allow(ActionKind::Fortune)
            .allow(ActionKind::Guard)
            .require(ActionKind::Attack)
            .with_visibility(VisibilityPolicy::hidden()),
        Phase::new(ids::DAY, "Day").with_time_limit(Duration::from_secs(300)),
        Phase::new(ids::VOTE, "Vote").with_time_limit(Duration::from_secs(60)),
        Phase::new(ids::RUNOFF_VOTE, "Runoff Vote").with_time_limit(Duration::from_secs(60)),
        Phase::new(ids::EXECUTION, "Execution"),
        Phase::new(ids::EPILOGUE, "Epilogue").with_visibility(VisibilityPolicy {
            open_chat: true,
            reveal_actions: true,
            reveal_votes: true,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_builder() {
        let phase = Phase::new("night", "Night")
            .allow(ActionKind::Fortune)
            .require(ActionKind::Attack);

        assert!(phase.allows(&ActionKind::Fortune));
        assert!(phase.allows(&ActionKind::Attack));
        assert!(!phase.allows(&ActionKind::Guard));
        assert_eq!(phase.required_actions, vec![ActionKind::Attack]);
    }

    #[test]
    fn test_require_implies_allow() {
        let phase = Phase::new("night", "Night").require(ActionKind::Guard);
        assert!(phase.allows(&ActionKind::Guard));
    }

    #[test]
    fn test_allow_is_idempotent() {
        let phase = Phase::new("night", "Night")
            .allow(ActionKind::Fortune)
            .allow(ActionKind::Fortune);
        assert_eq!(phase.allowed_actions.len(), 1);
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = standard_catalog();
        assert_eq!(catalog.len(), 6);

        let night = catalog.iter().find(|p| p.id.as_str() == ids::NIGHT).unwrap();
        assert!(night.allows(&ActionKind::Attack));
        assert!(!night.visibility.open_chat);

        let epilogue = catalog.iter().find(|p| p.id.as_str() == ids::EPILOGUE).unwrap();
        assert!(epilogue.visibility.reveal_votes);
    }

    #[test]
    fn test_phase_id_display() {
        assert_eq!(PhaseId::from("vote").to_string(), "vote");
        assert_eq!(PhaseId::new("night").as_str(), "night");
    }
}
