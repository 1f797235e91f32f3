//! Night action entities.
//!
//! An [`Action`] is one registered intent: an actor using a role ability
//! against a target on a specific turn. Actions are owned by the
//! [`ActionManager`](super::ActionManager) for the lifetime of the game and
//! are never deleted - execution and cancellation are mutually exclusive
//! terminal states, each reached at most once.

use serde::{Deserialize, Serialize};

use crate::core::{FortuneReading, PlayerId};

/// Unique identifier for a registered action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

impl ActionId {
    /// Create a new action ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action({})", self.0)
    }
}

/// Kind of night action.
///
/// The built-in set covers the standard cast; `Custom` lets a game register
/// additional kinds without touching the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Divine a target's side (seer).
    Fortune,
    /// Protect a target for the night (knight).
    Guard,
    /// Vote on the pack's attack target (werewolf).
    Attack,
    /// Game-specific kind, processed after the built-ins.
    Custom(String),
}

impl ActionKind {
    /// Canonical string form (used in event names).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Fortune => "fortune",
            ActionKind::Guard => "guard",
            ActionKind::Attack => "attack",
            ActionKind::Custom(name) => name.as_str(),
        }
    }

    /// Default execution priority. Higher executes first.
    ///
    /// The defaults order execution the same way results are processed:
    /// fortune, then guard, then attack, then customs.
    #[must_use]
    pub fn default_priority(&self) -> i32 {
        match self {
            ActionKind::Fortune => 100,
            ActionKind::Guard => 80,
            ActionKind::Attack => 60,
            ActionKind::Custom(_) => 10,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ActionKind {
    fn from(name: &str) -> Self {
        match name {
            "fortune" => ActionKind::Fortune,
            "guard" => ActionKind::Guard,
            "attack" => ActionKind::Attack,
            other => ActionKind::Custom(other.to_string()),
        }
    }
}

/// How the night attack resolved against its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackResolution {
    /// The target died.
    Killed,
    /// A knight protected the target.
    Guarded,
    /// The target's role shrugs off attacks (fox).
    Immune,
    /// The target was dead before the attack resolved.
    TargetAlreadyDead,
}

/// Outcome payload of an executed (or refused) action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The action was already executed or cancelled.
    NotExecutable,
    /// The game ended abnormally; the action was cancelled wholesale.
    Aborted,
    /// The target was already dead; nothing happened.
    AlreadyDead,
    /// A divination result. `fox_cursed` marks the curse cascade.
    Fortune {
        reading: FortuneReading,
        fox_cursed: bool,
    },
    /// The guard is in place; the protection flag is applied during
    /// result processing.
    Guard,
    /// The attack executed. `resolution` stays `None` until result
    /// processing settles guard/immunity/kill.
    Attack {
        resolution: Option<AttackResolution>,
    },
    /// A custom action ran; its semantics live in the game's processor.
    Completed,
    /// Execution failed internally; the batch carried on without it.
    Failed { reason: String },
}

impl ActionOutcome {
    /// Did the action execute and take effect?
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            ActionOutcome::NotExecutable
            | ActionOutcome::Aborted
            | ActionOutcome::AlreadyDead
            | ActionOutcome::Failed { .. } => false,
            ActionOutcome::Attack { resolution } => !matches!(
                resolution,
                Some(AttackResolution::Guarded)
                    | Some(AttackResolution::Immune)
                    | Some(AttackResolution::TargetAlreadyDead)
            ),
            _ => true,
        }
    }
}

/// A registration request, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// What the actor wants to do.
    pub kind: ActionKind,
    /// Who acts.
    pub actor: PlayerId,
    /// Who is acted upon.
    pub target: PlayerId,
    /// Explicit priority; defaults to the kind's priority when `None`.
    pub priority: Option<i32>,
}

impl ActionRequest {
    /// Create a request with the kind's default priority.
    #[must_use]
    pub fn new(kind: ActionKind, actor: PlayerId, target: PlayerId) -> Self {
        Self {
            kind,
            actor,
            target,
            priority: None,
        }
    }

    /// Override the priority (builder).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// One registered night action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Unique id.
    pub id: ActionId,
    /// Kind of action.
    pub kind: ActionKind,
    /// The acting player.
    pub actor: PlayerId,
    /// The targeted player.
    pub target: PlayerId,
    /// The turn active when the action was registered.
    pub turn: u32,
    /// Execution priority; higher executes first.
    pub priority: i32,
    executed: bool,
    cancelled: bool,
    result: Option<ActionOutcome>,
}

impl Action {
    pub(crate) fn new(
        id: ActionId,
        kind: ActionKind,
        actor: PlayerId,
        target: PlayerId,
        turn: u32,
        priority: i32,
    ) -> Self {
        Self {
            id,
            kind,
            actor,
            target,
            turn,
            priority,
            executed: false,
            cancelled: false,
            result: None,
        }
    }

    /// Has the action been executed?
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Has the action been cancelled?
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Is the action in a terminal state?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.executed || self.cancelled
    }

    /// The recorded outcome, if any.
    #[must_use]
    pub fn result(&self) -> Option<&ActionOutcome> {
        self.result.as_ref()
    }

    /// Mark executed with an outcome. Returns false if already terminal.
    pub(crate) fn mark_executed(&mut self, outcome: ActionOutcome) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.executed = true;
        self.result = Some(outcome);
        true
    }

    /// Cancel the action. Returns false if already terminal.
    pub(crate) fn cancel(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.cancelled = true;
        true
    }

    /// Overwrite the outcome of an executed action (attack resolution).
    pub(crate) fn set_result(&mut self, outcome: ActionOutcome) {
        self.result = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> Action {
        Action::new(
            ActionId::new(0),
            ActionKind::Attack,
            PlayerId::new(1),
            PlayerId::new(2),
            1,
            ActionKind::Attack.default_priority(),
        )
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ActionKind::Fortune.as_str(), "fortune");
        assert_eq!(ActionKind::from("guard"), ActionKind::Guard);
        assert_eq!(
            ActionKind::from("possess"),
            ActionKind::Custom("possess".to_string())
        );
    }

    #[test]
    fn test_default_priorities_order_like_processing() {
        assert!(ActionKind::Fortune.default_priority() > ActionKind::Guard.default_priority());
        assert!(ActionKind::Guard.default_priority() > ActionKind::Attack.default_priority());
        assert!(
            ActionKind::Attack.default_priority()
                > ActionKind::Custom("x".into()).default_priority()
        );
    }

    #[test]
    fn test_execute_is_terminal() {
        let mut a = action();
        assert!(a.mark_executed(ActionOutcome::Attack { resolution: None }));
        assert!(a.is_executed());
        assert!(!a.mark_executed(ActionOutcome::Completed));
        assert!(!a.cancel());
        assert!(!a.is_cancelled());
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut a = action();
        assert!(a.cancel());
        assert!(a.is_cancelled());
        assert!(!a.mark_executed(ActionOutcome::Completed));
        assert!(a.result().is_none());
    }

    #[test]
    fn test_outcome_success() {
        assert!(ActionOutcome::Guard.is_success());
        assert!(ActionOutcome::Attack { resolution: None }.is_success());
        assert!(ActionOutcome::Attack {
            resolution: Some(AttackResolution::Killed)
        }
        .is_success());
        assert!(!ActionOutcome::Attack {
            resolution: Some(AttackResolution::Guarded)
        }
        .is_success());
        assert!(!ActionOutcome::AlreadyDead.is_success());
        assert!(!ActionOutcome::Failed {
            reason: "x".to_string()
        }
        .is_success());
    }

    #[test]
    fn test_action_serialization() {
        let mut a = action();
        a.mark_executed(ActionOutcome::Attack {
            resolution: Some(AttackResolution::Killed),
        });
        let json = serde_json::to_string(&a).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
