//! Error taxonomy.
//!
//! Every validation failure in the engine is one of these variants. Each
//! carries a stable string code (`EngineError::code`) so external reporters
//! and transports can key on the failure kind without parsing messages.
//!
//! Propagation policy:
//! - registration-time validation fails synchronously and mutates nothing
//! - execution-time failures inside a single action are isolated into the
//!   action's own result and never surface as an `Err`
//! - failures inside a full night cycle roll the state back to the
//!   pre-cycle snapshot and re-raise the original error

use thiserror::Error;

use crate::actions::ActionKind;
use crate::phases::PhaseId;

use super::player::PlayerId;

/// Engine error taxonomy.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// An actor or target id did not resolve to a participant.
    #[error("player {0} is not in the game")]
    PlayerNotFound(PlayerId),

    /// A dead actor, or a role that does not permit the action kind.
    #[error("player {player} may not use {kind}: {reason}")]
    UnauthorizedAction {
        player: PlayerId,
        kind: ActionKind,
        reason: String,
    },

    /// An action kind outside the supported set.
    #[error("unsupported action kind `{0}`")]
    InvalidActionType(String),

    /// Guarding the same target on consecutive nights while the regulation
    /// forbids it.
    #[error("player {player} guarded {target} last night and may not guard them again")]
    ConsecutiveGuardProhibited { player: PlayerId, target: PlayerId },

    /// No transition rule matched from the current phase.
    #[error("no transition rule matches from phase `{0}`")]
    InvalidPhaseTransition(PhaseId),

    /// A phase id that is not registered.
    #[error("unknown phase `{0}`")]
    InvalidPhase(PhaseId),

    /// Registering a phase id twice.
    #[error("phase `{0}` is already registered")]
    DuplicatePhase(PhaseId),

    /// An operation that requires a started game.
    #[error("the game has not started")]
    GameNotStarted,

    /// Starting a game twice.
    #[error("the game has already started")]
    GameAlreadyStarted,

    /// An operation on a finished game.
    #[error("the game has already ended")]
    GameAlreadyEnded,

    /// An operation gated on a phase the game is not in.
    #[error("operation requires phase `{required}` but the current phase is `{current}`")]
    InvalidPhaseForOperation { required: PhaseId, current: PhaseId },
}

impl EngineError {
    /// Stable string code for external error reporting.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            EngineError::UnauthorizedAction { .. } => "UNAUTHORIZED_ACTION",
            EngineError::InvalidActionType(_) => "INVALID_ACTION_TYPE",
            EngineError::ConsecutiveGuardProhibited { .. } => "CONSECUTIVE_GUARD_PROHIBITED",
            EngineError::InvalidPhaseTransition(_) => "INVALID_PHASE_TRANSITION",
            EngineError::InvalidPhase(_) => "INVALID_PHASE",
            EngineError::DuplicatePhase(_) => "DUPLICATE_PHASE",
            EngineError::GameNotStarted => "GAME_NOT_STARTED",
            EngineError::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            EngineError::GameAlreadyEnded => "GAME_ALREADY_ENDED",
            EngineError::InvalidPhaseForOperation { .. } => "INVALID_PHASE_FOR_OPERATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            EngineError::PlayerNotFound(PlayerId::new(9)).code(),
            "PLAYER_NOT_FOUND"
        );
        assert_eq!(
            EngineError::ConsecutiveGuardProhibited {
                player: PlayerId::new(1),
                target: PlayerId::new(4),
            }
            .code(),
            "CONSECUTIVE_GUARD_PROHIBITED"
        );
        assert_eq!(EngineError::GameNotStarted.code(), "GAME_NOT_STARTED");
    }

    #[test]
    fn test_messages_mention_ids() {
        let err = EngineError::ConsecutiveGuardProhibited {
            player: PlayerId::new(2),
            target: PlayerId::new(4),
        };
        let msg = err.to_string();
        assert!(msg.contains("Player 2"));
        assert!(msg.contains("Player 4"));
    }

    #[test]
    fn test_phase_errors_display() {
        let err = EngineError::InvalidPhaseForOperation {
            required: PhaseId::from("night"),
            current: PhaseId::from("day"),
        };
        assert!(err.to_string().contains("night"));
        assert!(err.to_string().contains("day"));
    }
}
