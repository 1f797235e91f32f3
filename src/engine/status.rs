//! Game status and night-cycle summaries.

use serde::{Deserialize, Serialize};

use crate::core::{DeathCause, PlayerId, Team};

/// Why the game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A win condition was reached.
    WinCondition,
    /// The GM aborted the game.
    Aborted(String),
}

/// Terminal state of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    /// The winning team, if the game ended normally.
    pub winner: Option<Team>,
    /// Why the game ended.
    pub reason: EndReason,
}

/// Lifecycle flags for one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Has the game started?
    pub started: bool,
    /// Terminal state, once reached.
    pub end: Option<GameEnd>,
    /// The winning team as of the last evaluation, if any side has won.
    pub win_condition: Option<Team>,
}

impl GameStatus {
    /// Is the game over (normally or abnormally)?
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.end.is_some()
    }

    /// Did the game end abnormally?
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(
            self.end,
            Some(GameEnd {
                reason: EndReason::Aborted(_),
                ..
            })
        )
    }
}

/// A death that occurred during one night cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightDeath {
    /// Who died.
    pub player: PlayerId,
    /// Why they died.
    pub cause: DeathCause,
}

/// What one resolved night produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightSummary {
    /// The turn that was resolved.
    pub turn: u32,
    /// How many actions executed.
    pub executed: usize,
    /// Deaths caused by the night's actions, in processing order.
    pub deaths: Vec<NightDeath>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flags() {
        let mut status = GameStatus::default();
        assert!(!status.started);
        assert!(!status.is_ended());
        assert!(!status.is_aborted());

        status.end = Some(GameEnd {
            winner: None,
            reason: EndReason::Aborted("GM called it".to_string()),
        });
        assert!(status.is_ended());
        assert!(status.is_aborted());
    }

    #[test]
    fn test_normal_end_is_not_aborted() {
        let status = GameStatus {
            started: true,
            end: Some(GameEnd {
                winner: Some(Team::Village),
                reason: EndReason::WinCondition,
            }),
            win_condition: Some(Team::Village),
        };
        assert!(status.is_ended());
        assert!(!status.is_aborted());
    }
}
