//! Game configuration types.
//!
//! A game is configured once at startup by providing:
//! - `Regulation`: the ruleset toggles (consecutive guard, first-night
//!   fortune, first-day execution, execution rule)
//! - `GameConfig`: regulation plus engine knobs (RNG seed, history cap)
//!
//! Both are read-only after construction; the managers receive copies and
//! never mutate them during play.

use serde::{Deserialize, Serialize};

/// How the first night's fortune telling behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstNightFortune {
    /// The seer divines whoever they chose.
    #[default]
    Free,
    /// The divination reports the non-threat reading regardless of target,
    /// and the curse cascade does not fire.
    RandomWhite,
    /// The chosen target is replaced with a uniformly selected alternative.
    RandomTarget,
}

/// How the daytime execution is decided on a tied vote.
///
/// Vote tallying itself is external to this engine; the rule is carried here
/// because it is part of the per-game regulation supplied by the GM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionRule {
    /// A tie sends the game to the runoff vote phase.
    #[default]
    Runoff,
    /// A tie executes a uniformly chosen candidate.
    Random,
    /// A tie executes nobody.
    NoExecution,
}

/// Per-game ruleset toggles.
///
/// Supplied once at configuration time; read by the Action Manager
/// (guard rule) and the orchestration layer (first-night rules).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// May a knight guard the same target on consecutive nights?
    pub allow_consecutive_guard: bool,
    /// First-night fortune behavior.
    pub first_night_fortune: FirstNightFortune,
    /// Is there an execution on the first day?
    pub first_day_execution: bool,
    /// Tie handling for the daytime execution vote.
    pub execution_rule: ExecutionRule,
}

impl Default for Regulation {
    fn default() -> Self {
        Self {
            allow_consecutive_guard: false,
            first_night_fortune: FirstNightFortune::default(),
            first_day_execution: true,
            execution_rule: ExecutionRule::default(),
        }
    }
}

impl Regulation {
    /// Allow guarding the same target on consecutive nights.
    #[must_use]
    pub fn with_consecutive_guard(mut self, allow: bool) -> Self {
        self.allow_consecutive_guard = allow;
        self
    }

    /// Set the first-night fortune behavior.
    #[must_use]
    pub fn with_first_night_fortune(mut self, rule: FirstNightFortune) -> Self {
        self.first_night_fortune = rule;
        self
    }

    /// Set whether the first day has an execution.
    #[must_use]
    pub fn with_first_day_execution(mut self, enabled: bool) -> Self {
        self.first_day_execution = enabled;
        self
    }

    /// Set the execution tie rule.
    #[must_use]
    pub fn with_execution_rule(mut self, rule: ExecutionRule) -> Self {
        self.execution_rule = rule;
        self
    }
}

/// Engine construction configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// The per-game ruleset.
    pub regulation: Regulation,
    /// Seed for all engine randomness. Same seed, same game.
    pub rng_seed: u64,
    /// Maximum completed phase contexts retained in history.
    pub phase_history_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            regulation: Regulation::default(),
            rng_seed: 0,
            phase_history_limit: 64,
        }
    }
}

impl GameConfig {
    /// Create a config with the given seed and default regulation.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            ..Self::default()
        }
    }

    /// Set the regulation.
    #[must_use]
    pub fn with_regulation(mut self, regulation: Regulation) -> Self {
        self.regulation = regulation;
        self
    }

    /// Set the phase history cap.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.phase_history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regulation_defaults() {
        let reg = Regulation::default();
        assert!(!reg.allow_consecutive_guard);
        assert_eq!(reg.first_night_fortune, FirstNightFortune::Free);
        assert!(reg.first_day_execution);
        assert_eq!(reg.execution_rule, ExecutionRule::Runoff);
    }

    #[test]
    fn test_regulation_builders() {
        let reg = Regulation::default()
            .with_consecutive_guard(true)
            .with_first_night_fortune(FirstNightFortune::RandomWhite)
            .with_first_day_execution(false)
            .with_execution_rule(ExecutionRule::Random);

        assert!(reg.allow_consecutive_guard);
        assert_eq!(reg.first_night_fortune, FirstNightFortune::RandomWhite);
        assert!(!reg.first_day_execution);
        assert_eq!(reg.execution_rule, ExecutionRule::Random);
    }

    #[test]
    fn test_config_serialization() {
        let config = GameConfig::new(42).with_history_limit(8);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
