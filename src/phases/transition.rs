//! Phase transition rules.
//!
//! Transitions are data, not code: an ordered table of
//! `{source, target, condition, priority}` rules evaluated against the live
//! turn context. Higher priority wins; the table is kept sorted descending
//! at all times, and insertion is stable so equal-priority rules keep their
//! registration order. The wildcard source matches any phase, which is how
//! the terminal "game over" rule preempts everything else.

use serde::{Deserialize, Serialize};

use crate::core::{Regulation, Team};

use super::catalog::PhaseId;
use super::context::PhaseContext;

/// Source selector of a transition rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourcePhase {
    /// Wildcard: matches any current phase.
    Any,
    /// Matches one specific phase.
    Phase(PhaseId),
}

impl SourcePhase {
    /// Does this selector match the given phase?
    #[must_use]
    pub fn matches(&self, phase: &PhaseId) -> bool {
        match self {
            SourcePhase::Any => true,
            SourcePhase::Phase(id) => id == phase,
        }
    }
}

impl From<&str> for SourcePhase {
    fn from(id: &str) -> Self {
        SourcePhase::Phase(PhaseId::from(id))
    }
}

/// Live state a condition is evaluated against.
///
/// Conditions are pure: they read this context and nothing else.
#[derive(Clone, Copy, Debug)]
pub struct ConditionContext<'a> {
    /// Current turn number.
    pub turn: u32,
    /// The active phase context.
    pub phase_context: &'a PhaseContext,
    /// The winning team, once a win condition holds.
    pub win_condition: Option<Team>,
    /// The game's regulation.
    pub regulation: &'a Regulation,
}

/// A pure predicate over the transition context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionCondition {
    /// Always true.
    Always,
    /// Never true (disabled rule).
    Never,
    /// Turn equals the given number.
    TurnIs(u32),
    /// Turn is at least the given number.
    TurnAtLeast(u32),
    /// The active phase context carries a truthy flag.
    ContextFlag(String),
    /// A win condition holds.
    WinConditionMet,
    /// The first day, with the regulation disabling its execution.
    ///
    /// The turn counter advances on the night-to-day edge, so with the
    /// night-start catalog the first day is the day context of turn 2.
    FirstDayExecutionSkipped,
    /// All sub-conditions hold.
    All(Vec<TransitionCondition>),
    /// At least one sub-condition holds.
    Any(Vec<TransitionCondition>),
    /// The sub-condition does not hold.
    Not(Box<TransitionCondition>),
}

impl TransitionCondition {
    /// Evaluate against the live context.
    #[must_use]
    pub fn evaluate(&self, ctx: &ConditionContext<'_>) -> bool {
        match self {
            TransitionCondition::Always => true,
            TransitionCondition::Never => false,
            TransitionCondition::TurnIs(turn) => ctx.turn == *turn,
            TransitionCondition::TurnAtLeast(turn) => ctx.turn >= *turn,
            TransitionCondition::ContextFlag(key) => ctx.phase_context.flag(key),
            TransitionCondition::WinConditionMet => ctx.win_condition.is_some(),
            TransitionCondition::FirstDayExecutionSkipped => {
                ctx.turn == 2 && !ctx.regulation.first_day_execution
            }
            TransitionCondition::All(conditions) => conditions.iter().all(|c| c.evaluate(ctx)),
            TransitionCondition::Any(conditions) => conditions.iter().any(|c| c.evaluate(ctx)),
            TransitionCondition::Not(condition) => !condition.evaluate(ctx),
        }
    }
}

/// One transition rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Which phase(s) this rule fires from.
    pub source: SourcePhase,
    /// The phase to move to.
    pub target: PhaseId,
    /// When the rule is eligible.
    pub condition: TransitionCondition,
    /// Higher fires first. Equal priorities keep registration order.
    pub priority: i32,
}

impl TransitionRule {
    /// Create a rule with the default condition (`Always`) and priority (0).
    pub fn new(source: impl Into<SourcePhase>, target: impl Into<PhaseId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            condition: TransitionCondition::Always,
            priority: 0,
        }
    }

    /// Set the condition (builder).
    #[must_use]
    pub fn with_condition(mut self, condition: TransitionCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the priority (builder).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl From<PhaseId> for SourcePhase {
    fn from(id: PhaseId) -> Self {
        SourcePhase::Phase(id)
    }
}

/// Priority-ordered transition table.
///
/// Invariant: `rules` is sorted descending by priority at all times.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, preserving descending-priority order.
    ///
    /// Stable: a rule inserted later with an equal priority lands after the
    /// earlier one.
    pub fn insert(&mut self, rule: TransitionRule) {
        let at = self
            .rules
            .iter()
            .position(|existing| existing.priority < rule.priority)
            .unwrap_or(self.rules.len());
        self.rules.insert(at, rule);
    }

    /// Select the highest-priority rule matching the current phase whose
    /// condition holds.
    #[must_use]
    pub fn select(&self, current: &PhaseId, ctx: &ConditionContext<'_>) -> Option<&TransitionRule> {
        self.rules
            .iter()
            .find(|rule| rule.source.matches(current) && rule.condition.evaluate(ctx))
    }

    /// All rules, highest priority first.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Is the table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The standard transition set for the six-phase catalog.
///
/// The terminal rule is a maximum-priority wildcard into the epilogue,
/// fired as soon as a win condition holds. The elevated-priority
/// `day -> night` rule realizes the `first_day_execution = false`
/// regulation by skipping vote and execution on turn 1.
#[must_use]
pub fn standard_transitions() -> Vec<TransitionRule> {
    use super::catalog::ids;

    vec![
        TransitionRule::new(SourcePhase::Any, ids::EPILOGUE)
            .with_condition(TransitionCondition::WinConditionMet)
            .with_priority(i32::MAX),
        TransitionRule::new(ids::DAY, ids::NIGHT)
            .with_condition(TransitionCondition::FirstDayExecutionSkipped)
            .with_priority(10),
        TransitionRule::new(ids::NIGHT, ids::DAY),
        TransitionRule::new(ids::DAY, ids::VOTE),
        TransitionRule::new(ids::VOTE, ids::EXECUTION),
        TransitionRule::new(ids::RUNOFF_VOTE, ids::EXECUTION),
        TransitionRule::new(ids::EXECUTION, ids::NIGHT),
    ]
}
