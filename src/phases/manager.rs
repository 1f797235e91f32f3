//! The phase state machine.
//!
//! `PhaseManager` owns the phase catalog, the transition table, the current
//! phase, the turn counter, and the per-phase context plus its bounded
//! history. States are the registered phase ids; transitions are the
//! data-driven table evaluated against the live turn context, with one
//! special case: a vote context flagged [`NEEDS_RUNOFF`] routes to the
//! runoff phase ahead of the table.
//!
//! The turn boundary is defined solely by the night-to-day edge: moving
//! from `night` directly into `day` increments the counter; no other
//! transition touches it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{EngineError, Regulation, Team};
use crate::events::{EventSink, GameEvent};

use super::catalog::{ids, standard_catalog, Phase, PhaseId};
use super::context::{PhaseContext, PhaseHistory, NEEDS_RUNOFF};
use super::transition::{standard_transitions, ConditionContext, TransitionRule, TransitionTable};

/// Owns the current phase, turn counter, contexts, and transition table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseManager {
    phases: FxHashMap<PhaseId, Phase>,
    table: TransitionTable,
    current: PhaseId,
    turn: u32,
    context: PhaseContext,
    history: PhaseHistory,
}

impl PhaseManager {
    /// Create a manager from an explicit catalog and transition set.
    ///
    /// Fails with `DuplicatePhase` on a repeated phase id, and with
    /// `InvalidPhase` when a transition target or the starting phase is not
    /// in the catalog.
    pub fn new(
        catalog: Vec<Phase>,
        transitions: Vec<TransitionRule>,
        starting: PhaseId,
        history_limit: usize,
    ) -> Result<Self, EngineError> {
        let mut phases: FxHashMap<PhaseId, Phase> = FxHashMap::default();
        for phase in catalog {
            if phases.contains_key(&phase.id) {
                return Err(EngineError::DuplicatePhase(phase.id));
            }
            phases.insert(phase.id.clone(), phase);
        }

        if !phases.contains_key(&starting) {
            return Err(EngineError::InvalidPhase(starting));
        }

        let mut table = TransitionTable::new();
        for rule in transitions {
            if !phases.contains_key(&rule.target) {
                return Err(EngineError::InvalidPhase(rule.target));
            }
            table.insert(rule);
        }

        let context = PhaseContext::open(starting.clone(), 1);
        Ok(Self {
            phases,
            table,
            current: starting,
            turn: 1,
            context,
            history: PhaseHistory::new(history_limit),
        })
    }

    /// Create a manager with the standard catalog and transitions,
    /// starting at night on turn 1.
    #[must_use]
    pub fn standard(history_limit: usize) -> Self {
        let mut phases: FxHashMap<PhaseId, Phase> = FxHashMap::default();
        for phase in standard_catalog() {
            phases.insert(phase.id.clone(), phase);
        }

        let mut table = TransitionTable::new();
        for rule in standard_transitions() {
            table.insert(rule);
        }

        let starting = PhaseId::from(ids::NIGHT);
        let context = PhaseContext::open(starting.clone(), 1);
        Self {
            phases,
            table,
            current: starting,
            turn: 1,
            context,
            history: PhaseHistory::new(history_limit),
        }
    }

    /// The current phase definition.
    #[must_use]
    pub fn current_phase(&self) -> &Phase {
        &self.phases[&self.current]
    }

    /// The current phase id.
    #[must_use]
    pub fn current_phase_id(&self) -> &PhaseId {
        &self.current
    }

    /// The current turn number.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.turn
    }

    /// Look up a registered phase.
    #[must_use]
    pub fn phase(&self, id: &PhaseId) -> Option<&Phase> {
        self.phases.get(id)
    }

    /// Register an additional phase.
    pub fn register_phase(&mut self, phase: Phase) -> Result<(), EngineError> {
        if self.phases.contains_key(&phase.id) {
            return Err(EngineError::DuplicatePhase(phase.id));
        }
        self.phases.insert(phase.id.clone(), phase);
        Ok(())
    }

    /// Register an additional transition rule.
    ///
    /// The rule's target must be a registered phase. Insertion preserves
    /// the table's descending-priority order.
    pub fn register_transition(&mut self, rule: TransitionRule) -> Result<(), EngineError> {
        if !self.phases.contains_key(&rule.target) {
            return Err(EngineError::InvalidPhase(rule.target));
        }
        self.table.insert(rule);
        Ok(())
    }

    /// The active phase context.
    #[must_use]
    pub fn context(&self) -> &PhaseContext {
        &self.context
    }

    /// Replace the active context's data bag.
    pub fn set_context(&mut self, data: impl IntoIterator<Item = (String, i64)>) {
        self.context.replace_data(data);
    }

    /// Shallow-merge entries into the active context's data bag.
    pub fn update_context(&mut self, partial: impl IntoIterator<Item = (String, i64)>) {
        self.context.merge(partial);
    }

    /// Set a boolean flag on the active context.
    pub fn set_context_flag(&mut self, key: impl Into<String>, value: bool) {
        self.context.set_flag(key, value);
    }

    /// The most recently completed phase context.
    #[must_use]
    pub fn previous_context(&self) -> Option<&PhaseContext> {
        self.history.latest()
    }

    /// The archived context history, oldest first.
    #[must_use]
    pub fn history(&self) -> &PhaseHistory {
        &self.history
    }

    /// Decide the next phase without moving.
    ///
    /// A vote context flagged [`NEEDS_RUNOFF`] short-circuits to the runoff
    /// phase ahead of the table. Otherwise the highest-priority matching
    /// rule wins; `InvalidPhaseTransition` if none matches.
    pub fn next_phase(
        &self,
        win_condition: Option<Team>,
        regulation: &Regulation,
    ) -> Result<PhaseId, EngineError> {
        let runoff = PhaseId::from(ids::RUNOFF_VOTE);
        if self.current.as_str() == ids::VOTE
            && self.context.flag(NEEDS_RUNOFF)
            && self.phases.contains_key(&runoff)
        {
            return Ok(runoff);
        }

        let ctx = ConditionContext {
            turn: self.turn,
            phase_context: &self.context,
            win_condition,
            regulation,
        };

        self.table
            .select(&self.current, &ctx)
            .map(|rule| rule.target.clone())
            .ok_or_else(|| EngineError::InvalidPhaseTransition(self.current.clone()))
    }

    /// Move to a specific phase.
    ///
    /// Finalizes and archives the current context, emits the phase-end
    /// notification, increments the turn exactly on the night-to-day edge,
    /// installs the target, opens a fresh context, and emits the
    /// phase-start notification. Fails with `InvalidPhase` (and changes
    /// nothing) when the target is unknown.
    pub fn move_to_phase(
        &mut self,
        target: &PhaseId,
        events: &mut impl EventSink,
    ) -> Result<&Phase, EngineError> {
        if !self.phases.contains_key(target) {
            return Err(EngineError::InvalidPhase(target.clone()));
        }

        debug!(from = %self.current, to = %target, turn = self.turn, "phase transition");

        let new_turn = if self.current.as_str() == ids::NIGHT && target.as_str() == ids::DAY {
            self.turn + 1
        } else {
            self.turn
        };

        self.context.complete();
        events.emit(GameEvent::PhaseEnded {
            phase: self.current.clone(),
            turn: self.turn,
        });
        let completed = std::mem::replace(
            &mut self.context,
            PhaseContext::open(target.clone(), new_turn),
        );
        self.history.push(completed);

        if new_turn != self.turn {
            self.turn = new_turn;
            events.emit(GameEvent::TurnStarted { turn: new_turn });
        }

        self.current = target.clone();
        events.emit(GameEvent::PhaseStarted {
            phase: self.current.clone(),
            turn: self.turn,
        });

        Ok(&self.phases[&self.current])
    }

    /// Evaluate the table and move in one step.
    pub fn advance(
        &mut self,
        win_condition: Option<Team>,
        regulation: &Regulation,
        events: &mut impl EventSink,
    ) -> Result<&Phase, EngineError> {
        let target = self.next_phase(win_condition, regulation)?;
        self.move_to_phase(&target, events)
    }
}
