//! Engine event notifications.
//!
//! Everything observable that happens inside the engine is announced as a
//! [`GameEvent`] through an [`EventSink`]. The event set is a closed tagged
//! union - each kind carries a typed payload and maps to a canonical dotted
//! name (`phase.start.night`, `player.attack.success`) used for
//! pattern-based subscription.
//!
//! The engine pushes events into whatever sink the embedding application
//! provides; delivery, fan-out, and persistence are the application's
//! concern. Listeners must not call back into the engine from inside
//! `emit` while a transition or night cycle is in progress - the core does
//! not defend against that re-entrancy.

pub mod matcher;

pub use matcher::{EventPattern, PatternSegment};

use serde::{Deserialize, Serialize};

use crate::actions::{ActionId, ActionKind, ActionOutcome, AttackResolution};
use crate::core::{DeathCause, PlayerId};
use crate::phases::PhaseId;

/// A single engine notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A phase began and its context was opened.
    PhaseStarted { phase: PhaseId, turn: u32 },
    /// A phase ended and its context was archived.
    PhaseEnded { phase: PhaseId, turn: u32 },
    /// The turn counter advanced (night to day edge).
    TurnStarted { turn: u32 },
    /// A night action passed validation and was registered.
    ActionRegistered {
        action: ActionId,
        kind: ActionKind,
        actor: PlayerId,
        target: PlayerId,
        turn: u32,
    },
    /// A single action finished executing within a batch.
    ActionExecuted {
        action: ActionId,
        kind: ActionKind,
        actor: PlayerId,
        turn: u32,
    },
    /// An executed action's outcome was processed.
    ActionResult {
        action: ActionId,
        kind: ActionKind,
        actor: PlayerId,
        target: PlayerId,
        turn: u32,
        outcome: ActionOutcome,
    },
    /// The werewolf attack vote settled on a target.
    AttackTargetChosen {
        target: PlayerId,
        votes: u32,
        turn: u32,
    },
    /// A player died.
    PlayerDied {
        player: PlayerId,
        cause: DeathCause,
        turn: u32,
    },
    /// A fox was cursed by a divination.
    PlayerCursed {
        player: PlayerId,
        by: PlayerId,
        turn: u32,
    },
    /// A player is protected for the night.
    PlayerGuarded {
        player: PlayerId,
        by: PlayerId,
        turn: u32,
    },
    /// The night attack resolved against its target.
    AttackResolved {
        target: PlayerId,
        resolution: AttackResolution,
        turn: u32,
    },
}

impl GameEvent {
    /// Canonical dotted name for subscription matching.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            GameEvent::PhaseStarted { phase, .. } => format!("phase.start.{phase}"),
            GameEvent::PhaseEnded { phase, .. } => format!("phase.end.{phase}"),
            GameEvent::TurnStarted { .. } => "turn.start".to_string(),
            GameEvent::ActionRegistered { .. } => "action.register".to_string(),
            GameEvent::ActionExecuted { .. } => "action.execute.complete".to_string(),
            GameEvent::ActionResult { kind, .. } => format!("action.{kind}.result"),
            GameEvent::AttackTargetChosen { .. } => "werewolf.attack.target".to_string(),
            GameEvent::PlayerDied { .. } => "player.death".to_string(),
            GameEvent::PlayerCursed { .. } => "player.cursed".to_string(),
            GameEvent::PlayerGuarded { .. } => "player.guarded".to_string(),
            GameEvent::AttackResolved { resolution, .. } => match resolution {
                AttackResolution::Killed => "player.attack.success".to_string(),
                AttackResolution::Immune => "player.attack.immune".to_string(),
                AttackResolution::Guarded | AttackResolution::TargetAlreadyDead => {
                    "player.attack.failed".to_string()
                }
            },
        }
    }
}

/// Consumer of engine notifications.
///
/// The embedding application implements this to bridge events onto its own
/// bus. Implementations must not mutate engine state from inside `emit`.
pub trait EventSink {
    /// Receive one event.
    fn emit(&mut self, event: GameEvent);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Sink that records events in order, optionally filtered by a pattern.
///
/// Used by tests and by GMs who want a replayable log of a game.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<GameEvent>,
    filter: Option<EventPattern>,
}

impl RecordingSink {
    /// Record every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record only events whose name matches the pattern.
    #[must_use]
    pub fn filtered(pattern: EventPattern) -> Self {
        Self {
            events: Vec::new(),
            filter: Some(pattern),
        }
    }

    /// All recorded events, in emission order.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Names of all recorded events, in emission order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.events.iter().map(GameEvent::name).collect()
    }

    /// Whether any recorded event matches the given pattern.
    #[must_use]
    pub fn saw(&self, pattern: &str) -> bool {
        let pattern = EventPattern::parse(pattern);
        self.events.iter().any(|e| pattern.matches(&e.name()))
    }

    /// Drain the recorded events.
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: GameEvent) {
        if let Some(filter) = &self.filter {
            if !filter.matches(&event.name()) {
                return;
            }
        }
        self.events.push(event);
    }
}
