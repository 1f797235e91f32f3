//! # werewolf-gm
//!
//! A Game Master assistant rules engine for hidden-role elimination games
//! (werewolf/mafia-style): it tracks whose turn it is, what actions are
//! legal, resolves simultaneous night actions with conflict rules, and
//! advances the game through a configurable sequence of phases until a win
//! condition is reached.
//!
//! ## Design Principles
//!
//! 1. **Data-driven state machine**: Phases and transitions are registered
//!    configuration, not hardcoded control flow. The transition table is
//!    priority-ordered with wildcard sources.
//!
//! 2. **Logical simultaneity**: Night actions are collected while the phase
//!    is open, then resolved in one deterministic, priority-ordered batch
//!    with an attack-conflict pre-pass.
//!
//! 3. **Narrow collaborators**: The roster and role catalog live behind
//!    `PlayerProvider`/`RoleProvider` traits; events leave through an
//!    `EventSink`. The engine owns only phases, actions, and status.
//!
//! 4. **Transactional turns**: The execute-and-process cycle runs against a
//!    snapshot; any failure rolls the whole cycle back.
//!
//! ## Modules
//!
//! - `core`: player ids, roles, regulation, RNG, errors
//! - `events`: typed event union, sinks, subscription pattern matcher
//! - `phases`: phase catalog, contexts, transition table, phase manager
//! - `actions`: action entities and the registration/resolution engine
//! - `providers`: collaborator traits plus the in-memory roster
//! - `engine`: the `GameMaster` orchestration layer

pub mod actions;
pub mod core;
pub mod engine;
pub mod events;
pub mod phases;
pub mod providers;

// Re-export commonly used types
pub use crate::core::{
    DeathCause, EngineError, ExecutionRule, FirstNightFortune, FortuneReading, GameConfig,
    GameRng, GameRngState, PlayerId, Regulation, Role, RoleArchetype, Team,
};

pub use crate::events::{EventPattern, EventSink, GameEvent, NullSink, RecordingSink};

pub use crate::phases::{
    ids as phase_ids, standard_catalog, standard_transitions, Phase, PhaseContext, PhaseHistory,
    PhaseId, PhaseManager, PhaseStatus, SourcePhase, TransitionCondition, TransitionRule,
    TransitionTable, VisibilityPolicy, NEEDS_RUNOFF,
};

pub use crate::actions::{
    Action, ActionId, ActionKind, ActionManager, ActionOutcome, ActionRequest, AttackResolution,
    FortuneRecord, GuardRecord,
};

pub use crate::providers::{
    FortuneResult, NightActor, PlayerInfo, PlayerProvider, RoleProvider, Roster,
};

pub use crate::engine::{EndReason, GameEnd, GameMaster, GameStatus, NightDeath, NightSummary};
