//! Core engine types: players, roles, regulation, RNG, errors.
//!
//! This module contains the fundamental building blocks shared by the phase
//! and action machinery. Games configure these via `GameConfig` rather than
//! modifying the engine.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod role;

pub use config::{ExecutionRule, FirstNightFortune, GameConfig, Regulation};
pub use error::EngineError;
pub use player::{DeathCause, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use role::{FortuneReading, Role, RoleArchetype, Team};
