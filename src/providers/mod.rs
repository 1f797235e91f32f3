//! Collaborator contracts consumed by the engine.
//!
//! The engine does not own the player roster or the role catalog - it
//! consumes them through these narrow traits, passed by reference into the
//! manager and orchestration methods. [`Roster`](roster::Roster) is the
//! in-memory reference implementation used by tests and demos; a real
//! deployment backs these traits with its own storage.

pub mod roster;

pub use roster::Roster;

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::core::{DeathCause, EngineError, FortuneReading, PlayerId, Role, RoleArchetype};

/// Snapshot of one participant as seen by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// The player's id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Is the player still in the game?
    pub alive: bool,
}

/// What a divination reports about a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortuneResult {
    /// The reading shown to the seer.
    pub reading: FortuneReading,
    /// The target's actual archetype (drives the curse cascade).
    pub archetype: RoleArchetype,
}

/// A role-holder with a night ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActor {
    /// The player holding the role.
    pub player: PlayerId,
    /// The role they hold.
    pub role: Role,
}

/// Read/write access to the player roster.
pub trait PlayerProvider {
    /// Look up a participant.
    fn player(&self, id: PlayerId) -> Option<PlayerInfo>;

    /// All living participants.
    fn alive_players(&self) -> Vec<PlayerInfo>;

    /// Is the participant alive?
    fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).map_or(false, |p| p.alive)
    }

    /// Kill a participant, recording the cause.
    fn kill(&mut self, id: PlayerId, cause: DeathCause) -> Result<(), EngineError>;

    /// Set or clear the night protection flag.
    fn set_guarded(&mut self, id: PlayerId, guarded: bool);

    /// Is the participant protected tonight?
    fn is_guarded(&self, id: PlayerId) -> bool;

    /// Clear every protection flag (start of a night cycle).
    fn clear_guards(&mut self);
}

/// Read access to role assignments and capabilities.
pub trait RoleProvider {
    /// The role held by a participant.
    fn role(&self, player: PlayerId) -> Option<Role>;

    /// May this participant use this action kind right now?
    fn can_use_action(&self, player: PlayerId, kind: &ActionKind) -> bool;

    /// Divine a target.
    fn fortune_result(&self, target: PlayerId) -> Option<FortuneResult>;

    /// Participants holding a night ability on the given turn.
    fn night_actors(&self, turn: u32) -> Vec<NightActor>;
}
