//! In-memory roster: the reference implementation of both provider traits.
//!
//! Holds the full cast with roles, alive flags, guard flags, and death
//! causes. Tests and demos drive the engine with a `Roster`; a real
//! deployment substitutes its own storage behind the same traits.

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::core::{DeathCause, EngineError, PlayerId, Role, RoleArchetype};

use super::{FortuneResult, NightActor, PlayerInfo, PlayerProvider, RoleProvider};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct RosterEntry {
    id: PlayerId,
    name: String,
    role: Role,
    alive: bool,
    guarded: bool,
    death_cause: Option<DeathCause>,
}

/// In-memory cast of one game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant with the archetype's canonical role name.
    ///
    /// Ids are assigned sequentially from 0.
    pub fn add(&mut self, name: impl Into<String>, archetype: RoleArchetype) -> PlayerId {
        self.add_role(name, Role::of(archetype))
    }

    /// Add a participant with a custom-named role.
    pub fn add_role(&mut self, name: impl Into<String>, role: Role) -> PlayerId {
        let id = PlayerId::new(self.entries.len() as u8);
        self.entries.push(RosterEntry {
            id,
            name: name.into(),
            role,
            alive: true,
            guarded: false,
            death_cause: None,
        });
        id
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the roster empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How a dead participant died.
    #[must_use]
    pub fn death_cause(&self, id: PlayerId) -> Option<&DeathCause> {
        self.entry(id).and_then(|e| e.death_cause.as_ref())
    }

    fn entry(&self, id: PlayerId) -> Option<&RosterEntry> {
        self.entries.get(id.index()).filter(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: PlayerId) -> Option<&mut RosterEntry> {
        self.entries.get_mut(id.index()).filter(|e| e.id == id)
    }
}

impl PlayerProvider for Roster {
    fn player(&self, id: PlayerId) -> Option<PlayerInfo> {
        self.entry(id).map(|e| PlayerInfo {
            id: e.id,
            name: e.name.clone(),
            alive: e.alive,
        })
    }

    fn alive_players(&self) -> Vec<PlayerInfo> {
        self.entries
            .iter()
            .filter(|e| e.alive)
            .map(|e| PlayerInfo {
                id: e.id,
                name: e.name.clone(),
                alive: true,
            })
            .collect()
    }

    fn kill(&mut self, id: PlayerId, cause: DeathCause) -> Result<(), EngineError> {
        let entry = self
            .entry_mut(id)
            .ok_or(EngineError::PlayerNotFound(id))?;
        entry.alive = false;
        entry.death_cause = Some(cause);
        Ok(())
    }

    fn set_guarded(&mut self, id: PlayerId, guarded: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.guarded = guarded;
        }
    }

    fn is_guarded(&self, id: PlayerId) -> bool {
        self.entry(id).map_or(false, |e| e.guarded)
    }

    fn clear_guards(&mut self) {
        for entry in &mut self.entries {
            entry.guarded = false;
        }
    }
}

impl RoleProvider for Roster {
    fn role(&self, player: PlayerId) -> Option<Role> {
        self.entry(player).map(|e| e.role.clone())
    }

    fn can_use_action(&self, player: PlayerId, kind: &ActionKind) -> bool {
        self.entry(player)
            .map_or(false, |e| e.role.archetype.night_action().as_ref() == Some(kind))
    }

    fn fortune_result(&self, target: PlayerId) -> Option<FortuneResult> {
        self.entry(target).map(|e| FortuneResult {
            reading: e.role.archetype.fortune_reading(),
            archetype: e.role.archetype,
        })
    }

    fn night_actors(&self, _turn: u32) -> Vec<NightActor> {
        self.entries
            .iter()
            .filter(|e| e.alive && e.role.archetype.night_action().is_some())
            .map(|e| NightActor {
                player: e.id,
                role: e.role.clone(),
            })
            .collect()
    }
}
