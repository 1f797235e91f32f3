//! Role archetypes, teams, and fortune readings.
//!
//! The engine never stores who holds which role - that belongs to the
//! `RoleProvider` collaborator. What it does need is the shared vocabulary:
//! which archetypes exist, which side they win with, what a seer sees when
//! divining them, and which night ability (if any) they carry.

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;

/// Winning side of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// The village: wins when every werewolf is dead.
    Village,
    /// The werewolves: win when they match or outnumber everyone else.
    Werewolf,
    /// The fox: a third party that steals the win by surviving to the end.
    Fox,
}

/// The standard cast of a hidden-role elimination game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleArchetype {
    /// Plain villager, no ability.
    Villager,
    /// Divines one player per night (fortune action).
    Seer,
    /// Learns the team of each executed player.
    Medium,
    /// Protects one player per night (guard action).
    Knight,
    /// Votes with the pack on a nightly attack target.
    Werewolf,
    /// Villager-looking player on the werewolf team.
    Madman,
    /// Third party; divined as human, immune to attacks, dies to the curse.
    Fox,
}

impl RoleArchetype {
    /// The team this archetype wins with.
    #[must_use]
    pub fn team(self) -> Team {
        match self {
            RoleArchetype::Villager
            | RoleArchetype::Seer
            | RoleArchetype::Medium
            | RoleArchetype::Knight => Team::Village,
            RoleArchetype::Werewolf | RoleArchetype::Madman => Team::Werewolf,
            RoleArchetype::Fox => Team::Fox,
        }
    }

    /// The night action this archetype performs, if any.
    #[must_use]
    pub fn night_action(self) -> Option<ActionKind> {
        match self {
            RoleArchetype::Seer => Some(ActionKind::Fortune),
            RoleArchetype::Knight => Some(ActionKind::Guard),
            RoleArchetype::Werewolf => Some(ActionKind::Attack),
            _ => None,
        }
    }

    /// What a seer's divination reports for this archetype.
    ///
    /// The fox reads as human even though it is not on the village side.
    #[must_use]
    pub fn fortune_reading(self) -> FortuneReading {
        match self {
            RoleArchetype::Werewolf => FortuneReading::Werewolf,
            _ => FortuneReading::Human,
        }
    }

    /// Whether the werewolf attack fails against this archetype.
    #[must_use]
    pub fn attack_immune(self) -> bool {
        matches!(self, RoleArchetype::Fox)
    }

    /// Canonical role name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RoleArchetype::Villager => "villager",
            RoleArchetype::Seer => "seer",
            RoleArchetype::Medium => "medium",
            RoleArchetype::Knight => "knight",
            RoleArchetype::Werewolf => "werewolf",
            RoleArchetype::Madman => "madman",
            RoleArchetype::Fox => "fox",
        }
    }
}

impl std::fmt::Display for RoleArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete role assignment: display name plus archetype.
///
/// Games may rename roles ("bodyguard" for knight) without changing
/// the archetype-driven rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Display name shown to the GM.
    pub name: String,
    /// The archetype that drives rules behavior.
    pub archetype: RoleArchetype,
}

impl Role {
    /// Create a role with the archetype's canonical name.
    #[must_use]
    pub fn of(archetype: RoleArchetype) -> Self {
        Self {
            name: archetype.name().to_string(),
            archetype,
        }
    }

    /// Create a role with a custom display name.
    pub fn named(name: impl Into<String>, archetype: RoleArchetype) -> Self {
        Self {
            name: name.into(),
            archetype,
        }
    }

    /// The team this role wins with.
    #[must_use]
    pub fn team(&self) -> Team {
        self.archetype.team()
    }
}

/// Result of a seer's divination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FortuneReading {
    /// The non-threat reading.
    Human,
    /// The target is a werewolf.
    Werewolf,
}
