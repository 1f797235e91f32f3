//! Player identification and death causes.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting 1-255 participants.
//! The roster itself (names, roles, alive flags) lives behind the
//! `PlayerProvider` collaborator; the engine only passes ids around.

use serde::{Deserialize, Serialize};

/// Player identifier supporting 1-255 participants.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` participants.
    ///
    /// ```
    /// use werewolf_gm::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(5).collect();
    /// assert_eq!(players.len(), 5);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[4], PlayerId::new(4));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// How a player left the game.
///
/// Recorded on kill and carried by death events so observers can
/// distinguish a lynch from a night kill from the fox curse.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Executed by the daytime vote.
    Execution,
    /// Killed by the resolved werewolf attack.
    WerewolfAttack,
    /// Killed as a side effect of being divined (fox archetype).
    FoxCurse,
    /// Game-specific cause supplied by a custom action processor.
    Other(String),
}

impl DeathCause {
    /// Canonical string form, matching the event payload vocabulary.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            DeathCause::Execution => "execution",
            DeathCause::WerewolfAttack => "werewolf_attack",
            DeathCause::FoxCurse => "fox_curse",
            DeathCause::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p = PlayerId::new(3);
        assert_eq!(p.index(), 3);
        assert_eq!(p.to_string(), "Player 3");
    }

    #[test]
    fn test_player_id_all() {
        let ids: Vec<_> = PlayerId::all(3).collect();
        assert_eq!(ids, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_player_id_ordering() {
        assert!(PlayerId::new(1) < PlayerId::new(2));
        assert!(PlayerId::new(0) < PlayerId::new(255));
    }

    #[test]
    fn test_death_cause_strings() {
        assert_eq!(DeathCause::FoxCurse.as_str(), "fox_curse");
        assert_eq!(DeathCause::WerewolfAttack.to_string(), "werewolf_attack");
        assert_eq!(DeathCause::Other("trap".into()).as_str(), "trap");
    }

    #[test]
    fn test_death_cause_serialization() {
        let json = serde_json::to_string(&DeathCause::FoxCurse).unwrap();
        assert_eq!(json, "\"fox_curse\"");
        let back: DeathCause = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeathCause::FoxCurse);
    }
}
