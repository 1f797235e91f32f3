//! Dotted-name subscription patterns.
//!
//! Event names form a dot-separated namespace (`player.attack.success`).
//! Subscribers filter with patterns built from three segment kinds:
//!
//! - a literal segment matches itself
//! - `*` matches exactly one segment
//! - `**` matches everything from that point on (final segment only)
//!
//! The matcher compares segment arrays instead of doing string surgery, so
//! its behavior is auditable independent of any pub/sub mechanism.

use serde::{Deserialize, Serialize};

/// One segment of an event pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternSegment {
    /// Matches the identical name segment.
    Literal(String),
    /// `*`: matches exactly one segment.
    AnyOne,
    /// `**`: matches all remaining segments (including none).
    Rest,
}

/// A parsed subscription pattern.
///
/// ```
/// use werewolf_gm::events::EventPattern;
///
/// let p = EventPattern::parse("player.attack.*");
/// assert!(p.matches("player.attack.success"));
/// assert!(!p.matches("player.attack"));
///
/// let all = EventPattern::parse("phase.**");
/// assert!(all.matches("phase.start.night"));
/// assert!(all.matches("phase.end.day"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPattern {
    segments: Vec<PatternSegment>,
}

impl EventPattern {
    /// Parse a pattern from its dotted form.
    ///
    /// `**` is only meaningful as the final segment; anything after it is
    /// unreachable and ignored.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        for part in pattern.split('.') {
            match part {
                "*" => segments.push(PatternSegment::AnyOne),
                "**" => {
                    segments.push(PatternSegment::Rest);
                    break;
                }
                literal => segments.push(PatternSegment::Literal(literal.to_string())),
            }
        }
        Self { segments }
    }

    /// Check whether an event name matches this pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let parts: Vec<&str> = name.split('.').collect();
        let mut idx = 0;

        for segment in &self.segments {
            match segment {
                PatternSegment::Rest => return true,
                PatternSegment::AnyOne => {
                    if idx >= parts.len() {
                        return false;
                    }
                    idx += 1;
                }
                PatternSegment::Literal(lit) => {
                    if parts.get(idx) != Some(&lit.as_str()) {
                        return false;
                    }
                    idx += 1;
                }
            }
        }

        idx == parts.len()
    }
}

impl From<&str> for EventPattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}
