//! Night actions: entities and the registration/resolution engine.
//!
//! - [`entity`]: the `Action` record, kinds, outcomes
//! - [`manager`]: validation, conflict resolution, batch execution

pub mod entity;
pub mod manager;

pub use entity::{Action, ActionId, ActionKind, ActionOutcome, ActionRequest, AttackResolution};
pub use manager::{ActionManager, FortuneRecord, GuardRecord};
