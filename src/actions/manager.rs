//! Night-action registration and resolution.
//!
//! The `ActionManager` owns every action registered during a game. It
//! validates registrations against the roster and role collaborators,
//! executes a turn's actions as one priority-ordered batch, and applies the
//! werewolf conflict rule (vote tally among attackers) before anything
//! executes so the guard/attack interplay sees a single resolved target.
//!
//! Failures inside one action's execution are caught, logged, and recorded
//! on that action's own result; they never abort the batch.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::{
    DeathCause, EngineError, FirstNightFortune, FortuneReading, PlayerId, Regulation,
    RoleArchetype,
};
use crate::events::{EventSink, GameEvent};
use crate::phases::Phase;
use crate::providers::{PlayerProvider, RoleProvider};

use super::entity::{Action, ActionId, ActionKind, ActionOutcome, ActionRequest, AttackResolution};

/// One recorded divination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortuneRecord {
    /// Turn the divination happened.
    pub turn: u32,
    /// Who was divined.
    pub target: PlayerId,
    /// The reading shown to the seer.
    pub reading: FortuneReading,
    /// Did the divination trigger the fox curse?
    pub fox_cursed: bool,
}

/// One recorded guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardRecord {
    /// Turn the guard stood.
    pub turn: u32,
    /// Who was protected.
    pub target: PlayerId,
}

/// Owns the registered actions and resolves them per turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionManager {
    actions: Vector<Action>,
    next_id: u32,
    supported: Vec<ActionKind>,
    regulation: Regulation,
    fortune_history: FxHashMap<PlayerId, Vec<FortuneRecord>>,
    guard_history: FxHashMap<PlayerId, Vec<GuardRecord>>,
    aborted: bool,
}

impl ActionManager {
    /// Create a manager supporting the built-in kinds.
    #[must_use]
    pub fn new(regulation: Regulation) -> Self {
        Self {
            actions: Vector::new(),
            next_id: 0,
            supported: vec![ActionKind::Fortune, ActionKind::Guard, ActionKind::Attack],
            regulation,
            fortune_history: FxHashMap::default(),
            guard_history: FxHashMap::default(),
            aborted: false,
        }
    }

    /// Register an additional supported kind.
    pub fn allow_kind(&mut self, kind: ActionKind) {
        if !self.supported.contains(&kind) {
            self.supported.push(kind);
        }
    }

    /// Flag the game as abnormally ended. Subsequent executions cancel
    /// their actions instead of running them.
    pub fn set_aborted(&mut self, aborted: bool) {
        self.aborted = aborted;
    }

    /// Is the game flagged as abnormally ended?
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Validate and register a night action.
    ///
    /// Validation order: actor exists, target exists, actor alive, kind
    /// supported, role permits the kind, consecutive-guard regulation.
    /// On success the action is appended and announced.
    pub fn register_action<R, P, S>(
        &mut self,
        request: ActionRequest,
        turn: u32,
        roles: &R,
        players: &P,
        events: &mut S,
    ) -> Result<ActionId, EngineError>
    where
        R: RoleProvider,
        P: PlayerProvider,
        S: EventSink,
    {
        let actor = players
            .player(request.actor)
            .ok_or(EngineError::PlayerNotFound(request.actor))?;
        players
            .player(request.target)
            .ok_or(EngineError::PlayerNotFound(request.target))?;

        if !actor.alive {
            return Err(EngineError::UnauthorizedAction {
                player: request.actor,
                kind: request.kind,
                reason: "actor is dead".to_string(),
            });
        }

        if !self.supported.contains(&request.kind) {
            return Err(EngineError::InvalidActionType(
                request.kind.as_str().to_string(),
            ));
        }

        if !roles.can_use_action(request.actor, &request.kind) {
            return Err(EngineError::UnauthorizedAction {
                player: request.actor,
                kind: request.kind,
                reason: "role does not permit this action".to_string(),
            });
        }

        if request.kind == ActionKind::Guard
            && !self.regulation.allow_consecutive_guard
            && self.last_guard_target(request.actor) == Some(request.target)
        {
            return Err(EngineError::ConsecutiveGuardProhibited {
                player: request.actor,
                target: request.target,
            });
        }

        let id = ActionId::new(self.next_id);
        self.next_id += 1;
        let priority = request
            .priority
            .unwrap_or_else(|| request.kind.default_priority());

        self.actions.push_back(Action::new(
            id,
            request.kind.clone(),
            request.actor,
            request.target,
            turn,
            priority,
        ));

        events.emit(GameEvent::ActionRegistered {
            action: id,
            kind: request.kind,
            actor: request.actor,
            target: request.target,
            turn,
        });

        Ok(id)
    }

    /// Execute one action.
    ///
    /// Returns `NotExecutable` without touching the action when it is
    /// already executed or cancelled (or unknown), and `Aborted` - after
    /// cancelling it - when the game ended abnormally. Internal failures
    /// become the action's own `Failed` result, never an `Err`.
    pub fn execute_action<R, P, S>(
        &mut self,
        id: ActionId,
        roles: &R,
        players: &mut P,
        events: &mut S,
    ) -> ActionOutcome
    where
        R: RoleProvider,
        P: PlayerProvider,
        S: EventSink,
    {
        let Some(index) = self.actions.iter().position(|a| a.id == id) else {
            return ActionOutcome::NotExecutable;
        };

        if self.actions[index].is_terminal() {
            return ActionOutcome::NotExecutable;
        }

        if self.aborted {
            if let Some(action) = self.actions.get_mut(index) {
                action.cancel();
            }
            return ActionOutcome::Aborted;
        }

        let (kind, actor, target, turn) = {
            let a = &self.actions[index];
            (a.kind.clone(), a.actor, a.target, a.turn)
        };

        let outcome = match &kind {
            ActionKind::Fortune => self.execute_fortune(actor, target, turn, roles, players, events),
            ActionKind::Guard => ActionOutcome::Guard,
            ActionKind::Attack => {
                if players.is_alive(target) {
                    ActionOutcome::Attack { resolution: None }
                } else {
                    ActionOutcome::Attack {
                        resolution: Some(AttackResolution::TargetAlreadyDead),
                    }
                }
            }
            ActionKind::Custom(_) => ActionOutcome::Completed,
        };

        if let Some(action) = self.actions.get_mut(index) {
            action.mark_executed(outcome.clone());
        }
        events.emit(GameEvent::ActionExecuted {
            action: id,
            kind,
            actor,
            turn,
        });

        outcome
    }

    /// Divination, including the fox-curse cascade.
    ///
    /// A fortune whose target resolves to the fox archetype kills the fox
    /// through the Player provider as a side effect of the fortune itself.
    /// On turn 1 under the `random_white` regulation the divination never
    /// touches the target: it reports the non-threat reading and no curse
    /// fires.
    fn execute_fortune<R, P, S>(
        &self,
        actor: PlayerId,
        target: PlayerId,
        turn: u32,
        roles: &R,
        players: &mut P,
        events: &mut S,
    ) -> ActionOutcome
    where
        R: RoleProvider,
        P: PlayerProvider,
        S: EventSink,
    {
        if turn == 1 && self.regulation.first_night_fortune == FirstNightFortune::RandomWhite {
            return ActionOutcome::Fortune {
                reading: FortuneReading::Human,
                fox_cursed: false,
            };
        }

        let Some(result) = roles.fortune_result(target) else {
            warn!(%actor, %target, "no fortune result for target");
            return ActionOutcome::Failed {
                reason: format!("no fortune result for {target}"),
            };
        };

        if result.archetype != RoleArchetype::Fox {
            return ActionOutcome::Fortune {
                reading: result.reading,
                fox_cursed: false,
            };
        }

        if !players.is_alive(target) {
            return ActionOutcome::AlreadyDead;
        }

        events.emit(GameEvent::PlayerCursed {
            player: target,
            by: actor,
            turn,
        });
        match players.kill(target, DeathCause::FoxCurse) {
            Ok(()) => {
                events.emit(GameEvent::PlayerDied {
                    player: target,
                    cause: DeathCause::FoxCurse,
                    turn,
                });
                ActionOutcome::Fortune {
                    reading: result.reading,
                    fox_cursed: true,
                }
            }
            Err(err) => {
                warn!(%actor, %target, error = %err, "fox curse kill failed");
                ActionOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Execute every pending action for the turn.
    ///
    /// Selects non-terminal actions matching the turn whose kind the phase
    /// allows, stable-sorts them descending by priority, runs the attack
    /// conflict pre-pass when more than one attack is present, then
    /// executes in order. Returns the number executed. When the game is
    /// flagged as abnormally ended, every selected action is cancelled and
    /// zero is returned.
    pub fn execute_actions<R, P, S>(
        &mut self,
        phase: &Phase,
        turn: u32,
        roles: &R,
        players: &mut P,
        events: &mut S,
    ) -> usize
    where
        R: RoleProvider,
        P: PlayerProvider,
        S: EventSink,
    {
        let mut selected: Vec<ActionId> = self
            .actions
            .iter()
            .filter(|a| !a.is_terminal() && a.turn == turn && phase.allows(&a.kind))
            .map(|a| a.id)
            .collect();

        if self.aborted {
            for id in selected {
                self.cancel_action(id);
            }
            return 0;
        }

        selected.sort_by_key(|id| std::cmp::Reverse(self.priority_of(*id)));

        let attacks: Vec<(ActionId, PlayerId)> = self
            .actions
            .iter()
            .filter(|a| {
                a.kind == ActionKind::Attack && !a.is_terminal() && selected.contains(&a.id)
            })
            .map(|a| (a.id, a.target))
            .collect();
        if attacks.len() > 1 {
            self.resolve_attack_conflict(&attacks, turn, events);
        }

        let mut executed = 0;
        for id in selected {
            if self.action(id).map_or(true, Action::is_terminal) {
                continue;
            }
            let outcome = self.execute_action(id, roles, players, events);
            if !matches!(
                outcome,
                ActionOutcome::NotExecutable | ActionOutcome::Aborted
            ) {
                executed += 1;
            }
        }

        executed
    }

    /// The werewolf conflict rule: tally votes per target, keep the strict
    /// maximum, and cancel every attack except one representative aimed at
    /// the winner (the earliest registered), so exactly one attack
    /// resolves.
    ///
    /// Ties are broken toward the lowest target id - a declared,
    /// deterministic rule rather than an accident of iteration order.
    fn resolve_attack_conflict<S: EventSink>(
        &mut self,
        attacks: &[(ActionId, PlayerId)],
        turn: u32,
        events: &mut S,
    ) {
        let mut votes: FxHashMap<PlayerId, SmallVec<[ActionId; 4]>> = FxHashMap::default();
        for (id, target) in attacks {
            votes.entry(*target).or_default().push(*id);
        }

        let mut chosen: Option<(PlayerId, usize)> = None;
        for (&target, voters) in &votes {
            let count = voters.len();
            chosen = match chosen {
                None => Some((target, count)),
                Some((best, best_count)) => {
                    if count > best_count || (count == best_count && target < best) {
                        Some((target, count))
                    } else {
                        Some((best, best_count))
                    }
                }
            };
        }

        let Some((target, count)) = chosen else { return };

        events.emit(GameEvent::AttackTargetChosen {
            target,
            votes: count as u32,
            turn,
        });

        // `attacks` is in registration order; the first aimed at the winner
        // survives.
        let mut kept = false;
        for (id, aimed_at) in attacks {
            if *aimed_at == target && !kept {
                kept = true;
                continue;
            }
            self.cancel_action(*id);
        }
    }

    /// Cancel a pending action. Returns false if unknown or terminal.
    pub fn cancel_action(&mut self, id: ActionId) -> bool {
        let Some(index) = self.actions.iter().position(|a| a.id == id) else {
            return false;
        };
        self.actions
            .get_mut(index)
            .map_or(false, |action| action.cancel())
    }

    /// Look up an action by id.
    #[must_use]
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Overwrite the result of an executed action (attack resolution).
    pub(crate) fn set_action_result(&mut self, id: ActionId, outcome: ActionOutcome) {
        if let Some(index) = self.actions.iter().position(|a| a.id == id) {
            if let Some(action) = self.actions.get_mut(index) {
                action.set_result(outcome);
            }
        }
    }

    /// Actions registered for a turn whose kind the phase allows.
    pub fn registered_actions(&self, phase: &Phase, turn: u32) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.turn == turn && phase.allows(&a.kind))
            .collect()
    }

    /// Executed actions for a turn, in registration order.
    pub fn executed_actions(&self, turn: u32) -> impl Iterator<Item = &Action> {
        self.actions
            .iter()
            .filter(move |a| a.turn == turn && a.is_executed())
    }

    /// Every action registered by a player.
    pub fn actions_for_player(&self, player: PlayerId) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.actor == player).collect()
    }

    /// Executed actions (with results) registered by a player.
    pub fn action_results(&self, player: PlayerId) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.actor == player && a.is_executed())
            .collect()
    }

    /// Has the player registered a non-cancelled action this turn?
    #[must_use]
    pub fn has_registered(&self, player: PlayerId, turn: u32) -> bool {
        self.actions
            .iter()
            .any(|a| a.actor == player && a.turn == turn && !a.is_cancelled())
    }

    /// May the player register this kind right now?
    pub fn is_action_allowed<R, P>(
        &self,
        player: PlayerId,
        kind: &ActionKind,
        roles: &R,
        players: &P,
    ) -> bool
    where
        R: RoleProvider,
        P: PlayerProvider,
    {
        self.supported.contains(kind)
            && players.is_alive(player)
            && roles.can_use_action(player, kind)
    }

    /// Divinations recorded for a seer.
    #[must_use]
    pub fn fortune_history(&self, player: PlayerId) -> &[FortuneRecord] {
        self.fortune_history
            .get(&player)
            .map_or(&[], Vec::as_slice)
    }

    /// Guards recorded for a knight.
    #[must_use]
    pub fn guard_history(&self, player: PlayerId) -> &[GuardRecord] {
        self.guard_history.get(&player).map_or(&[], Vec::as_slice)
    }

    /// The knight's most recent guard target, if any.
    #[must_use]
    pub fn last_guard_target(&self, player: PlayerId) -> Option<PlayerId> {
        self.guard_history
            .get(&player)
            .and_then(|records| records.last())
            .map(|record| record.target)
    }

    /// Record a processed divination.
    pub fn record_fortune(&mut self, actor: PlayerId, record: FortuneRecord) {
        self.fortune_history.entry(actor).or_default().push(record);
    }

    /// Record a processed guard.
    pub fn record_guard(&mut self, actor: PlayerId, record: GuardRecord) {
        self.guard_history.entry(actor).or_default().push(record);
    }

    fn priority_of(&self, id: ActionId) -> i32 {
        self.action(id).map_or(i32::MIN, |a| a.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RoleArchetype;
    use crate::events::{NullSink, RecordingSink};
    use crate::phases::standard_catalog;
    use crate::providers::Roster;

    fn night_phase() -> Phase {
        standard_catalog()
            .into_iter()
            .find(|p| p.id.as_str() == "night")
            .unwrap()
    }

    fn roster() -> Roster {
        let mut r = Roster::new();
        r.add("seer", RoleArchetype::Seer); // 0
        r.add("wolf-a", RoleArchetype::Werewolf); // 1
        r.add("wolf-b", RoleArchetype::Werewolf); // 2
        r.add("knight", RoleArchetype::Knight); // 3
        r.add("villager", RoleArchetype::Villager); // 4
        r.add("fox", RoleArchetype::Fox); // 5
        r
    }

    fn register(
        mgr: &mut ActionManager,
        roster: &Roster,
        kind: ActionKind,
        actor: u8,
        target: u8,
    ) -> ActionId {
        mgr.register_action(
            ActionRequest::new(kind, PlayerId::new(actor), PlayerId::new(target)),
            1,
            roster,
            roster,
            &mut NullSink,
        )
        .unwrap()
    }

    #[test]
    fn test_register_validates_actor_exists() {
        let mut mgr = ActionManager::new(Regulation::default());
        let roster = roster();
        let err = mgr
            .register_action(
                ActionRequest::new(ActionKind::Fortune, PlayerId::new(42), PlayerId::new(1)),
                1,
                &roster,
                &roster,
                &mut NullSink,
            )
            .unwrap_err();
        assert_eq!(err, EngineError::PlayerNotFound(PlayerId::new(42)));
    }

    #[test]
    fn test_register_rejects_dead_actor() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        roster.kill(PlayerId::new(0), DeathCause::Execution).unwrap();

        let err = mgr
            .register_action(
                ActionRequest::new(ActionKind::Fortune, PlayerId::new(0), PlayerId::new(1)),
                1,
                &roster,
                &roster,
                &mut NullSink,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::UnauthorizedAction { .. }));
    }

    #[test]
    fn test_register_rejects_unsupported_kind() {
        let mut mgr = ActionManager::new(Regulation::default());
        let roster = roster();
        let err = mgr
            .register_action(
                ActionRequest::new(
                    ActionKind::Custom("possess".into()),
                    PlayerId::new(0),
                    PlayerId::new(1),
                ),
                1,
                &roster,
                &roster,
                &mut NullSink,
            )
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidActionType("possess".to_string()));
    }

    #[test]
    fn test_register_rejects_wrong_role() {
        let mut mgr = ActionManager::new(Regulation::default());
        let roster = roster();
        let err = mgr
            .register_action(
                ActionRequest::new(ActionKind::Attack, PlayerId::new(0), PlayerId::new(1)),
                1,
                &roster,
                &roster,
                &mut NullSink,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::UnauthorizedAction { .. }));
    }

    #[test]
    fn test_consecutive_guard_prohibited() {
        let mut mgr = ActionManager::new(Regulation::default());
        let roster = roster();

        mgr.record_guard(
            PlayerId::new(3),
            GuardRecord {
                turn: 1,
                target: PlayerId::new(4),
            },
        );

        let err = mgr
            .register_action(
                ActionRequest::new(ActionKind::Guard, PlayerId::new(3), PlayerId::new(4)),
                2,
                &roster,
                &roster,
                &mut NullSink,
            )
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::ConsecutiveGuardProhibited {
                player: PlayerId::new(3),
                target: PlayerId::new(4),
            }
        );

        // A different target is fine.
        mgr.register_action(
            ActionRequest::new(ActionKind::Guard, PlayerId::new(3), PlayerId::new(0)),
            2,
            &roster,
            &roster,
            &mut NullSink,
        )
        .unwrap();
    }

    #[test]
    fn test_consecutive_guard_allowed_by_regulation() {
        let mut mgr =
            ActionManager::new(Regulation::default().with_consecutive_guard(true));
        let roster = roster();

        mgr.record_guard(
            PlayerId::new(3),
            GuardRecord {
                turn: 1,
                target: PlayerId::new(4),
            },
        );

        mgr.register_action(
            ActionRequest::new(ActionKind::Guard, PlayerId::new(3), PlayerId::new(4)),
            2,
            &roster,
            &roster,
            &mut NullSink,
        )
        .unwrap();
    }

    #[test]
    fn test_attack_conflict_majority_wins() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        let phase = night_phase();

        let a1 = register(&mut mgr, &roster, ActionKind::Attack, 1, 4);
        let a2 = register(&mut mgr, &roster, ActionKind::Attack, 2, 4);
        // A third wolf for the minority vote.
        let extra = roster.add("wolf-c", RoleArchetype::Werewolf);
        let a3 = mgr
            .register_action(
                ActionRequest::new(ActionKind::Attack, extra, PlayerId::new(0)),
                1,
                &roster,
                &roster,
                &mut NullSink,
            )
            .unwrap();

        let mut sink = RecordingSink::new();
        mgr.execute_actions(&phase, 1, &roster.clone(), &mut roster, &mut sink);

        // Exactly one attack on the majority target survives.
        assert!(mgr.action(a1).unwrap().is_executed());
        assert!(mgr.action(a2).unwrap().is_cancelled());
        assert!(mgr.action(a3).unwrap().is_cancelled());
        assert!(sink.saw("werewolf.attack.target"));
    }

    #[test]
    fn test_attack_conflict_tie_breaks_to_lowest_id() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        let phase = night_phase();

        let high = register(&mut mgr, &roster, ActionKind::Attack, 1, 4);
        let low = register(&mut mgr, &roster, ActionKind::Attack, 2, 0);

        mgr.execute_actions(&phase, 1, &roster.clone(), &mut roster, &mut NullSink);

        // One vote each: the lower target id (player 0) wins.
        assert!(mgr.action(low).unwrap().is_executed());
        assert!(mgr.action(high).unwrap().is_cancelled());
    }

    #[test]
    fn test_priority_orders_execution() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        let phase = night_phase();

        // Register in reverse-priority order.
        let attack = register(&mut mgr, &roster, ActionKind::Attack, 1, 4);
        let guard = register(&mut mgr, &roster, ActionKind::Guard, 3, 4);
        let fortune = register(&mut mgr, &roster, ActionKind::Fortune, 0, 1);

        let mut sink = RecordingSink::filtered("action.execute.complete".into());
        let count = mgr.execute_actions(&phase, 1, &roster.clone(), &mut roster, &mut sink);
        assert_eq!(count, 3);

        let order: Vec<ActionId> = sink
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::ActionExecuted { action, .. } => Some(*action),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![fortune, guard, attack]);
    }

    #[test]
    fn test_execute_action_is_idempotent() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();

        let id = register(&mut mgr, &roster, ActionKind::Guard, 3, 4);
        let roles = roster.clone();
        let first = mgr.execute_action(id, &roles, &mut roster, &mut NullSink);
        assert_eq!(first, ActionOutcome::Guard);

        let second = mgr.execute_action(id, &roles, &mut roster, &mut NullSink);
        assert_eq!(second, ActionOutcome::NotExecutable);
    }

    #[test]
    fn test_fortune_curses_fox() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();

        let id = register(&mut mgr, &roster, ActionKind::Fortune, 0, 5);
        let roles = roster.clone();
        let mut sink = RecordingSink::new();
        let outcome = mgr.execute_action(id, &roles, &mut roster, &mut sink);

        assert_eq!(
            outcome,
            ActionOutcome::Fortune {
                reading: FortuneReading::Human,
                fox_cursed: true,
            }
        );
        assert!(!roster.is_alive(PlayerId::new(5)));
        assert_eq!(
            roster.death_cause(PlayerId::new(5)),
            Some(&DeathCause::FoxCurse)
        );
        assert!(sink.saw("player.cursed"));
        assert!(sink.saw("player.death"));
    }

    #[test]
    fn test_second_fortune_on_dead_fox() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        roster.kill(PlayerId::new(5), DeathCause::FoxCurse).unwrap();

        let id = register(&mut mgr, &roster, ActionKind::Fortune, 0, 5);
        let roles = roster.clone();
        let outcome = mgr.execute_action(id, &roles, &mut roster, &mut NullSink);
        assert_eq!(outcome, ActionOutcome::AlreadyDead);
    }

    #[test]
    fn test_attack_on_dead_target() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        roster.kill(PlayerId::new(4), DeathCause::Execution).unwrap();

        let id = register(&mut mgr, &roster, ActionKind::Attack, 1, 4);
        let roles = roster.clone();
        let outcome = mgr.execute_action(id, &roles, &mut roster, &mut NullSink);
        assert_eq!(
            outcome,
            ActionOutcome::Attack {
                resolution: Some(AttackResolution::TargetAlreadyDead),
            }
        );
    }

    #[test]
    fn test_abort_cancels_batch() {
        let mut mgr = ActionManager::new(Regulation::default());
        let mut roster = roster();
        let phase = night_phase();

        let id = register(&mut mgr, &roster, ActionKind::Attack, 1, 4);
        mgr.set_aborted(true);

        let count = mgr.execute_actions(&phase, 1, &roster.clone(), &mut roster, &mut NullSink);
        assert_eq!(count, 0);
        assert!(mgr.action(id).unwrap().is_cancelled());
        assert!(roster.is_alive(PlayerId::new(4)));
    }

    #[test]
    fn test_cancel_action() {
        let mut mgr = ActionManager::new(Regulation::default());
        let roster = roster();
        let id = register(&mut mgr, &roster, ActionKind::Guard, 3, 4);

        assert!(mgr.cancel_action(id));
        assert!(!mgr.cancel_action(id));
        assert!(mgr.action(id).unwrap().is_cancelled());
    }

    #[test]
    fn test_histories() {
        let mut mgr = ActionManager::new(Regulation::default());
        assert!(mgr.fortune_history(PlayerId::new(0)).is_empty());

        mgr.record_fortune(
            PlayerId::new(0),
            FortuneRecord {
                turn: 1,
                target: PlayerId::new(1),
                reading: FortuneReading::Werewolf,
                fox_cursed: false,
            },
        );
        mgr.record_guard(
            PlayerId::new(3),
            GuardRecord {
                turn: 1,
                target: PlayerId::new(4),
            },
        );

        assert_eq!(mgr.fortune_history(PlayerId::new(0)).len(), 1);
        assert_eq!(mgr.last_guard_target(PlayerId::new(3)), Some(PlayerId::new(4)));
    }
}
