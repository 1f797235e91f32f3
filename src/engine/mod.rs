//! The orchestration layer.
//!
//! [`GameMaster`] composes a [`PhaseManager`] and an [`ActionManager`] with
//! the collaborator traits and drives the per-turn loop: register actions,
//! synthesize intents for role-holders who failed to act, execute the
//! batch, process results in a fixed kind order (fortune, guard, attack,
//! customs), and advance the phase. The whole execute-and-process cycle is
//! wrapped in a snapshot/rollback transaction so a mid-cycle failure never
//! publishes a half-updated game.
//!
//! One `GameMaster` instance drives exactly one game, single-threaded and
//! fully synchronous.

pub mod status;

pub use status::{EndReason, GameEnd, GameStatus, NightDeath, NightSummary};

use tracing::{debug, error, warn};

use crate::actions::{
    ActionId, ActionKind, ActionManager, ActionOutcome, ActionRequest, AttackResolution,
    FortuneRecord, GuardRecord,
};
use crate::core::{
    DeathCause, EngineError, FirstNightFortune, GameConfig, GameRng, GameRngState, PlayerId,
    Regulation, RoleArchetype, Team,
};
use crate::events::{EventSink, GameEvent};
use crate::phases::{ids, PhaseContext, PhaseId, PhaseManager};
use crate::providers::{PlayerProvider, RoleProvider};

/// Pre-cycle state captured for rollback.
struct Snapshot<P> {
    phases: PhaseManager,
    actions: ActionManager,
    status: GameStatus,
    players: P,
    rng: GameRngState,
}

/// Drives one game: owns the managers, the collaborators, and the status.
pub struct GameMaster<R, P, S> {
    phases: PhaseManager,
    actions: ActionManager,
    roles: R,
    players: P,
    events: S,
    regulation: Regulation,
    status: GameStatus,
    rng: GameRng,
}

impl<R, P, S> GameMaster<R, P, S>
where
    R: RoleProvider,
    P: PlayerProvider + Clone,
    S: EventSink,
{
    /// Create a game with the standard phase catalog.
    pub fn new(config: GameConfig, roles: R, players: P, events: S) -> Self {
        Self::with_phases(
            config.clone(),
            PhaseManager::standard(config.phase_history_limit),
            roles,
            players,
            events,
        )
    }

    /// Create a game with a custom phase manager.
    pub fn with_phases(
        config: GameConfig,
        phases: PhaseManager,
        roles: R,
        players: P,
        events: S,
    ) -> Self {
        Self {
            phases,
            actions: ActionManager::new(config.regulation),
            roles,
            players,
            events,
            regulation: config.regulation,
            status: GameStatus::default(),
            rng: GameRng::new(config.rng_seed),
        }
    }

    /// Start the game and announce the opening phase.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.status.started {
            return Err(EngineError::GameAlreadyStarted);
        }
        if self.status.is_ended() {
            return Err(EngineError::GameAlreadyEnded);
        }
        self.status.started = true;
        self.events.emit(GameEvent::PhaseStarted {
            phase: self.phases.current_phase_id().clone(),
            turn: self.phases.current_turn(),
        });
        Ok(())
    }

    /// Register a night action on behalf of a player.
    ///
    /// Gated on `{started, !ended, phase == night}`. On turn 1 the
    /// `first_night_fortune` regulation applies before validation:
    /// `random_target` rewrites a fortune's target to a uniformly chosen
    /// alternative (excluding the actor and the original choice).
    pub fn register_night_action(
        &mut self,
        request: ActionRequest,
    ) -> Result<ActionId, EngineError> {
        self.ensure_night_operation()?;
        let turn = self.phases.current_turn();
        let request = if turn == 1 {
            self.apply_first_night_rule(request)
        } else {
            request
        };
        self.actions.register_action(
            request,
            turn,
            &self.roles,
            &self.players,
            &mut self.events,
        )
    }

    /// Resolve the current night as one transaction.
    ///
    /// Synthesizes a legal random action for every living night-ability
    /// role-holder who has not acted, snapshots the state, executes the
    /// batch, and processes results. Any failure restores the snapshot and
    /// re-raises.
    pub fn resolve_night(&mut self) -> Result<NightSummary, EngineError> {
        self.ensure_night_operation()?;
        let turn = self.phases.current_turn();

        self.synthesize_missing_actions(turn);

        let snapshot = self.snapshot();
        match self.execute_and_process(turn) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                error!(turn, error = %err, "night cycle failed, rolling back");
                self.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Re-evaluate the win condition and advance to the next phase.
    ///
    /// Entering the epilogue finalizes the game status.
    pub fn advance_phase(&mut self) -> Result<PhaseId, EngineError> {
        if !self.status.started {
            return Err(EngineError::GameNotStarted);
        }
        if self.status.is_ended() {
            return Err(EngineError::GameAlreadyEnded);
        }

        self.status.win_condition = self.evaluate_win();
        let phase = self
            .phases
            .advance(self.status.win_condition, &self.regulation, &mut self.events)?;
        let id = phase.id.clone();

        if id.as_str() == ids::EPILOGUE {
            self.status.end = Some(GameEnd {
                winner: self.status.win_condition,
                reason: EndReason::WinCondition,
            });
        }
        Ok(id)
    }

    /// Abort the game. Pending actions are cancelled on their next
    /// execution attempt.
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.status.end = Some(GameEnd {
            winner: None,
            reason: EndReason::Aborted(reason.into()),
        });
        self.actions.set_aborted(true);
    }

    /// Evaluate the standard win condition.
    ///
    /// Village wins when every werewolf is dead; werewolves win when they
    /// match or outnumber everyone else. A surviving fox steals either
    /// win.
    #[must_use]
    pub fn evaluate_win(&self) -> Option<Team> {
        let mut wolves = 0usize;
        let mut others = 0usize;
        let mut fox_alive = false;

        for player in self.players.alive_players() {
            match self.roles.role(player.id).map(|r| r.archetype) {
                Some(RoleArchetype::Werewolf) => wolves += 1,
                Some(RoleArchetype::Fox) => {
                    fox_alive = true;
                    others += 1;
                }
                Some(_) => others += 1,
                None => others += 1,
            }
        }

        let base = if wolves == 0 {
            Some(Team::Village)
        } else if wolves >= others {
            Some(Team::Werewolf)
        } else {
            None
        };

        match base {
            Some(_) if fox_alive => Some(Team::Fox),
            other => other,
        }
    }

    // === Accessors and passthroughs ===

    /// The phase state machine.
    #[must_use]
    pub fn phases(&self) -> &PhaseManager {
        &self.phases
    }

    /// The action engine.
    #[must_use]
    pub fn actions(&self) -> &ActionManager {
        &self.actions
    }

    /// The action engine, mutable (e.g., to cancel a pending action).
    pub fn actions_mut(&mut self) -> &mut ActionManager {
        &mut self.actions
    }

    /// The game status.
    #[must_use]
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// The regulation in force.
    #[must_use]
    pub fn regulation(&self) -> &Regulation {
        &self.regulation
    }

    /// The player collaborator.
    #[must_use]
    pub fn players(&self) -> &P {
        &self.players
    }

    /// The role collaborator.
    #[must_use]
    pub fn roles(&self) -> &R {
        &self.roles
    }

    /// The event sink.
    #[must_use]
    pub fn events(&self) -> &S {
        &self.events
    }

    /// The current turn number.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.phases.current_turn()
    }

    /// The current phase id.
    #[must_use]
    pub fn current_phase_id(&self) -> &PhaseId {
        self.phases.current_phase_id()
    }

    /// The active phase context.
    #[must_use]
    pub fn phase_context(&self) -> &PhaseContext {
        self.phases.context()
    }

    /// Replace the active phase context's data.
    pub fn set_phase_context(&mut self, data: impl IntoIterator<Item = (String, i64)>) {
        self.phases.set_context(data);
    }

    /// Shallow-merge data into the active phase context.
    pub fn update_phase_context(&mut self, partial: impl IntoIterator<Item = (String, i64)>) {
        self.phases.update_context(partial);
    }

    /// Flag the active vote context for a runoff.
    pub fn request_runoff(&mut self) {
        self.phases.set_context_flag(crate::phases::NEEDS_RUNOFF, true);
    }

    // === Internals ===

    fn ensure_night_operation(&self) -> Result<(), EngineError> {
        if !self.status.started {
            return Err(EngineError::GameNotStarted);
        }
        if self.status.is_ended() {
            return Err(EngineError::GameAlreadyEnded);
        }
        let current = self.phases.current_phase_id();
        if current.as_str() != ids::NIGHT {
            return Err(EngineError::InvalidPhaseForOperation {
                required: PhaseId::from(ids::NIGHT),
                current: current.clone(),
            });
        }
        Ok(())
    }

    fn apply_first_night_rule(&mut self, mut request: ActionRequest) -> ActionRequest {
        if request.kind != ActionKind::Fortune {
            return request;
        }
        if self.regulation.first_night_fortune != FirstNightFortune::RandomTarget {
            return request;
        }

        let candidates: Vec<PlayerId> = self
            .players
            .alive_players()
            .into_iter()
            .map(|p| p.id)
            .filter(|id| *id != request.actor && *id != request.target)
            .collect();

        if let Some(alt) = self.rng.choose(&candidates).copied() {
            debug!(actor = %request.actor, from = %request.target, to = %alt,
                "first-night fortune target randomized");
            request.target = alt;
        }
        request
    }

    /// Synthesize a legal random action for every living night-ability
    /// role-holder who has not registered one, so the batch never starves
    /// a required role.
    fn synthesize_missing_actions(&mut self, turn: u32) {
        for actor in self.roles.night_actors(turn) {
            if !self.players.is_alive(actor.player) {
                continue;
            }
            if self.actions.has_registered(actor.player, turn) {
                continue;
            }
            let Some(kind) = actor.role.archetype.night_action() else {
                continue;
            };

            let mut candidates: Vec<PlayerId> = self
                .players
                .alive_players()
                .into_iter()
                .map(|p| p.id)
                .filter(|id| *id != actor.player)
                .collect();
            if kind == ActionKind::Guard && !self.regulation.allow_consecutive_guard {
                if let Some(previous) = self.actions.last_guard_target(actor.player) {
                    candidates.retain(|id| *id != previous);
                }
            }

            let Some(target) = self.rng.choose(&candidates).copied() else {
                debug!(player = %actor.player, "no legal target to synthesize");
                continue;
            };

            debug!(player = %actor.player, kind = %kind, %target, "synthesizing night action");
            let request = ActionRequest::new(kind, actor.player, target);
            if let Err(err) = self.actions.register_action(
                request,
                turn,
                &self.roles,
                &self.players,
                &mut self.events,
            ) {
                warn!(player = %actor.player, error = %err, "failed to synthesize action");
            }
        }
    }

    fn snapshot(&self) -> Snapshot<P> {
        Snapshot {
            phases: self.phases.clone(),
            actions: self.actions.clone(),
            status: self.status.clone(),
            players: self.players.clone(),
            rng: self.rng.capture(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot<P>) {
        self.phases = snapshot.phases;
        self.actions = snapshot.actions;
        self.status = snapshot.status;
        self.players = snapshot.players;
        self.rng.restore(&snapshot.rng);
    }

    fn execute_and_process(&mut self, turn: u32) -> Result<NightSummary, EngineError> {
        // Protection lasts one night; stale flags would shield tonight's
        // target with yesterday's guard.
        self.players.clear_guards();

        let phase = self.phases.current_phase().clone();
        let executed = self.actions.execute_actions(
            &phase,
            turn,
            &self.roles,
            &mut self.players,
            &mut self.events,
        );

        let deaths = self.process_results(turn)?;
        self.status.win_condition = self.evaluate_win();

        Ok(NightSummary {
            turn,
            executed,
            deaths,
        })
    }

    /// Dispatch each executed action's result to its kind-specific
    /// processor. The order is fixed - fortune, guard, attack, customs -
    /// so protection flags are in place before the attack resolves.
    fn process_results(&mut self, turn: u32) -> Result<Vec<NightDeath>, EngineError> {
        let mut deaths = Vec::new();
        self.process_fortunes(turn, &mut deaths);
        self.process_guards(turn);
        self.process_attacks(turn, &mut deaths)?;
        self.process_customs(turn);
        Ok(deaths)
    }

    fn executed_of_kind(&self, turn: u32, want_custom: bool, kind: Option<&ActionKind>) -> Vec<(ActionId, ActionKind, PlayerId, PlayerId, Option<ActionOutcome>)> {
        self.actions
            .executed_actions(turn)
            .filter(|a| match kind {
                Some(k) => a.kind == *k,
                None => want_custom && matches!(a.kind, ActionKind::Custom(_)),
            })
            .map(|a| (a.id, a.kind.clone(), a.actor, a.target, a.result().cloned()))
            .collect()
    }

    fn process_fortunes(&mut self, turn: u32, deaths: &mut Vec<NightDeath>) {
        for (id, kind, actor, target, outcome) in
            self.executed_of_kind(turn, false, Some(&ActionKind::Fortune))
        {
            let Some(outcome) = outcome else { continue };
            if let ActionOutcome::Fortune {
                reading,
                fox_cursed,
            } = &outcome
            {
                self.actions.record_fortune(
                    actor,
                    FortuneRecord {
                        turn,
                        target,
                        reading: *reading,
                        fox_cursed: *fox_cursed,
                    },
                );
                if *fox_cursed {
                    deaths.push(NightDeath {
                        player: target,
                        cause: DeathCause::FoxCurse,
                    });
                }
            }
            self.events.emit(GameEvent::ActionResult {
                action: id,
                kind,
                actor,
                target,
                turn,
                outcome,
            });
        }
    }

    fn process_guards(&mut self, turn: u32) {
        for (id, kind, actor, target, outcome) in
            self.executed_of_kind(turn, false, Some(&ActionKind::Guard))
        {
            let Some(outcome) = outcome else { continue };
            if outcome == ActionOutcome::Guard {
                self.players.set_guarded(target, true);
                self.actions.record_guard(actor, GuardRecord { turn, target });
                self.events.emit(GameEvent::PlayerGuarded {
                    player: target,
                    by: actor,
                    turn,
                });
            }
            self.events.emit(GameEvent::ActionResult {
                action: id,
                kind,
                actor,
                target,
                turn,
                outcome,
            });
        }
    }

    fn process_attacks(
        &mut self,
        turn: u32,
        deaths: &mut Vec<NightDeath>,
    ) -> Result<(), EngineError> {
        for (id, kind, actor, target, outcome) in
            self.executed_of_kind(turn, false, Some(&ActionKind::Attack))
        {
            let Some(outcome) = outcome else { continue };
            let outcome = match outcome {
                ActionOutcome::Attack { resolution: None } => {
                    let resolution = if self.players.is_guarded(target) {
                        AttackResolution::Guarded
                    } else if self
                        .roles
                        .role(target)
                        .map_or(false, |r| r.archetype.attack_immune())
                    {
                        AttackResolution::Immune
                    } else {
                        self.players.kill(target, DeathCause::WerewolfAttack)?;
                        self.events.emit(GameEvent::PlayerDied {
                            player: target,
                            cause: DeathCause::WerewolfAttack,
                            turn,
                        });
                        deaths.push(NightDeath {
                            player: target,
                            cause: DeathCause::WerewolfAttack,
                        });
                        AttackResolution::Killed
                    };

                    let resolved = ActionOutcome::Attack {
                        resolution: Some(resolution),
                    };
                    self.actions.set_action_result(id, resolved.clone());
                    self.events.emit(GameEvent::AttackResolved {
                        target,
                        resolution,
                        turn,
                    });
                    resolved
                }
                ActionOutcome::Attack {
                    resolution: Some(resolution),
                } => {
                    self.events.emit(GameEvent::AttackResolved {
                        target,
                        resolution,
                        turn,
                    });
                    ActionOutcome::Attack {
                        resolution: Some(resolution),
                    }
                }
                other => other,
            };

            self.events.emit(GameEvent::ActionResult {
                action: id,
                kind,
                actor,
                target,
                turn,
                outcome,
            });
        }
        Ok(())
    }

    fn process_customs(&mut self, turn: u32) {
        for (id, kind, actor, target, outcome) in self.executed_of_kind(turn, true, None) {
            let Some(outcome) = outcome else { continue };
            self.events.emit(GameEvent::ActionResult {
                action: id,
                kind,
                actor,
                target,
                turn,
                outcome,
            });
        }
    }
}
