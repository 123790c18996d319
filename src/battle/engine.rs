use crate::battle::ai::{behavior_for, BattleView};
use crate::battle::calculators::{calculate_attack_outcome, calculate_skill_outcome};
use crate::battle::commands::{execute_command_batch, BattleCommand};
use crate::battle::conditions::profile;
use crate::battle::state::{
    Action, ActionKind, Battle, BattleEvent, BattleStatus, CombatantId, FailureReason,
};
use crate::errors::{ActionError, ActionResult, BattleError};
use crate::items::UsableItem;
use crate::progression;
use tracing::{debug, warn};

impl Battle {
    /// Resolve one action, tick the actor's effects and re-check the outcome.
    ///
    /// Refused actions (dead target, missing MP, nothing selected) are logged
    /// and still use up the turn. Calls after the battle has ended are ignored.
    pub fn execute_action(&mut self, action: Action) {
        if self.status.is_over() {
            warn!(?action, status = %self.status, "Ignoring action after battle end");
            return;
        }

        debug!(actor = %action.actor, kind = ?action.kind, target = ?action.target, "Executing action");
        let actor = action.actor;

        let commands = match self.resolve_action(&action) {
            Ok(commands) => commands,
            Err(reason) => vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                actor: self.name_of(actor),
                reason,
            })],
        };

        if let Err(err) = execute_command_batch(commands, self) {
            warn!(%err, "Command batch aborted");
        }

        self.current_actor = None;
        self.run_end_of_turn(actor);
        self.check_battle_end();
    }

    /// Check an action the way a menu would before accepting it. Nothing is
    /// mutated and a rejected action does not use up the turn.
    pub fn validate_action(&self, action: &Action) -> ActionResult<()> {
        if self.status.is_over() {
            return Err(ActionError::BattleOver);
        }
        if self.current_actor != Some(action.actor) {
            return Err(ActionError::NotYourTurn(action.actor));
        }
        let actor = self
            .combatant(action.actor)
            .ok_or(ActionError::UnknownCombatant(action.actor))?;
        if !actor.can_act() {
            return Err(ActionError::ActorCannotAct(action.actor));
        }

        match action.kind {
            ActionKind::Attack => self.validate_living_target(action.target),
            ActionKind::Skill => {
                let skill_id = action.skill.ok_or(ActionError::MissingSkill)?;
                if !actor.knows(skill_id) {
                    return Err(ActionError::SkillNotKnown(skill_id));
                }
                let skill = skill_id.data();
                if !actor.can_afford(skill_id) {
                    return Err(ActionError::InsufficientMp {
                        required: skill.mp_cost,
                        available: actor.current_mp(),
                    });
                }
                if skill.targets_self() {
                    Ok(())
                } else {
                    self.validate_living_target(action.target)
                }
            }
            ActionKind::Defend => Ok(()),
            ActionKind::Item => {
                let item = action.item.ok_or(ActionError::MissingItem)?;
                let target_id = action.target.ok_or(ActionError::MissingTarget)?;
                let target = self
                    .combatant(target_id)
                    .ok_or(ActionError::UnknownCombatant(target_id))?;
                if !target.is_alive() && !item.can_target_dead() {
                    return Err(ActionError::InvalidTarget(target_id));
                }
                Ok(())
            }
        }
    }

    /// Validate, then execute. A rejected action leaves the battle untouched.
    pub fn submit_action(&mut self, action: Action) -> ActionResult<()> {
        self.validate_action(&action)?;
        self.execute_action(action);
        Ok(())
    }

    /// Ask the configured AI strategy what `actor` should do.
    pub fn decide_action(&mut self, actor: CombatantId) -> Result<Action, BattleError> {
        let view = BattleView::new(
            actor,
            &self.players,
            &self.enemies,
            self.turn_number,
            self.defend_counts[actor.side.opponent().to_index()],
        )
        .ok_or(BattleError::UnknownCombatant(actor))?;

        let behavior = behavior_for(self.settings.difficulty);
        Ok(behavior.decide_action(&view, &mut self.rng))
    }

    /// Pull the next actor, let the AI pick its action and resolve it.
    /// Returns the action taken, or None once the battle is over.
    pub fn take_ai_turn(&mut self) -> Option<Action> {
        let actor = self.next_actor()?;
        let action = match self.decide_action(actor) {
            Ok(action) => action,
            Err(err) => {
                warn!(%err, "AI could not decide");
                Action::defend(actor)
            }
        };
        self.execute_action(action.clone());
        Some(action)
    }

    fn validate_living_target(&self, target: Option<CombatantId>) -> ActionResult<()> {
        let target_id = target.ok_or(ActionError::MissingTarget)?;
        let target = self
            .combatant(target_id)
            .ok_or(ActionError::UnknownCombatant(target_id))?;
        if target.is_alive() {
            Ok(())
        } else {
            Err(ActionError::InvalidTarget(target_id))
        }
    }

    /// A living target for an action, or the reason it has none.
    fn living_target(&self, target: Option<CombatantId>) -> Result<CombatantId, FailureReason> {
        let target_id = target.ok_or(FailureReason::NoTarget)?;
        match self.combatant(target_id) {
            Some(combatant) if combatant.is_alive() => Ok(target_id),
            _ => Err(FailureReason::TargetDown {
                target: self.name_of(target_id),
            }),
        }
    }

    fn resolve_action(&mut self, action: &Action) -> Result<Vec<BattleCommand>, FailureReason> {
        let actor_id = action.actor;
        let actor = match self.combatant(actor_id) {
            Some(actor) if actor.can_act() => actor.clone(),
            _ => return Err(FailureReason::CannotAct),
        };

        match action.kind {
            ActionKind::Attack => {
                let target_id = self.living_target(action.target)?;
                let defender = self.require(target_id).map_err(|_| FailureReason::NoTarget)?.clone();
                Ok(calculate_attack_outcome(
                    actor_id,
                    &actor,
                    target_id,
                    &defender,
                    &mut self.rng,
                ))
            }
            ActionKind::Skill => {
                let skill_id = action.skill.ok_or(FailureReason::NoSkillSelected)?;
                if !actor.knows(skill_id) {
                    return Err(FailureReason::SkillNotKnown(skill_id));
                }
                let skill = skill_id.data();
                if !actor.can_afford(skill_id) {
                    return Err(FailureReason::NotEnoughMp {
                        skill: skill_id,
                        required: skill.mp_cost,
                        available: actor.current_mp(),
                    });
                }

                let target = if skill.targets_self() {
                    None
                } else {
                    let target_id = self.living_target(action.target)?;
                    let defender = self.require(target_id).map_err(|_| FailureReason::NoTarget)?.clone();
                    Some((target_id, defender))
                };

                Ok(calculate_skill_outcome(
                    actor_id,
                    &actor,
                    skill_id,
                    target.as_ref().map(|(id, defender)| (*id, defender)),
                    &mut self.rng,
                ))
            }
            ActionKind::Defend => Ok(vec![
                BattleCommand::SetDefending {
                    target: actor_id,
                    defending: true,
                },
                BattleCommand::RecordDefend { side: actor_id.side },
                BattleCommand::EmitEvent(BattleEvent::Defending {
                    name: actor.name.clone(),
                }),
            ]),
            ActionKind::Item => {
                let item = action.item.ok_or(FailureReason::NoItemSelected)?;
                let target_id = action.target.ok_or(FailureReason::NoTarget)?;
                let target = self.combatant(target_id).ok_or_else(|| FailureReason::TargetDown {
                    target: target_id.to_string(),
                })?;
                if !target.is_alive() && !item.can_target_dead() {
                    return Err(FailureReason::TargetDown {
                        target: target.name.clone(),
                    });
                }

                Ok(vec![
                    BattleCommand::EmitEvent(BattleEvent::ItemUsed {
                        user: actor.name.clone(),
                        item,
                        target: target.name.clone(),
                    }),
                    BattleCommand::UseItem {
                        target: target_id,
                        item,
                    },
                ])
            }
        }
    }

    /// The owner's end-of-turn effect tick: periodic damage, then every
    /// duration drops by one. Only Stun, Shielded and SpeedBuff announce
    /// their expiry.
    pub(crate) fn run_end_of_turn(&mut self, id: CombatantId) {
        let Some(combatant) = self.combatant_mut(id) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }

        let name = combatant.name.clone();
        let hp_before = combatant.current_hp();
        let report = combatant.tick_statuses();
        let alive = combatant.is_alive();

        let mut remaining_hp = hp_before;
        for (status, damage) in report.damage {
            remaining_hp = remaining_hp.saturating_sub(damage);
            self.log.push(BattleEvent::StatusDamage {
                target: name.clone(),
                status,
                damage,
                remaining_hp,
            });
        }

        if report.defeated {
            self.log.push(BattleEvent::CombatantDefeated { id, name });
            return;
        }

        if alive {
            for status in report.expired {
                if profile(status).announces_expiry {
                    self.log.push(BattleEvent::StatusExpired {
                        target: name.clone(),
                        status,
                    });
                }
            }
        }
    }

    /// Settle the battle once a side has nobody left standing. The player side
    /// is checked first, so a simultaneous wipe is a Defeat.
    pub(crate) fn check_battle_end(&mut self) {
        if self.status.is_over() {
            return;
        }

        let players_alive = self.players.iter().any(|c| c.is_alive());
        let enemies_alive = self.enemies.iter().any(|c| c.is_alive());

        self.status = if !players_alive {
            BattleStatus::Defeat
        } else if !enemies_alive {
            BattleStatus::Victory
        } else {
            return;
        };

        debug!(status = %self.status, turn = self.turn_number, "Battle ended");
        self.current_actor = None;
        self.log.push(BattleEvent::BattleEnded {
            status: self.status,
        });

        if self.status == BattleStatus::Victory {
            self.award_victory_experience();
        }
    }

    fn award_victory_experience(&mut self) {
        let amount = progression::victory_experience(&self.enemies);
        if amount == 0 {
            return;
        }

        for combatant in self.players.iter_mut().filter(|c| c.is_alive()) {
            let levels = progression::gain_experience(combatant, amount);
            self.log.push(BattleEvent::ExperienceGained {
                name: combatant.name.clone(),
                amount,
            });
            for level in levels {
                self.log.push(BattleEvent::LevelUp {
                    name: combatant.name.clone(),
                    level,
                });
            }
        }
    }
}
