use crate::battle::state::{Battle, BattleEvent, CombatantId};
use crate::errors::BattleError;
use crate::items::{Item, ItemOutcome, UsableItem};
use schema::{Side, StatusKind};

/// Atomic commands representing final state changes.
///
/// Calculators read the battle and produce these; only [`execute_command`]
/// mutates. Commands that change a combatant also emit the matching event.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    DealDamage {
        target: CombatantId,
        amount: u32,
        critical: bool,
    },
    Heal {
        target: CombatantId,
        amount: u32,
    },
    RestoreMp {
        target: CombatantId,
        amount: u32,
    },
    SpendMp {
        target: CombatantId,
        amount: u32,
    },
    ApplyStatus {
        target: CombatantId,
        status: StatusKind,
    },
    SetDefending {
        target: CombatantId,
        defending: bool,
    },
    RecordDefend {
        side: Side,
    },
    UseItem {
        target: CombatantId,
        item: Item,
    },
    EmitEvent(BattleEvent),
}

pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    battle: &mut Battle,
) -> Result<(), BattleError> {
    for command in commands {
        execute_command(command, battle)?;
    }
    Ok(())
}

pub fn execute_command(command: BattleCommand, battle: &mut Battle) -> Result<(), BattleError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            battle.log.push(event);
        }
        BattleCommand::DealDamage {
            target,
            amount,
            critical,
        } => {
            let combatant = battle.require_mut(target)?;
            let was_alive = combatant.is_alive();
            let dealt = combatant.take_damage(amount);
            let name = combatant.name.clone();
            let remaining_hp = combatant.current_hp();

            battle.log.push(BattleEvent::DamageDealt {
                target: name.clone(),
                damage: dealt,
                remaining_hp,
                critical,
            });
            if was_alive && remaining_hp == 0 {
                battle.log.push(BattleEvent::CombatantDefeated { id: target, name });
            }
        }
        BattleCommand::Heal { target, amount } => {
            let combatant = battle.require_mut(target)?;
            let gained = combatant.heal(amount);
            let event = BattleEvent::Healed {
                target: combatant.name.clone(),
                amount: gained,
                new_hp: combatant.current_hp(),
            };
            battle.log.push(event);
        }
        BattleCommand::RestoreMp { target, amount } => {
            let combatant = battle.require_mut(target)?;
            let gained = combatant.restore_mp(amount);
            let event = BattleEvent::ManaRestored {
                target: combatant.name.clone(),
                amount: gained,
                new_mp: combatant.current_mp(),
            };
            battle.log.push(event);
        }
        BattleCommand::SpendMp { target, amount } => {
            // Affordability is checked before the command is issued.
            battle.require_mut(target)?.spend_mp(amount);
        }
        BattleCommand::ApplyStatus { target, status } => {
            let combatant = battle.require_mut(target)?;
            combatant.apply_status(status);
            let event = BattleEvent::StatusApplied {
                target: combatant.name.clone(),
                status,
            };
            battle.log.push(event);
        }
        BattleCommand::SetDefending { target, defending } => {
            battle.require_mut(target)?.set_defending(defending);
        }
        BattleCommand::RecordDefend { side } => {
            battle.defend_counts[side.to_index()] += 1;
        }
        BattleCommand::UseItem { target, item } => {
            let combatant = battle.require_mut(target)?;
            let outcome = item.apply(combatant);
            let name = combatant.name.clone();
            let (hp, mp) = (combatant.current_hp(), combatant.current_mp());

            match outcome {
                ItemOutcome::Healed { amount } => battle.log.push(BattleEvent::Healed {
                    target: name,
                    amount,
                    new_hp: hp,
                }),
                ItemOutcome::ManaRestored { amount } => battle.log.push(BattleEvent::ManaRestored {
                    target: name,
                    amount,
                    new_mp: mp,
                }),
                ItemOutcome::Cured { removed } => {
                    for status in removed {
                        battle.log.push(BattleEvent::StatusCured {
                            target: name.clone(),
                            status,
                        });
                    }
                }
                ItemOutcome::Buffed { status } => battle.log.push(BattleEvent::StatusApplied {
                    target: name,
                    status,
                }),
                ItemOutcome::Revived { hp } => {
                    battle.log.push(BattleEvent::Revived { target: name, hp })
                }
                ItemOutcome::NoEffect => battle
                    .log
                    .push(BattleEvent::ItemHadNoEffect { item, target: name }),
            }
        }
    }
    Ok(())
}
