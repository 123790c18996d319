use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, CombatantId, TurnRng};
use crate::combatant::Combatant;
use crate::skills::SkillId;
use schema::{Element, Resource, SkillType};
use tracing::trace;

/// d100 outcomes at or below this land a critical hit.
pub const CRITICAL_CHANCE: u8 = 10;
pub const CRITICAL_MULTIPLIER: f64 = 1.5;
/// Effective defense is divided by this to get the fraction of base damage blocked.
pub const DEFENSE_DIVISOR: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u32,
    pub critical: bool,
    pub element_modifier: f64,
}

/// The damage formula with every random input already decided.
///
/// Defense reduction is taken from the base before the elemental modifier is
/// applied. The result is rounded half away from zero and never below 1.
pub fn damage_formula(
    attack: u32,
    effective_defense: f64,
    multiplier: f64,
    element_modifier: f64,
    critical: bool,
    defending: bool,
) -> u32 {
    let base = attack as f64 * multiplier;
    let defense_reduction = base * (effective_defense / DEFENSE_DIVISOR);
    let critical_multiplier = if critical { CRITICAL_MULTIPLIER } else { 1.0 };

    let mut damage = (base * element_modifier - defense_reduction) * critical_multiplier;
    if defending {
        damage /= 2.0;
    }

    let rounded = damage.round();
    if rounded < 1.0 {
        1
    } else {
        rounded as u32
    }
}

/// Roll for a critical and compute the damage `attacker` deals to `defender`.
///
/// `element` overrides the attacker's own element (skills with an element tag).
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    multiplier: f64,
    element: Option<Element>,
    rng: &mut TurnRng,
) -> DamageOutcome {
    let attacking_element = element.unwrap_or(attacker.element);
    let element_modifier = Element::modifier(attacking_element, defender.element);
    let critical = rng.roll_chance(CRITICAL_CHANCE, "critical hit");

    let damage = damage_formula(
        attacker.attack,
        defender.effective_defense(),
        multiplier,
        element_modifier,
        critical,
        defender.is_defending(),
    );

    trace!(
        attacker = %attacker.name,
        defender = %defender.name,
        multiplier,
        element_modifier,
        critical,
        defending = defender.is_defending(),
        damage,
        "Damage calculated"
    );

    DamageOutcome {
        damage,
        critical,
        element_modifier,
    }
}

/// A defending target only has the one hit halved; the flag is spent with it.
fn damage_commands(
    target: CombatantId,
    defender: &Combatant,
    outcome: &DamageOutcome,
) -> Vec<BattleCommand> {
    let mut commands = vec![BattleCommand::DealDamage {
        target,
        amount: outcome.damage,
        critical: outcome.critical,
    }];
    if defender.is_defending() {
        commands.push(BattleCommand::SetDefending {
            target,
            defending: false,
        });
    }
    if outcome.element_modifier != 1.0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::ElementalMatchup {
            modifier: outcome.element_modifier,
        }));
    }
    commands
}

/// Commands for a basic attack. Both combatants are assumed alive.
pub fn calculate_attack_outcome(
    attacker_id: CombatantId,
    attacker: &Combatant,
    target_id: CombatantId,
    defender: &Combatant,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::Attacked {
        attacker: attacker.name.clone(),
        target: defender.name.clone(),
    })];

    let outcome = calculate_damage(attacker, defender, 1.0, None, rng);
    commands.extend(damage_commands(target_id, defender, &outcome));

    trace!(%attacker_id, %target_id, "Attack resolved");
    commands
}

/// Commands for a skill whose cost and targeting have already been checked.
///
/// `target` is ignored by Heal and Buff skills and required by the rest.
pub fn calculate_skill_outcome(
    user_id: CombatantId,
    user: &Combatant,
    skill_id: SkillId,
    target: Option<(CombatantId, &Combatant)>,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let skill = skill_id.data();
    let mut commands = vec![
        BattleCommand::SpendMp {
            target: user_id,
            amount: skill.mp_cost,
        },
        BattleCommand::EmitEvent(BattleEvent::SkillUsed {
            user: user.name.clone(),
            skill: skill_id,
            mp_cost: skill.mp_cost,
        }),
    ];

    match skill.skill_type {
        SkillType::Damage => {
            let Some((target_id, defender)) = target else {
                return commands;
            };
            let outcome = calculate_damage(user, defender, skill.multiplier, skill.element, rng);
            commands.extend(damage_commands(target_id, defender, &outcome));

            // The secondary effect only rolls against a target that survives the hit.
            if let Some(secondary) = skill.secondary {
                if outcome.damage < defender.current_hp()
                    && rng.roll_chance(secondary.chance, "secondary effect")
                {
                    commands.push(BattleCommand::ApplyStatus {
                        target: target_id,
                        status: secondary.kind,
                    });
                }
            }
        }
        SkillType::Heal => match skill.restores {
            Resource::Hp => commands.push(BattleCommand::Heal {
                target: user_id,
                amount: (user.attack as f64 * skill.multiplier).round() as u32,
            }),
            Resource::Mp => commands.push(BattleCommand::RestoreMp {
                target: user_id,
                amount: (user.max_mp as f64 * skill.multiplier).round() as u32,
            }),
        },
        SkillType::Buff => {
            if let Some(status) = skill.applies {
                commands.push(BattleCommand::ApplyStatus {
                    target: user_id,
                    status,
                });
            }
        }
        SkillType::Debuff => {
            if let (Some(status), Some((target_id, _))) = (skill.applies, target) {
                commands.push(BattleCommand::ApplyStatus {
                    target: target_id,
                    status,
                });
            }
        }
    }

    commands
}
