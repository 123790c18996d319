//! Experience rewards and level-up growth.

use crate::combatant::Combatant;

pub const MAX_LEVEL: u32 = 50;
/// Experience granted per level of each defeated enemy.
const EXP_PER_ENEMY_LEVEL: u32 = 20;
/// Experience needed to go from level `n` to `n + 1` is `n` times this.
const EXP_PER_LEVEL_STEP: u32 = 100;

/// Experience needed to advance from `level` to the next one.
pub fn experience_to_next_level(level: u32) -> u32 {
    level.max(1) * EXP_PER_LEVEL_STEP
}

/// Experience each surviving party member receives for winning against `enemies`.
pub fn victory_experience(enemies: &[Combatant]) -> u32 {
    enemies.iter().map(|enemy| enemy.level * EXP_PER_ENEMY_LEVEL).sum()
}

/// Add experience and apply every level gained. Returns the levels reached,
/// in order.
pub fn gain_experience(combatant: &mut Combatant, amount: u32) -> Vec<u32> {
    let mut reached = Vec::new();
    if combatant.level >= MAX_LEVEL {
        return reached;
    }

    combatant.experience = combatant.experience.saturating_add(amount);
    while combatant.level < MAX_LEVEL
        && combatant.experience >= experience_to_next_level(combatant.level)
    {
        combatant.experience -= experience_to_next_level(combatant.level);
        level_up(combatant);
        reached.push(combatant.level);
    }

    if combatant.level >= MAX_LEVEL {
        combatant.experience = 0;
    }
    reached
}

/// Apply one level of class growth. The HP and MP gained are also granted
/// as current HP and MP.
fn level_up(combatant: &mut Combatant) {
    let growth = combatant.class.growth();
    combatant.level += 1;
    combatant.max_hp += growth.hp;
    combatant.max_mp += growth.mp;
    combatant.attack += growth.attack;
    combatant.defense += growth.defense;
    combatant.speed += growth.speed;
    combatant.heal(growth.hp);
    combatant.restore_mp(growth.mp);
}
