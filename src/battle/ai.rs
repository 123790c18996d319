//! Decision-making for AI-controlled combatants.

use crate::battle::state::{Action, CombatantId, TurnRng};
use crate::combatant::Combatant;
use crate::skills::SkillId;
use ordered_float::OrderedFloat;
use schema::{Difficulty, SkillType};
use tracing::debug;

/// Everything a strategy is allowed to look at when choosing an action.
#[derive(Debug, Clone)]
pub struct BattleView<'a> {
    pub actor_id: CombatantId,
    pub actor: &'a Combatant,
    /// Living members of the actor's side, the actor included.
    pub allies: Vec<(CombatantId, &'a Combatant)>,
    /// Living members of the opposing side, in roster order.
    pub enemies: Vec<(CombatantId, &'a Combatant)>,
    pub turn_number: u32,
    /// How many times the opposing side has defended this battle.
    pub enemy_defend_count: u32,
}

impl<'a> BattleView<'a> {
    /// Build the view for `actor_id`. Returns None if the id is not in either roster.
    pub fn new(
        actor_id: CombatantId,
        players: &'a [Combatant],
        enemies: &'a [Combatant],
        turn_number: u32,
        enemy_defend_count: u32,
    ) -> Option<Self> {
        let roster_of = |side| match side {
            schema::Side::Player => players,
            schema::Side::Enemy => enemies,
        };
        let living = |side| {
            roster_of(side)
                .iter()
                .enumerate()
                .filter(|(_, combatant)| combatant.is_alive())
                .map(move |(index, combatant)| (CombatantId::new(side, index), combatant))
                .collect::<Vec<_>>()
        };

        let actor = roster_of(actor_id.side).get(actor_id.index)?;
        Some(Self {
            actor_id,
            actor,
            allies: living(actor_id.side),
            enemies: living(actor_id.side.opponent()),
            turn_number,
            enemy_defend_count,
        })
    }

    fn affordable(&self, skill_type: SkillType) -> impl Iterator<Item = SkillId> + '_ {
        self.actor
            .affordable_skills()
            .filter(move |skill| skill.data().skill_type == skill_type)
    }

    fn affordable_hp_heal(&self) -> Option<SkillId> {
        self.actor.affordable_skills().find(|skill| skill.data().is_hp_heal())
    }

    /// An affordable self-buff whose effect is not already running.
    fn fresh_buff(&self) -> Option<SkillId> {
        self.affordable(SkillType::Buff).find(|skill| {
            skill
                .data()
                .applies
                .is_some_and(|status| !self.actor.has_status(status))
        })
    }

    fn strongest(&self, skill_type: SkillType) -> Option<SkillId> {
        self.affordable(skill_type)
            .max_by_key(|skill| OrderedFloat(skill.data().multiplier))
    }

    fn cheapest(&self, skill_type: SkillType) -> Option<SkillId> {
        self.affordable(skill_type).min_by_key(|skill| skill.data().mp_cost)
    }

    fn self_skill(&self, skill: SkillId) -> Action {
        Action::skill(self.actor_id, skill, self.actor_id)
    }
}

/// A trait for any system that can decide on a battle action.
pub trait Behavior {
    /// Inspect the view and decide the actor's action. Always returns something
    /// the resolver can carry out.
    fn decide_action(&self, view: &BattleView, rng: &mut TurnRng) -> Action;
}

/// Select the strategy for a difficulty tier.
pub fn behavior_for(difficulty: Difficulty) -> Box<dyn Behavior> {
    match difficulty {
        Difficulty::Easy => Box::new(EasyAI),
        Difficulty::Medium => Box::new(MediumAI),
        Difficulty::Hard => Box::new(HardAI),
    }
}

/// Basic attack on a random living enemy, or Defend when there is none.
fn random_attack(view: &BattleView, rng: &mut TurnRng) -> Action {
    match rng.pick(&view.enemies, "ai random target") {
        Some((target, _)) => Action::attack(view.actor_id, *target),
        None => Action::defend(view.actor_id),
    }
}

/// Weighted coin flips with no tactical awareness.
pub struct EasyAI;

impl EasyAI {
    pub const ATTACK_THRESHOLD: u8 = 60;
    pub const SKILL_THRESHOLD: u8 = 90;
}

impl Behavior for EasyAI {
    fn decide_action(&self, view: &BattleView, rng: &mut TurnRng) -> Action {
        let roll = rng.next_outcome("easy ai choice");

        let action = if roll <= Self::ATTACK_THRESHOLD {
            random_attack(view, rng)
        } else if roll <= Self::SKILL_THRESHOLD {
            let skills: Vec<SkillId> = view.actor.affordable_skills().collect();
            match rng.pick(&skills, "easy ai skill").copied() {
                Some(skill) if skill.data().targets_self() => view.self_skill(skill),
                Some(skill) => match rng.pick(&view.enemies, "easy ai skill target") {
                    Some((target, _)) => Action::skill(view.actor_id, skill, *target),
                    None => Action::defend(view.actor_id),
                },
                None => random_attack(view, rng),
            }
        } else {
            Action::defend(view.actor_id)
        };

        debug!(actor = %view.actor.name, roll, kind = ?action.kind, "Easy AI decided");
        action
    }
}

/// Threshold rules on the actor's own HP and MP.
pub struct MediumAI;

impl MediumAI {
    /// Lowest-HP enemy the actor has elemental advantage over, else the
    /// lowest-HP enemy overall.
    fn pick_target(view: &BattleView) -> Option<CombatantId> {
        let element = view.actor.element;
        lowest_hp(
            view.enemies
                .iter()
                .filter(|(_, enemy)| element.has_advantage_over(enemy.element)),
        )
        .or_else(|| lowest_hp(view.enemies.iter()))
    }
}

fn lowest_hp<'v, 'a: 'v>(
    candidates: impl Iterator<Item = &'v (CombatantId, &'a Combatant)>,
) -> Option<CombatantId> {
    candidates
        .min_by_key(|(_, enemy)| enemy.current_hp())
        .map(|(id, _)| *id)
}

impl Behavior for MediumAI {
    fn decide_action(&self, view: &BattleView, _rng: &mut TurnRng) -> Action {
        let actor = view.actor;
        let Some(target) = Self::pick_target(view) else {
            return Action::defend(view.actor_id);
        };
        let attack = Action::attack(view.actor_id, target);

        let action = if actor.hp_fraction() < 0.3 {
            match view.affordable_hp_heal() {
                Some(heal) => view.self_skill(heal),
                None => Action::defend(view.actor_id),
            }
        } else if actor.mp_fraction() > 0.5 {
            view.strongest(SkillType::Damage)
                .map(|skill| Action::skill(view.actor_id, skill, target))
                .unwrap_or(attack)
        } else if actor.mp_fraction() < 0.2 {
            attack
        } else {
            view.cheapest(SkillType::Damage)
                .map(|skill| Action::skill(view.actor_id, skill, target))
                .unwrap_or(attack)
        };

        debug!(actor = %actor.name, ?action, "Medium AI decided");
        action
    }
}

/// Phase-based play driven by a per-enemy threat score.
pub struct HardAI;

impl HardAI {
    /// Enemy attack, scaled by the elemental matchup, plus flat bonuses for a
    /// weakened target and a hard hitter.
    pub fn threat_score(actor: &Combatant, enemy: &Combatant) -> f64 {
        let mut score = enemy.attack as f64;
        if actor.element.has_advantage_over(enemy.element) {
            score *= 1.5;
        } else if enemy.element.has_advantage_over(actor.element) {
            score *= 1.3;
        }

        let hp = enemy.hp_fraction();
        if hp < 0.3 {
            score += 50.0;
        } else if hp < 0.5 {
            score += 20.0;
        }

        if enemy.attack > 30 {
            score += 30.0;
        }
        score
    }

    /// Highest threat wins; on a tie the earlier enemy in the list is kept.
    fn highest_threat<'a>(view: &BattleView<'a>) -> Option<(CombatantId, &'a Combatant)> {
        view.enemies
            .iter()
            .fold(None, |best: Option<(CombatantId, &'a Combatant, f64)>, (id, enemy)| {
                let score = Self::threat_score(view.actor, enemy);
                match best {
                    Some((_, _, best_score)) if score <= best_score => best,
                    _ => Some((*id, *enemy, score)),
                }
            })
            .map(|(id, enemy, _)| (id, enemy))
    }

    fn defensive(view: &BattleView, top: CombatantId) -> Action {
        if let Some(heal) = view.affordable_hp_heal() {
            return view.self_skill(heal);
        }
        if let Some(buff) = view.fresh_buff() {
            return view.self_skill(buff);
        }
        if let Some(debuff) = view.cheapest(SkillType::Debuff) {
            return Action::skill(view.actor_id, debuff, top);
        }
        Action::defend(view.actor_id)
    }
}

impl Behavior for HardAI {
    fn decide_action(&self, view: &BattleView, _rng: &mut TurnRng) -> Action {
        let actor = view.actor;
        let Some((top, top_enemy)) = Self::highest_threat(view) else {
            return Action::defend(view.actor_id);
        };
        let hp = actor.hp_fraction();
        let mp = actor.mp_fraction();

        let action = if hp < 0.4 {
            Self::defensive(view, top)
        } else if let Some(buff) = (view.turn_number <= 2 && hp > 0.7)
            .then(|| view.fresh_buff())
            .flatten()
        {
            view.self_skill(buff)
        } else if let Some(debuff) = (view.enemy_defend_count > 2 && mp > 0.3)
            .then(|| view.cheapest(SkillType::Debuff))
            .flatten()
        {
            Action::skill(view.actor_id, debuff, top)
        } else if let Some((weak, _)) = (mp > 0.2)
            .then(|| {
                view.enemies
                    .iter()
                    .filter(|(_, enemy)| enemy.hp_fraction() < 0.3)
                    .min_by_key(|(_, enemy)| OrderedFloat(enemy.hp_fraction()))
            })
            .flatten()
        {
            match view.strongest(SkillType::Damage) {
                Some(skill) => Action::skill(view.actor_id, skill, *weak),
                None => Action::attack(view.actor_id, *weak),
            }
        } else if mp > 0.6 {
            let debuff = (top_enemy.attack > actor.defense)
                .then(|| view.cheapest(SkillType::Debuff))
                .flatten();
            match debuff.or_else(|| view.strongest(SkillType::Damage)) {
                Some(skill) => Action::skill(view.actor_id, skill, top),
                None => Action::attack(view.actor_id, top),
            }
        } else if mp > 0.3 {
            match view.cheapest(SkillType::Damage) {
                Some(skill) => Action::skill(view.actor_id, skill, top),
                None => Action::attack(view.actor_id, top),
            }
        } else {
            Action::attack(view.actor_id, top)
        };

        debug!(actor = %actor.name, %top, ?action, "Hard AI decided");
        action
    }
}
