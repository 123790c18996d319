use crate::battle::conditions::{StatusEffects, StatusLabel, TickReport};
use crate::skills::SkillId;
use schema::{CharacterClass, Element, StatusKind};
use serde::{Deserialize, Serialize};

/// A combatant's live battle state.
///
/// Every mutator keeps `hp` within `0..=max_hp` and `mp` within `0..=max_mp`.
/// A combatant at 0 HP is dead; only [`Combatant::revive`] brings it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub class: CharacterClass,
    pub element: Element,
    pub level: u32,
    pub experience: u32,
    hp: u32,
    pub max_hp: u32,
    mp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    defending: bool,
    pub skills: Vec<SkillId>,
    pub effects: StatusEffects,
}

impl Combatant {
    /// Create a combatant from its class template at the given level, with
    /// the class's default skills and full HP/MP.
    pub fn new(name: impl Into<String>, class: CharacterClass, element: Element, level: u32) -> Self {
        let base = class.base_stats();
        let growth = class.growth();
        let levels = level.max(1) - 1;

        let max_hp = base.hp + growth.hp * levels;
        let max_mp = base.mp + growth.mp * levels;

        Combatant {
            name: name.into(),
            class,
            element,
            level: level.max(1),
            experience: 0,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            attack: base.attack + growth.attack * levels,
            defense: base.defense + growth.defense * levels,
            speed: base.speed + growth.speed * levels,
            defending: false,
            skills: SkillId::defaults_for(class),
            effects: StatusEffects::new(),
        }
    }

    // === Resource Management ===

    pub fn current_hp(&self) -> u32 {
        self.hp
    }

    pub fn current_mp(&self) -> u32 {
        self.mp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Current HP as a fraction of max HP (0.0 for a zero-HP template).
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }

    pub fn mp_fraction(&self) -> f64 {
        if self.max_mp == 0 {
            0.0
        } else {
            self.mp as f64 / self.max_mp as f64
        }
    }

    /// Set HP directly, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    /// Set MP directly, clamped to `0..=max_mp`.
    pub fn set_mp(&mut self, mp: u32) {
        self.mp = mp.min(self.max_mp);
    }

    /// Subtract HP and return the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore HP to a living combatant and return the amount actually gained.
    /// The dead stay dead; see [`Combatant::revive`].
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let gained = amount.min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }

    /// Pay `cost` MP if affordable. Returns false and leaves MP untouched otherwise.
    pub fn spend_mp(&mut self, cost: u32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_mp - self.mp);
        self.mp += gained;
        gained
    }

    /// Bring a dead combatant back with `hp` (at least 1). Returns false if it
    /// was not dead. Revival clears every lingering effect and the defend flag.
    pub fn revive(&mut self, hp: u32) -> bool {
        if self.is_alive() {
            return false;
        }
        self.hp = hp.clamp(1, self.max_hp.max(1));
        self.effects.clear();
        self.defending = false;
        true
    }

    // === Defend State ===

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn set_defending(&mut self, defending: bool) {
        self.defending = defending;
    }

    // === Status Effects ===

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.effects.is_active(kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.prevents_action()
    }

    /// Alive and not stunned.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.is_stunned()
    }

    pub fn apply_status(&mut self, kind: StatusKind) {
        self.effects.apply(kind);
    }

    pub fn remove_status(&mut self, kind: StatusKind) -> bool {
        self.effects.remove(kind).is_some()
    }

    pub fn status_label(&self) -> StatusLabel {
        StatusLabel::resolve(self.is_alive(), &self.effects)
    }

    /// Run this combatant's end-of-turn effect tick: periodic damage first
    /// (Poison, then Burn), then every duration drops by one.
    pub fn tick_statuses(&mut self) -> TickReport {
        let mut report = TickReport::default();

        for (kind, damage) in self.effects.periodic_damage(self.max_hp) {
            if !self.is_alive() {
                break;
            }
            let dealt = self.take_damage(damage);
            report.damage.push((kind, dealt));
            if !self.is_alive() {
                report.defeated = true;
            }
        }

        report.expired = self.effects.decrement();
        report
    }

    // === Effective Stats ===

    /// Base speed adjusted by passive effects (SpeedBuff: +30%).
    pub fn effective_speed(&self) -> u32 {
        (self.speed as f64 * self.effects.speed_multiplier()).round() as u32
    }

    /// Base defense adjusted by passive effects (Shielded: +50%).
    pub fn effective_defense(&self) -> f64 {
        self.defense as f64 * self.effects.defense_multiplier()
    }

    // === Skills ===

    pub fn knows(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }

    pub fn can_afford(&self, skill: SkillId) -> bool {
        self.mp >= skill.data().mp_cost
    }

    /// Known skills the combatant can currently pay for.
    pub fn affordable_skills(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.skills.iter().copied().filter(|skill| self.can_afford(*skill))
    }
}
