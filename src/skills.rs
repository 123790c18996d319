//! The shared, immutable skill catalog.
//!
//! Skills are looked up by [`SkillId`] the same way everywhere; no combatant
//! owns a `Skill`, they only list the ids they know.

use schema::{CharacterClass, Element, Resource, SkillType, StatusKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum SkillId {
    PowerStrike,
    ShieldBash,
    IronWall,
    Fireball,
    TidalWave,
    StoneSpear,
    Hex,
    Meditate,
    Backstab,
    VenomStrike,
    Haste,
    Heal,
    Smite,
    Sanctuary,
    Dazzle,
}

/// A status effect a damaging skill may inflict on its target after it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryEffect {
    pub kind: StatusKind,
    /// Percent chance, rolled on a d100.
    pub chance: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: &'static str,
    pub mp_cost: u32,
    /// Damage multiplier for Damage skills, scaling factor for Heal skills.
    pub multiplier: f64,
    pub skill_type: SkillType,
    /// Overrides the user's element for the elemental matchup.
    pub element: Option<Element>,
    /// Damage skills only: effect rolled against the target on hit.
    pub secondary: Option<SecondaryEffect>,
    /// Buff/Debuff skills only: the effect applied (to self or target).
    pub applies: Option<StatusKind>,
    /// Heal skills only: the pool restored.
    pub restores: Resource,
}

impl Skill {
    const fn damage(name: &'static str, mp_cost: u32, multiplier: f64) -> Self {
        Self {
            name,
            mp_cost,
            multiplier,
            skill_type: SkillType::Damage,
            element: None,
            secondary: None,
            applies: None,
            restores: Resource::Hp,
        }
    }

    const fn status(name: &'static str, mp_cost: u32, skill_type: SkillType, kind: StatusKind) -> Self {
        Self {
            name,
            mp_cost,
            multiplier: 1.0,
            skill_type,
            element: None,
            secondary: None,
            applies: Some(kind),
            restores: Resource::Hp,
        }
    }

    const fn heal(name: &'static str, mp_cost: u32, multiplier: f64, restores: Resource) -> Self {
        Self {
            name,
            mp_cost,
            multiplier,
            skill_type: SkillType::Heal,
            element: None,
            secondary: None,
            applies: None,
            restores,
        }
    }

    const fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    const fn with_secondary(mut self, kind: StatusKind, chance: u8) -> Self {
        self.secondary = Some(SecondaryEffect { kind, chance });
        self
    }

    /// Heal and Buff skills always target their user.
    pub fn targets_self(&self) -> bool {
        matches!(self.skill_type, SkillType::Heal | SkillType::Buff)
    }

    pub fn is_hp_heal(&self) -> bool {
        self.skill_type == SkillType::Heal && self.restores == Resource::Hp
    }
}

static POWER_STRIKE: Skill = Skill::damage("Power Strike", 10, 1.5);
static SHIELD_BASH: Skill = Skill::damage("Shield Bash", 8, 1.2).with_secondary(StatusKind::Stun, 30);
static IRON_WALL: Skill = Skill::status("Iron Wall", 6, SkillType::Buff, StatusKind::Shielded);
static FIREBALL: Skill = Skill::damage("Fireball", 15, 1.8)
    .with_element(Element::Fire)
    .with_secondary(StatusKind::Burn, 25);
static TIDAL_WAVE: Skill = Skill::damage("Tidal Wave", 15, 1.7).with_element(Element::Water);
static STONE_SPEAR: Skill = Skill::damage("Stone Spear", 15, 1.7).with_element(Element::Earth);
static HEX: Skill = Skill::status("Hex", 10, SkillType::Debuff, StatusKind::Poison);
static MEDITATE: Skill = Skill::heal("Meditate", 0, 0.3, Resource::Mp);
static BACKSTAB: Skill = Skill::damage("Backstab", 12, 2.0);
static VENOM_STRIKE: Skill = Skill::damage("Venom Strike", 8, 1.0).with_secondary(StatusKind::Poison, 50);
static HASTE: Skill = Skill::status("Haste", 6, SkillType::Buff, StatusKind::SpeedBuff);
static HEAL: Skill = Skill::heal("Heal", 12, 2.0, Resource::Hp);
static SMITE: Skill = Skill::damage("Smite", 10, 1.4);
static SANCTUARY: Skill = Skill::status("Sanctuary", 8, SkillType::Buff, StatusKind::Shielded);
static DAZZLE: Skill = Skill::status("Dazzle", 14, SkillType::Debuff, StatusKind::Stun);

impl SkillId {
    pub fn data(self) -> &'static Skill {
        match self {
            SkillId::PowerStrike => &POWER_STRIKE,
            SkillId::ShieldBash => &SHIELD_BASH,
            SkillId::IronWall => &IRON_WALL,
            SkillId::Fireball => &FIREBALL,
            SkillId::TidalWave => &TIDAL_WAVE,
            SkillId::StoneSpear => &STONE_SPEAR,
            SkillId::Hex => &HEX,
            SkillId::Meditate => &MEDITATE,
            SkillId::Backstab => &BACKSTAB,
            SkillId::VenomStrike => &VENOM_STRIKE,
            SkillId::Haste => &HASTE,
            SkillId::Heal => &HEAL,
            SkillId::Smite => &SMITE,
            SkillId::Sanctuary => &SANCTUARY,
            SkillId::Dazzle => &DAZZLE,
        }
    }

    /// The skill list a freshly created combatant of `class` starts with.
    pub fn defaults_for(class: CharacterClass) -> Vec<SkillId> {
        match class {
            CharacterClass::Warrior => vec![SkillId::PowerStrike, SkillId::ShieldBash, SkillId::IronWall],
            CharacterClass::Mage => vec![
                SkillId::Fireball,
                SkillId::TidalWave,
                SkillId::StoneSpear,
                SkillId::Hex,
                SkillId::Meditate,
            ],
            CharacterClass::Rogue => vec![SkillId::Backstab, SkillId::VenomStrike, SkillId::Haste],
            CharacterClass::Cleric => vec![SkillId::Heal, SkillId::Smite, SkillId::Sanctuary, SkillId::Dazzle],
        }
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data().name)
    }
}
