use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Timed effects a combatant can carry. Declaration order is tick order.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter,
)]
pub enum StatusKind {
    Poison,
    Burn,
    Stun,
    Shielded,
    SpeedBuff,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusKind::Poison => "Poison",
            StatusKind::Burn => "Burn",
            StatusKind::Stun => "Stun",
            StatusKind::Shielded => "Shield",
            StatusKind::SpeedBuff => "Haste", // Matches the in-game skill name
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillType {
    Damage,
    Heal,
    Buff,
    Debuff,
}

/// The pool a Heal skill or item refills.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Hp,
    Mp,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
