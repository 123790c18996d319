//! Battle items and the contract the resolver uses to apply them.
//!
//! The resolver only decides whether a target is legal. What an item does to
//! that target is entirely the item's business.

use crate::combatant::Combatant;
use schema::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Anything that can be used on a combatant from the item menu.
pub trait UsableItem {
    fn name(&self) -> &'static str;

    /// Whether the item may be aimed at a combatant with 0 HP.
    fn can_target_dead(&self) -> bool {
        false
    }

    /// Apply the item's effect to `target` and report what happened.
    fn apply(&self, target: &mut Combatant) -> ItemOutcome;
}

/// What using an item actually did.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Healed { amount: u32 },
    ManaRestored { amount: u32 },
    Cured { removed: Vec<StatusKind> },
    Buffed { status: StatusKind },
    Revived { hp: u32 },
    NoEffect,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Item {
    Potion,
    HiPotion,
    Ether,
    /// Cures Poison, Burn and Stun.
    Remedy,
    /// Cures every effect, good and bad.
    Panacea,
    IronTonic,
    SwiftDraught,
    /// Revives a fallen combatant at a quarter of max HP.
    PhoenixFeather,
}

impl Item {
    pub const POTION_HP: u32 = 50;
    pub const HI_POTION_HP: u32 = 120;
    pub const ETHER_MP: u32 = 30;
    pub const REVIVE_PERCENT: u32 = 25;
}

impl UsableItem for Item {
    fn name(&self) -> &'static str {
        match self {
            Item::Potion => "Potion",
            Item::HiPotion => "Hi-Potion",
            Item::Ether => "Ether",
            Item::Remedy => "Remedy",
            Item::Panacea => "Panacea",
            Item::IronTonic => "Iron Tonic",
            Item::SwiftDraught => "Swift Draught",
            Item::PhoenixFeather => "Phoenix Feather",
        }
    }

    fn can_target_dead(&self) -> bool {
        matches!(self, Item::PhoenixFeather)
    }

    fn apply(&self, target: &mut Combatant) -> ItemOutcome {
        let outcome = match self {
            Item::Potion => ItemOutcome::Healed { amount: target.heal(Self::POTION_HP) },
            Item::HiPotion => ItemOutcome::Healed { amount: target.heal(Self::HI_POTION_HP) },
            Item::Ether => ItemOutcome::ManaRestored { amount: target.restore_mp(Self::ETHER_MP) },
            Item::Remedy => ItemOutcome::Cured { removed: target.effects.cure_harmful() },
            Item::Panacea => ItemOutcome::Cured { removed: target.effects.cure_all() },
            Item::IronTonic => {
                target.apply_status(StatusKind::Shielded);
                ItemOutcome::Buffed { status: StatusKind::Shielded }
            }
            Item::SwiftDraught => {
                target.apply_status(StatusKind::SpeedBuff);
                ItemOutcome::Buffed { status: StatusKind::SpeedBuff }
            }
            Item::PhoenixFeather => {
                let hp = (target.max_hp * Self::REVIVE_PERCENT / 100).max(1);
                if target.revive(hp) {
                    ItemOutcome::Revived { hp: target.current_hp() }
                } else {
                    ItemOutcome::NoEffect
                }
            }
        };

        match outcome {
            ItemOutcome::Healed { amount: 0 }
            | ItemOutcome::ManaRestored { amount: 0 } => ItemOutcome::NoEffect,
            ItemOutcome::Cured { ref removed } if removed.is_empty() => ItemOutcome::NoEffect,
            other => other,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{CharacterClass, Element};

    fn cleric() -> Combatant {
        Combatant::new("Mira", CharacterClass::Cleric, Element::Water, 1)
    }

    #[test]
    fn test_potion_heals_up_to_max() {
        let mut target = cleric();
        target.take_damage(30);
        assert_eq!(Item::Potion.apply(&mut target), ItemOutcome::Healed { amount: 30 });
        assert_eq!(target.current_hp(), target.max_hp);
        assert_eq!(Item::Potion.apply(&mut target), ItemOutcome::NoEffect);
    }

    #[test]
    fn test_remedy_keeps_buffs_but_panacea_does_not() {
        let mut target = cleric();
        target.apply_status(StatusKind::Burn);
        target.apply_status(StatusKind::Shielded);

        assert_eq!(
            Item::Remedy.apply(&mut target),
            ItemOutcome::Cured { removed: vec![StatusKind::Burn] }
        );
        assert!(target.has_status(StatusKind::Shielded));

        assert_eq!(
            Item::Panacea.apply(&mut target),
            ItemOutcome::Cured { removed: vec![StatusKind::Shielded] }
        );
        assert!(target.effects.is_empty());
    }

    #[test]
    fn test_only_phoenix_feather_revives() {
        let mut target = cleric();
        target.take_damage(target.max_hp);

        assert_eq!(Item::Potion.apply(&mut target), ItemOutcome::NoEffect);
        assert!(!target.is_alive());

        assert_eq!(Item::PhoenixFeather.apply(&mut target), ItemOutcome::Revived { hp: 23 });
        assert!(target.is_alive());
        assert_eq!(Item::PhoenixFeather.apply(&mut target), ItemOutcome::NoEffect);
    }

    #[test]
    fn test_dead_targeting_rules() {
        assert!(Item::PhoenixFeather.can_target_dead());
        assert!(!Item::HiPotion.can_target_dead());
        assert!(!Item::Panacea.can_target_dead());
    }
}
