use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum Element {
    Fire,
    Water,
    Earth,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Element {
    pub const ADVANTAGE: f64 = 1.5;
    pub const DISADVANTAGE: f64 = 0.7;
    pub const NEUTRAL: f64 = 1.0;

    /// The element this one beats in the Fire > Earth > Water > Fire cycle.
    pub fn beats(self) -> Element {
        match self {
            Element::Fire => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
        }
    }

    /// Damage multiplier for an `attacking` element hitting a `defending` one.
    /// Returns: 1.5 = advantage, 1.0 = same element, 0.7 = reverse matchup
    pub fn modifier(attacking: Element, defending: Element) -> f64 {
        if attacking == defending {
            Self::NEUTRAL
        } else if attacking.beats() == defending {
            Self::ADVANTAGE
        } else {
            Self::DISADVANTAGE
        }
    }

    pub fn has_advantage_over(self, other: Element) -> bool {
        self.beats() == other
    }
}

/// Class archetype. Drives starting stats and the default skill list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Base stats at level 1, before any growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl CharacterClass {
    pub fn base_stats(self) -> BaseStats {
        match self {
            CharacterClass::Warrior => BaseStats { hp: 120, mp: 30, attack: 25, defense: 20, speed: 10 },
            CharacterClass::Mage => BaseStats { hp: 80, mp: 80, attack: 30, defense: 8, speed: 12 },
            CharacterClass::Rogue => BaseStats { hp: 90, mp: 40, attack: 22, defense: 12, speed: 18 },
            CharacterClass::Cleric => BaseStats { hp: 95, mp: 70, attack: 16, defense: 15, speed: 11 },
        }
    }

    /// Per-level growth applied on level up.
    pub fn growth(self) -> BaseStats {
        match self {
            CharacterClass::Warrior => BaseStats { hp: 12, mp: 3, attack: 3, defense: 2, speed: 1 },
            CharacterClass::Mage => BaseStats { hp: 7, mp: 8, attack: 4, defense: 1, speed: 1 },
            CharacterClass::Rogue => BaseStats { hp: 9, mp: 4, attack: 3, defense: 1, speed: 2 },
            CharacterClass::Cleric => BaseStats { hp: 9, mp: 7, attack: 2, defense: 2, speed: 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_element_cycle() {
        assert_eq!(Element::modifier(Element::Fire, Element::Earth), 1.5);
        assert_eq!(Element::modifier(Element::Earth, Element::Water), 1.5);
        assert_eq!(Element::modifier(Element::Water, Element::Fire), 1.5);
        assert_eq!(Element::modifier(Element::Earth, Element::Fire), 0.7);
    }

    #[test]
    fn test_same_element_is_neutral() {
        for element in Element::iter() {
            assert_eq!(Element::modifier(element, element), 1.0);
        }
    }

    #[test]
    fn test_modifier_and_reverse_are_not_inverses() {
        for a in Element::iter() {
            for b in Element::iter().filter(|b| *b != a) {
                let product = Element::modifier(a, b) * Element::modifier(b, a);
                assert!((product - 1.05).abs() < 1e-9, "{a} vs {b} gave {product}");
            }
        }
    }
}
