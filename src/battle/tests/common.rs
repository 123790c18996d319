use crate::battle::state::{Battle, TurnRng};
use crate::combatant::Combatant;
use crate::errors::ActionResult;
use crate::settings::BattleSettings;
use crate::skills::SkillId;
use schema::{CharacterClass, Element, StatusKind};

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```rust,ignore
/// let mage = TestCombatantBuilder::new("Ilse", CharacterClass::Mage)
///     .with_element(Element::Water)
///     .with_status(StatusKind::Poison)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    class: CharacterClass,
    element: Element,
    level: u32,
    skills: Option<Vec<SkillId>>,
    statuses: Vec<StatusKind>,
    current_hp: Option<u32>,
    current_mp: Option<u32>,
    defending: bool,
}

impl TestCombatantBuilder {
    /// Creates a new level 1 Fire combatant of the given class.
    pub fn new(name: &str, class: CharacterClass) -> Self {
        Self {
            name: name.to_string(),
            class,
            element: Element::Fire,
            level: 1,
            skills: None,
            statuses: Vec::new(),
            current_hp: None,
            current_mp: None,
            defending: false,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_skills(mut self, skills: Vec<SkillId>) -> Self {
        self.skills = Some(skills);
        self
    }

    /// Adds a status effect at its default duration.
    pub fn with_status(mut self, status: StatusKind) -> Self {
        self.statuses.push(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Sets the current MP. If not set, MP will be max.
    pub fn with_mp(mut self, mp: u32) -> Self {
        self.current_mp = Some(mp);
        self
    }

    pub fn defending(mut self) -> Self {
        self.defending = true;
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = Combatant::new(self.name, self.class, self.element, self.level);
        if let Some(skills) = self.skills {
            combatant.skills = skills;
        }
        for status in self.statuses {
            combatant.apply_status(status);
        }
        if let Some(hp) = self.current_hp {
            combatant.set_hp(hp);
        }
        if let Some(mp) = self.current_mp {
            combatant.set_mp(mp);
        }
        combatant.set_defending(self.defending);
        combatant
    }
}

/// Creates an initialized battle with a scripted RNG that panics if used.
/// Swap in outcomes with `set_rng` before any roll is needed.
pub fn create_test_battle(players: Vec<Combatant>, enemies: Vec<Combatant>) -> Battle {
    let mut battle = Battle::new(BattleSettings::default(), TurnRng::new_for_test(vec![]));
    if let Err(err) = battle.initialize(players, enemies) {
        panic!("Failed to initialize test battle: {}", err);
    }
    battle
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Useful for tests where the specific RNG outcome is not important, preventing panics from exhaustion.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: ActionResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// Pull the next actor, panicking if the battle has none.
pub fn expect_next_actor(battle: &mut Battle) -> crate::battle::state::CombatantId {
    match battle.next_actor() {
        Some(id) => id,
        None => panic!("Expected another actor, battle status is {}", battle.status()),
    }
}
