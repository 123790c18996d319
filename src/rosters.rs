use crate::battle::state::Battle;
use crate::combatant::Combatant;
use crate::errors::{BattleError, BattleResult};
use crate::settings::BattleSettings;
use crate::skills::SkillId;
use schema::{CharacterClass, Element};
use serde::{Deserialize, Serialize};

/// A predefined roster for demos and quick battles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabRoster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<PrefabMember>,
}

/// A predefined combatant. `skills: None` keeps the class defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabMember {
    pub name: String,
    pub class: CharacterClass,
    pub element: Element,
    pub level: u32,
    pub skills: Option<Vec<SkillId>>,
}

impl PrefabMember {
    fn new(name: &str, class: CharacterClass, element: Element, level: u32) -> Self {
        Self {
            name: name.to_string(),
            class,
            element,
            level,
            skills: None,
        }
    }

    fn with_skills(mut self, skills: Vec<SkillId>) -> Self {
        self.skills = Some(skills);
        self
    }

    pub fn build(&self) -> Combatant {
        let mut combatant = Combatant::new(self.name.clone(), self.class, self.element, self.level);
        if let Some(skills) = &self.skills {
            combatant.skills = skills.clone();
        }
        combatant
    }
}

/// Get all available prefab rosters
pub fn get_prefab_rosters() -> Vec<PrefabRoster> {
    vec![
        PrefabRoster {
            id: "vanguard".to_string(),
            name: "The Vanguard".to_string(),
            description: "Balanced adventuring party with one of every class".to_string(),
            members: vec![
                PrefabMember::new("Aldric", CharacterClass::Warrior, Element::Fire, 3),
                PrefabMember::new("Ilse", CharacterClass::Mage, Element::Water, 3),
                PrefabMember::new("Vex", CharacterClass::Rogue, Element::Earth, 3),
                PrefabMember::new("Mira", CharacterClass::Cleric, Element::Water, 3),
            ],
        },
        PrefabRoster {
            id: "goblin_raiders".to_string(),
            name: "Goblin Raiders".to_string(),
            description: "Fast, poisonous skirmishers backed by a hedge shaman".to_string(),
            members: vec![
                PrefabMember::new("Goblin Cutter", CharacterClass::Rogue, Element::Earth, 2),
                PrefabMember::new("Goblin Stabber", CharacterClass::Rogue, Element::Fire, 2),
                PrefabMember::new("Goblin Shaman", CharacterClass::Mage, Element::Earth, 2)
                    .with_skills(vec![SkillId::StoneSpear, SkillId::Hex, SkillId::Meditate]),
            ],
        },
        PrefabRoster {
            id: "ember_court".to_string(),
            name: "Ember Court".to_string(),
            description: "Fire-aligned knights that hit hard and shield each other".to_string(),
            members: vec![
                PrefabMember::new("Ember Knight", CharacterClass::Warrior, Element::Fire, 4),
                PrefabMember::new("Cinder Priest", CharacterClass::Cleric, Element::Fire, 4)
                    .with_skills(vec![SkillId::Heal, SkillId::Sanctuary, SkillId::Smite]),
                PrefabMember::new("Ashcaller", CharacterClass::Mage, Element::Fire, 4)
                    .with_skills(vec![SkillId::Fireball, SkillId::Hex, SkillId::Meditate]),
            ],
        },
    ]
}

/// Get a specific prefab roster by ID
pub fn get_prefab_roster(roster_id: &str) -> Option<PrefabRoster> {
    get_prefab_rosters().into_iter().find(|roster| roster.id == roster_id)
}

/// Build fresh combatants for a prefab roster
pub fn create_roster(roster_id: &str) -> Result<Vec<Combatant>, BattleError> {
    let roster = get_prefab_roster(roster_id)
        .ok_or_else(|| BattleError::UnknownRoster(roster_id.to_string()))?;
    Ok(roster.members.iter().map(PrefabMember::build).collect())
}

/// Set up an initialized battle between two prefab rosters
pub fn create_prefab_battle(
    settings: BattleSettings,
    players_id: &str,
    enemies_id: &str,
) -> BattleResult<Battle> {
    let players = create_roster(players_id)?;
    let enemies = create_roster(enemies_id)?;

    let mut battle = Battle::from_settings(settings);
    battle.initialize(players, enemies)?;
    Ok(battle)
}

/// Validate that all prefab rosters are properly configured
pub fn validate_prefab_rosters() -> Result<(), String> {
    let rosters = get_prefab_rosters();

    if rosters.is_empty() {
        return Err("No prefab rosters defined".to_string());
    }

    for roster in &rosters {
        if roster.members.is_empty() {
            return Err(format!("Roster '{}' has no members", roster.id));
        }

        for (i, member) in roster.members.iter().enumerate() {
            if member.level == 0 || member.level > crate::progression::MAX_LEVEL {
                return Err(format!(
                    "Roster '{}' member {} has invalid level {}",
                    roster.id, i, member.level
                ));
            }

            if member.skills.as_ref().is_some_and(|skills| skills.is_empty()) {
                return Err(format!("Roster '{}' member {} has no skills", roster.id, i));
            }
        }
    }

    Ok(())
}
