use crate::battle::state::CombatantId;
use crate::skills::SkillId;
use schema::Side;

/// Main error type for the tactics battle engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BattleEngineError {
    /// Error related to battle setup or lifecycle
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to loading battle settings
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Errors related to battle setup and lifecycle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// A roster was supplied with no combatants at all
    #[error("{0:?} roster is empty")]
    EmptyRoster(Side),
    /// A roster was supplied but every combatant in it is already dead
    #[error("{0:?} roster has no living combatants")]
    NoLivingCombatants(Side),
    /// The referenced combatant does not exist
    #[error("Unknown combatant: {0}")]
    UnknownCombatant(CombatantId),
    /// No prefab roster has this id
    #[error("Prefab roster '{0}' not found")]
    UnknownRoster(String),
}

/// Errors raised when validating player input, before an action is resolved.
/// None of these consume a turn; the caller is expected to re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The battle has already ended
    #[error("The battle is already over")]
    BattleOver,
    /// The action's actor is not the combatant whose turn it is
    #[error("It is not {0}'s turn")]
    NotYourTurn(CombatantId),
    /// The actor (or target) does not exist in either roster
    #[error("Unknown combatant: {0}")]
    UnknownCombatant(CombatantId),
    /// The actor is dead or stunned
    #[error("{0} cannot act")]
    ActorCannotAct(CombatantId),
    /// A skill action was built without a skill
    #[error("No skill selected")]
    MissingSkill,
    /// An item action was built without an item
    #[error("No item selected")]
    MissingItem,
    /// The action needs a target and none was chosen
    #[error("No target selected")]
    MissingTarget,
    /// The chosen target is dead and the action cannot affect the dead
    #[error("Target {0} is not a valid target")]
    InvalidTarget(CombatantId),
    /// The actor does not know the selected skill
    #[error("Skill {0:?} is not known by the actor")]
    SkillNotKnown(SkillId),
    /// The actor cannot pay the skill's MP cost
    #[error("Not enough MP: {required} required, {available} available")]
    InsufficientMp { required: u32, available: u32 },
}

/// Errors related to loading battle settings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("Could not read settings file: {0}")]
    Io(String),
    /// The settings text is not valid RON
    #[error("Malformed settings: {0}")]
    Parse(String),
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(err: ron::error::SpannedError) -> Self {
        SettingsError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err.to_string())
    }
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;
