//! Tactics Battle Engine
//!
//! Turn-based team battles between a player party and an enemy party: speed
//! ordered turns, elemental damage, timed status effects and three AI tiers.
//! The engine never prints; every state change is recorded as a
//! [`BattleEvent`] that a presentation layer can render or observe.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod errors;
pub mod items;
pub mod progression;
pub mod rosters;
pub mod settings;
pub mod skills;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, CharacterClass, Difficulty, Element, Resource, Side, SkillType, StatusKind,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine and state.
pub use battle::ai::{behavior_for, BattleView, Behavior, EasyAI, HardAI, MediumAI};
pub use battle::state::{
    Action, ActionKind, Battle, BattleEvent, BattleLog, BattleObserver, BattleStatus,
    CombatantId, FailureReason, TurnRng,
};

// Runtime types for combatants and what they can use.
pub use combatant::Combatant;
pub use items::{Item, ItemOutcome, UsableItem};
pub use settings::{BattleSettings, LogVerbosity};
pub use skills::{Skill, SkillId};

// Crate-specific error and result types.
pub use errors::{
    ActionError, ActionResult, BattleEngineError, BattleError, BattleResult, SettingsError,
};
