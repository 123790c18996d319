//! Battle configuration.
//!
//! Settings are an explicit value handed to [`Battle::new`](crate::Battle::new)
//! and to the AI factory; nothing reads ambient global state.

use crate::battle::state::TurnRng;
use crate::errors::SettingsError;
use schema::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How much of the battle log a presentation layer should show.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogVerbosity {
    /// Only damage, defeats and the battle result.
    Quiet,
    #[default]
    Normal,
    /// Everything, including silent bookkeeping events.
    Verbose,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BattleSettings {
    /// Strategy used for every AI-controlled combatant.
    pub difficulty: Difficulty,
    pub verbosity: LogVerbosity,
    /// Fixed seed for the battle RNG. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl BattleSettings {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Parse settings from RON text. Missing fields take their defaults.
    ///
    /// ```ron
    /// (difficulty: Hard, verbosity: Quiet, seed: Some(7))
    /// ```
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Load settings from a RON file on disk.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Build the RNG these settings call for.
    pub fn rng(&self) -> TurnRng {
        match self.seed {
            Some(seed) => TurnRng::seeded(seed),
            None => TurnRng::new_random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_settings() {
        let settings =
            BattleSettings::from_ron_str("(difficulty: Hard, verbosity: Quiet, seed: Some(7))")
                .expect("valid settings");

        assert_eq!(
            settings,
            BattleSettings {
                difficulty: Difficulty::Hard,
                verbosity: LogVerbosity::Quiet,
                seed: Some(7),
            }
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = BattleSettings::from_ron_str("(difficulty: Easy)").expect("valid settings");

        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.verbosity, LogVerbosity::Normal);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_malformed_settings_are_rejected() {
        let result = BattleSettings::from_ron_str("(difficulty: Impossible)");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let result = BattleSettings::load(Path::new("definitely/not/here.ron"));
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_seeded_rng_is_repeatable() {
        let settings = BattleSettings::new(Difficulty::Medium).with_seed(42);
        let mut a = settings.rng();
        let mut b = settings.rng();
        for _ in 0..20 {
            assert_eq!(a.next_outcome("test"), b.next_outcome("test"));
        }
    }
}
