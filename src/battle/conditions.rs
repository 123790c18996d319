use schema::StatusKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed per-kind behavior. Every effect is data, so there is one lookup
/// instead of one type per effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusProfile {
    pub default_duration: u8,
    /// Percent of max HP lost at the owner's end of turn.
    pub tick_damage_percent: u32,
    /// Added to 1.0 when computing effective defense.
    pub defense_bonus: f64,
    /// Added to 1.0 when computing effective speed.
    pub speed_bonus: f64,
    /// Owner skips its turn while active.
    pub prevents_action: bool,
    /// Removal is announced with a `StatusExpired` event. Damaging effects
    /// report through their damage events instead.
    pub announces_expiry: bool,
}

pub fn profile(kind: StatusKind) -> StatusProfile {
    match kind {
        StatusKind::Poison => StatusProfile {
            default_duration: 3,
            tick_damage_percent: 5,
            defense_bonus: 0.0,
            speed_bonus: 0.0,
            prevents_action: false,
            announces_expiry: false,
        },
        StatusKind::Burn => StatusProfile {
            default_duration: 2,
            tick_damage_percent: 7,
            defense_bonus: 0.0,
            speed_bonus: 0.0,
            prevents_action: false,
            announces_expiry: false,
        },
        StatusKind::Stun => StatusProfile {
            default_duration: 1,
            tick_damage_percent: 0,
            defense_bonus: 0.0,
            speed_bonus: 0.0,
            prevents_action: true,
            announces_expiry: true,
        },
        StatusKind::Shielded => StatusProfile {
            default_duration: 2,
            tick_damage_percent: 0,
            defense_bonus: 0.5,
            speed_bonus: 0.0,
            prevents_action: false,
            announces_expiry: true,
        },
        StatusKind::SpeedBuff => StatusProfile {
            default_duration: 3,
            tick_damage_percent: 0,
            defense_bonus: 0.0,
            speed_bonus: 0.3,
            prevents_action: false,
            announces_expiry: true,
        },
    }
}

/// Remaining-turn bookkeeping for one combatant's effects.
///
/// Keyed by kind, so re-applying an effect overwrites its duration instead of
/// stacking. Iteration follows `StatusKind` declaration order, which keeps
/// Poison ticking before Burn.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusEffects {
    active: BTreeMap<StatusKind, u8>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `kind` for its default duration.
    pub fn apply(&mut self, kind: StatusKind) {
        self.apply_for(kind, profile(kind).default_duration);
    }

    /// Apply `kind` for an explicit number of turns. Zero turns removes it.
    pub fn apply_for(&mut self, kind: StatusKind, turns: u8) {
        if turns == 0 {
            self.active.remove(&kind);
        } else {
            self.active.insert(kind, turns);
        }
    }

    pub fn remove(&mut self, kind: StatusKind) -> Option<u8> {
        self.active.remove(&kind)
    }

    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn remaining(&self, kind: StatusKind) -> Option<u8> {
        self.active.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, u8)> + '_ {
        self.active.iter().map(|(kind, turns)| (*kind, *turns))
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Remove every effect, returning what was removed in tick order.
    pub fn cure_all(&mut self) -> Vec<StatusKind> {
        std::mem::take(&mut self.active).into_keys().collect()
    }

    /// Remove Poison, Burn and Stun, returning what was removed.
    pub fn cure_harmful(&mut self) -> Vec<StatusKind> {
        let harmful = [StatusKind::Poison, StatusKind::Burn, StatusKind::Stun];
        harmful
            .into_iter()
            .filter(|kind| self.active.remove(kind).is_some())
            .collect()
    }

    pub fn prevents_action(&self) -> bool {
        self.active.keys().any(|kind| profile(*kind).prevents_action)
    }

    /// Damage owed this tick by every damaging effect, in tick order.
    /// Each entry is at least 1.
    pub fn periodic_damage(&self, max_hp: u32) -> Vec<(StatusKind, u32)> {
        self.active
            .keys()
            .filter_map(|kind| {
                let percent = profile(*kind).tick_damage_percent;
                (percent > 0).then(|| (*kind, (max_hp * percent / 100).max(1)))
            })
            .collect()
    }

    /// Decrement every duration by one and drop the ones that reach zero.
    /// Returns the removed kinds.
    pub fn decrement(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.active.retain(|kind, turns| {
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(*kind);
            }
            *turns > 0
        });
        expired
    }

    pub fn defense_multiplier(&self) -> f64 {
        1.0 + self.active.keys().map(|kind| profile(*kind).defense_bonus).sum::<f64>()
    }

    pub fn speed_multiplier(&self) -> f64 {
        1.0 + self.active.keys().map(|kind| profile(*kind).speed_bonus).sum::<f64>()
    }
}

/// What one end-of-turn tick did to its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// (effect, HP actually lost) for every damaging effect that fired.
    pub damage: Vec<(StatusKind, u32)>,
    pub expired: Vec<StatusKind>,
    /// The tick took the owner to 0 HP.
    pub defeated: bool,
}

/// The one-word status a presentation layer shows next to a combatant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Dead,
    Stunned,
    Poisoned,
    Shielded,
    Normal,
}

impl StatusLabel {
    /// Dead > Stunned > Poisoned > Shielded > Normal.
    pub fn resolve(alive: bool, effects: &StatusEffects) -> Self {
        if !alive {
            StatusLabel::Dead
        } else if effects.is_active(StatusKind::Stun) {
            StatusLabel::Stunned
        } else if effects.is_active(StatusKind::Poison) {
            StatusLabel::Poisoned
        } else if effects.is_active(StatusKind::Shielded) {
            StatusLabel::Shielded
        } else {
            StatusLabel::Normal
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
