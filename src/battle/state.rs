use crate::battle::turn_orchestrator::TurnScheduler;
use crate::combatant::Combatant;
use crate::errors::BattleError;
use crate::items::Item;
use crate::settings::{BattleSettings, LogVerbosity};
use crate::skills::SkillId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{Side, StatusKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Identifies a combatant by side and roster position (team assembly order).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombatantId {
    pub side: Side,
    pub index: usize,
}

impl CombatantId {
    pub fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    pub fn player(index: usize) -> Self {
        Self::new(Side::Player, index)
    }

    pub fn enemy(index: usize) -> Self {
        Self::new(Side::Enemy, index)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side, self.index)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleStatus {
    #[default]
    Ongoing,
    Victory,
    Defeat,
}

impl BattleStatus {
    pub fn is_over(self) -> bool {
        self != BattleStatus::Ongoing
    }
}

impl fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Attack,
    Skill,
    Defend,
    Item,
}

/// One combatant's choice for its turn. Built fresh every turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub actor: CombatantId,
    pub kind: ActionKind,
    pub target: Option<CombatantId>,
    pub skill: Option<SkillId>,
    pub item: Option<Item>,
}

impl Action {
    pub fn attack(actor: CombatantId, target: CombatantId) -> Self {
        Self {
            actor,
            kind: ActionKind::Attack,
            target: Some(target),
            skill: None,
            item: None,
        }
    }

    /// Heal and Buff skills ignore `target` and always land on the actor.
    pub fn skill(actor: CombatantId, skill: SkillId, target: CombatantId) -> Self {
        Self {
            actor,
            kind: ActionKind::Skill,
            target: Some(target),
            skill: Some(skill),
            item: None,
        }
    }

    pub fn defend(actor: CombatantId) -> Self {
        Self {
            actor,
            kind: ActionKind::Defend,
            target: None,
            skill: None,
            item: None,
        }
    }

    pub fn item(actor: CombatantId, item: Item, target: CombatantId) -> Self {
        Self {
            actor,
            kind: ActionKind::Item,
            target: Some(target),
            skill: None,
            item: Some(item),
        }
    }
}

/// Why the resolver refused to carry out an action. The turn is still spent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NotEnoughMp {
        skill: SkillId,
        required: u32,
        available: u32,
    },
    CannotAct,
    NoSkillSelected,
    NoItemSelected,
    NoTarget,
    TargetDown {
        target: String,
    },
    SkillNotKnown(SkillId),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Flow
    RoundStarted {
        turn: u32,
    },
    TurnStarted {
        actor: CombatantId,
        name: String,
    },
    TurnSkipped {
        actor: CombatantId,
        name: String,
    },

    // Actions
    Attacked {
        attacker: String,
        target: String,
    },
    SkillUsed {
        user: String,
        skill: SkillId,
        mp_cost: u32,
    },
    Defending {
        name: String,
    },
    ItemUsed {
        user: String,
        item: Item,
        target: String,
    },
    ItemHadNoEffect {
        item: Item,
        target: String,
    },
    ActionFailed {
        actor: String,
        reason: FailureReason,
    },

    // Damage and recovery
    DamageDealt {
        target: String,
        damage: u32,
        remaining_hp: u32,
        critical: bool,
    },
    ElementalMatchup {
        modifier: f64,
    },
    Healed {
        target: String,
        amount: u32,
        new_hp: u32,
    },
    ManaRestored {
        target: String,
        amount: u32,
        new_mp: u32,
    },
    Revived {
        target: String,
        hp: u32,
    },
    CombatantDefeated {
        id: CombatantId,
        name: String,
    },

    // Status effects
    StatusApplied {
        target: String,
        status: StatusKind,
    },
    StatusDamage {
        target: String,
        status: StatusKind,
        damage: u32,
        remaining_hp: u32,
    },
    StatusExpired {
        target: String,
        status: StatusKind,
    },
    StatusCured {
        target: String,
        status: StatusKind,
    },

    // Rewards
    ExperienceGained {
        name: String,
        amount: u32,
    },
    LevelUp {
        name: String,
        level: u32,
    },

    BattleEnded {
        status: BattleStatus,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            // === Flow ===
            BattleEvent::RoundStarted { turn } => Some(format!("=== Round {} ===", turn)),
            BattleEvent::TurnStarted { .. } => None, // Silent - the action that follows names the actor
            BattleEvent::TurnSkipped { name, .. } => {
                Some(format!("{} is stunned and cannot act!", name))
            }

            // === Actions ===
            BattleEvent::Attacked { attacker, target } => {
                Some(format!("{} attacks {}!", attacker, target))
            }
            BattleEvent::SkillUsed { user, skill, .. } => Some(format!("{} uses {}!", user, skill)),
            BattleEvent::Defending { name } => Some(format!("{} braces for impact!", name)),
            BattleEvent::ItemUsed { user, item, target } => {
                if user == target {
                    Some(format!("{} uses a {}!", user, item))
                } else {
                    Some(format!("{} uses a {} on {}!", user, item, target))
                }
            }
            BattleEvent::ItemHadNoEffect { target, .. } => {
                Some(format!("It had no effect on {}.", target))
            }
            BattleEvent::ActionFailed { actor, reason } => {
                Some(Self::format_failure_reason(actor, reason))
            }

            // === Damage and Recovery ===
            BattleEvent::DamageDealt {
                target,
                damage,
                critical,
                ..
            } => {
                if *critical {
                    Some(format!("A critical hit! {} takes {} damage!", target, damage))
                } else {
                    Some(format!("{} takes {} damage!", target, damage))
                }
            }
            BattleEvent::ElementalMatchup { modifier } => match *modifier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                _ => None, // Neutral matchup, no message
            },
            BattleEvent::Healed { target, amount, .. } => {
                Some(format!("{} recovers {} HP!", target, amount))
            }
            BattleEvent::ManaRestored { target, amount, .. } => {
                Some(format!("{} recovers {} MP!", target, amount))
            }
            BattleEvent::Revived { target, hp } => {
                Some(format!("{} is revived with {} HP!", target, hp))
            }
            BattleEvent::CombatantDefeated { name, .. } => Some(format!("{} is defeated!", name)),

            // === Status Effects ===
            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} is affected by {}!", target, status))
            }
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
                ..
            } => Some(format!("{} is hurt by {}! ({} damage)", target, status, damage)),
            BattleEvent::StatusExpired { target, status } => {
                Some(format!("{}'s {} wore off.", target, status))
            }
            BattleEvent::StatusCured { target, status } => {
                Some(format!("{} is cured of {}!", target, status))
            }

            // === Rewards ===
            BattleEvent::ExperienceGained { name, amount } => {
                Some(format!("{} gains {} experience.", name, amount))
            }
            BattleEvent::LevelUp { name, level } => {
                Some(format!("{} reached level {}!", name, level))
            }

            BattleEvent::BattleEnded { status } => match status {
                BattleStatus::Victory => Some("Victory! All enemies have been defeated.".to_string()),
                BattleStatus::Defeat => Some("Defeat... The party has fallen.".to_string()),
                BattleStatus::Ongoing => None,
            },
        }
    }

    /// Events shown even at `LogVerbosity::Quiet`: damage, defeats and the result.
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            BattleEvent::DamageDealt { .. }
                | BattleEvent::StatusDamage { .. }
                | BattleEvent::CombatantDefeated { .. }
                | BattleEvent::BattleEnded { .. }
        )
    }

    fn format_failure_reason(actor: &str, reason: &FailureReason) -> String {
        match reason {
            FailureReason::NotEnoughMp { skill, required, available } => format!(
                "{} doesn't have enough MP for {}! ({} needed, {} left)",
                actor, skill, required, available
            ),
            FailureReason::CannotAct => format!("{} cannot act!", actor),
            FailureReason::NoSkillSelected => format!("{} hesitates. No skill selected.", actor),
            FailureReason::NoItemSelected => format!("{} hesitates. No item selected.", actor),
            FailureReason::NoTarget => format!("{} has no target!", actor),
            FailureReason::TargetDown { target } => {
                format!("{}'s action fails. {} is already down!", actor, target)
            }
            FailureReason::SkillNotKnown(skill) => format!("{} doesn't know {}!", actor, skill),
        }
    }
}

/// Receives every event as it is appended to a [`BattleLog`].
pub trait BattleObserver {
    fn on_event(&mut self, event: &BattleEvent);
}

impl<F> BattleObserver for F
where
    F: FnMut(&BattleEvent),
{
    fn on_event(&mut self, event: &BattleEvent) {
        self(event)
    }
}

/// Append-only record of everything that happened in a battle.
///
/// Presentation layers either read the events back or subscribe an observer
/// that is called synchronously on every push.
///
/// ```rust,ignore
/// battle.log().print_debug();                        // Debug format, one per line
/// battle.log().print_formatted(LogVerbosity::Normal); // Human-readable
/// println!("{}", battle.log());                      // Display trait
/// ```
#[derive(Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
    observers: Vec<Box<dyn BattleObserver>>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        self.events.push(event);
    }

    pub fn subscribe(&mut self, observer: Box<dyn BattleObserver>) {
        self.observers.push(observer);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Drop every recorded event. Subscribers stay attached.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Lines a presentation layer should show at the given verbosity.
    /// Verbose mode falls back to debug format for silent events.
    pub fn render(&self, verbosity: LogVerbosity) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match verbosity {
                LogVerbosity::Quiet if !event.is_major() => None,
                LogVerbosity::Quiet | LogVerbosity::Normal => event.format(),
                LogVerbosity::Verbose => {
                    Some(event.format().unwrap_or_else(|| format!("{:?} (silent)", event)))
                }
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    pub fn print_formatted(&self, verbosity: LogVerbosity) {
        for line in self.render(verbosity) {
            println!("  {}", line);
        }
    }
}

impl fmt::Debug for BattleLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleLog")
            .field("events", &self.events)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl fmt::Display for BattleLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// The battle's only source of randomness. Every draw is a d100 outcome in
/// `1..=100`.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    /// Replay a fixed list of outcomes. Panics when the list runs out.
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        let seed: u64 = rand::random();
        debug!(seed, "Drew fresh battle seed");
        Self::seeded(seed)
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];

                #[cfg(test)]
                println!("[RNG] Consumed {} for: {}", outcome, reason);

                *index += 1;
                outcome
            }
            RngSource::Seeded(rng) => rng.random_range(1..=100),
        }
    }

    /// True with `percent`% probability.
    pub fn roll_chance(&mut self, percent: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= percent
    }

    /// Pick one element of `items`, or None if it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T], reason: &str) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let outcome = self.next_outcome(reason).saturating_sub(1) as usize;
        let index = (outcome * items.len() / 100).min(items.len() - 1);
        items.get(index)
    }
}

/// The orchestrating aggregate: both rosters, the scheduler, the log and the
/// overall outcome. Driven one call at a time by its owner.
#[derive(Debug)]
pub struct Battle {
    pub(crate) players: Vec<Combatant>,
    pub(crate) enemies: Vec<Combatant>,
    pub(crate) scheduler: TurnScheduler,
    pub(crate) turn_number: u32,
    pub(crate) status: BattleStatus,
    pub(crate) log: BattleLog,
    pub(crate) defend_counts: [u32; 2],
    pub(crate) current_actor: Option<CombatantId>,
    pub(crate) settings: BattleSettings,
    pub(crate) rng: TurnRng,
}

impl Battle {
    pub fn new(settings: BattleSettings, rng: TurnRng) -> Self {
        Self {
            players: Vec::new(),
            enemies: Vec::new(),
            scheduler: TurnScheduler::new(),
            turn_number: 0,
            status: BattleStatus::Ongoing,
            log: BattleLog::new(),
            defend_counts: [0; 2],
            current_actor: None,
            settings,
            rng,
        }
    }

    /// Build a battle whose RNG comes from the settings' seed.
    pub fn from_settings(settings: BattleSettings) -> Self {
        let rng = settings.rng();
        Self::new(settings, rng)
    }

    /// Load both rosters and reset every piece of per-battle state.
    ///
    /// Fails if either side is empty or has nobody left standing; the battle
    /// is left untouched in that case.
    pub fn initialize(
        &mut self,
        players: Vec<Combatant>,
        enemies: Vec<Combatant>,
    ) -> Result<(), BattleError> {
        for (side, roster) in [(Side::Player, &players), (Side::Enemy, &enemies)] {
            if roster.is_empty() {
                return Err(BattleError::EmptyRoster(side));
            }
            if !roster.iter().any(Combatant::is_alive) {
                return Err(BattleError::NoLivingCombatants(side));
            }
        }

        self.players = players;
        self.enemies = enemies;
        for combatant in self.players.iter_mut().chain(self.enemies.iter_mut()) {
            combatant.set_defending(false);
        }
        self.scheduler.reset();
        self.turn_number = 0;
        self.status = BattleStatus::Ongoing;
        self.log.clear();
        self.defend_counts = [0; 2];
        self.current_actor = None;

        debug!(
            players = self.players.len(),
            enemies = self.enemies.len(),
            "Battle initialized"
        );
        Ok(())
    }

    // === Read-only Accessors ===

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn players(&self) -> &[Combatant] {
        &self.players
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.enemies
    }

    pub fn roster(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Player => &self.players,
            Side::Enemy => &self.enemies,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster(id.side).get(id.index)
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    /// The combatant returned by the last `next_actor` call, until it acts.
    pub fn current_actor(&self) -> Option<CombatantId> {
        self.current_actor
    }

    /// How many times `side` has chosen to Defend this battle.
    pub fn defend_count(&self, side: Side) -> u32 {
        self.defend_counts[side.to_index()]
    }

    /// Ids of every living combatant on `side`, in roster order.
    pub fn living(&self, side: Side) -> Vec<CombatantId> {
        self.roster(side)
            .iter()
            .enumerate()
            .filter(|(_, combatant)| combatant.is_alive())
            .map(|(index, _)| CombatantId::new(side, index))
            .collect()
    }

    pub fn subscribe(&mut self, observer: Box<dyn BattleObserver>) {
        self.log.subscribe(observer);
    }

    // === Crate-internal Mutation ===

    pub(crate) fn roster_mut(&mut self, side: Side) -> &mut Vec<Combatant> {
        match side {
            Side::Player => &mut self.players,
            Side::Enemy => &mut self.enemies,
        }
    }

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.roster_mut(id.side).get_mut(id.index)
    }

    pub(crate) fn require(&self, id: CombatantId) -> Result<&Combatant, BattleError> {
        self.combatant(id).ok_or(BattleError::UnknownCombatant(id))
    }

    pub(crate) fn require_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, BattleError> {
        self.combatant_mut(id).ok_or(BattleError::UnknownCombatant(id))
    }

    pub(crate) fn name_of(&self, id: CombatantId) -> String {
        self.combatant(id)
            .map(|combatant| combatant.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    #[cfg(test)]
    pub fn rng_mut(&mut self) -> &mut TurnRng {
        &mut self.rng
    }

    #[cfg(test)]
    pub fn set_rng(&mut self, rng: TurnRng) {
        self.rng = rng;
    }

    /// Direct roster access for scenario setup in tests.
    #[cfg(test)]
    pub fn combatant_for_test(&mut self, id: CombatantId) -> &mut Combatant {
        match self.combatant_mut(id) {
            Some(combatant) => combatant,
            None => panic!("No combatant at {}", id),
        }
    }
}
