use crate::battle::state::{Battle, BattleEvent, CombatantId};
use crate::combatant::Combatant;
use schema::Side;
use std::collections::VecDeque;
use tracing::debug;

/// Where the scheduler is within the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    /// Combatants still to act this round, fastest first.
    Active(VecDeque<CombatantId>),
    /// The round is exhausted; the next pop must rebuild.
    NeedsRebuild,
}

/// Speed-ordered turn queue that refills itself once per round.
///
/// Priorities are fixed when a round is built. A SpeedBuff picked up mid-round
/// only matters from the next round on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnScheduler {
    state: SchedulerState,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::NeedsRebuild,
        }
    }

    pub fn reset(&mut self) {
        self.state = SchedulerState::NeedsRebuild;
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Combatants still queued this round, in acting order.
    pub fn remaining(&self) -> Vec<CombatantId> {
        match &self.state {
            SchedulerState::Active(queue) => queue.iter().copied().collect(),
            SchedulerState::NeedsRebuild => Vec::new(),
        }
    }

    /// Turn order for a fresh round: every living combatant by effective speed,
    /// fastest first. Ties keep insertion order, players before enemies.
    pub fn build_order(players: &[Combatant], enemies: &[Combatant]) -> VecDeque<CombatantId> {
        let mut entries: Vec<(CombatantId, u32)> = [(Side::Player, players), (Side::Enemy, enemies)]
            .into_iter()
            .flat_map(|(side, roster)| {
                roster
                    .iter()
                    .enumerate()
                    .filter(|(_, combatant)| combatant.is_alive())
                    .map(move |(index, combatant)| {
                        (CombatantId::new(side, index), combatant.effective_speed())
                    })
            })
            .collect();

        // sort_by is stable
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.into_iter().map(|(id, _)| id).collect()
    }

    pub fn start_round(&mut self, order: VecDeque<CombatantId>) {
        self.state = SchedulerState::Active(order);
    }

    /// Take the next queued id. Returns None, and moves to `NeedsRebuild`, once
    /// the round has nobody left.
    pub fn pop(&mut self) -> Option<CombatantId> {
        match &mut self.state {
            SchedulerState::Active(queue) => match queue.pop_front() {
                Some(id) => Some(id),
                None => {
                    self.state = SchedulerState::NeedsRebuild;
                    None
                }
            },
            SchedulerState::NeedsRebuild => None,
        }
    }
}

impl Battle {
    /// Advance to the next combatant allowed to act.
    ///
    /// Dead combatants are dropped silently. Stunned ones are logged as skipped
    /// and run their own end-of-turn tick on the spot, which is what lets Stun
    /// wear off. Returns None once the battle is over or nobody is alive.
    pub fn next_actor(&mut self) -> Option<CombatantId> {
        loop {
            if self.status.is_over() {
                return None;
            }

            let Some(id) = self.scheduler.pop() else {
                let order = TurnScheduler::build_order(&self.players, &self.enemies);
                if order.is_empty() {
                    return None;
                }
                self.turn_number += 1;
                debug!(turn = self.turn_number, order = ?order, "Starting round");
                self.log.push(BattleEvent::RoundStarted {
                    turn: self.turn_number,
                });
                self.scheduler.start_round(order);
                continue;
            };

            let Some(combatant) = self.combatant(id) else {
                continue;
            };
            if !combatant.is_alive() {
                continue;
            }

            let name = combatant.name.clone();
            if combatant.is_stunned() {
                debug!(%id, "Skipping stunned combatant");
                self.log.push(BattleEvent::TurnSkipped { actor: id, name });
                self.run_end_of_turn(id);
                self.check_battle_end();
                continue;
            }

            if let Some(actor) = self.combatant_mut(id) {
                actor.set_defending(false);
            }
            self.current_actor = Some(id);
            self.log.push(BattleEvent::TurnStarted { actor: id, name });
            return Some(id);
        }
    }
}
