//! Turn scheduling: initiative queue, round bookkeeping, combat termination.
//!
//! The queue is rebuilt every round: each live unit contributes
//! `turns_per_round` entries tagged with their index within the round,
//! sorted by `(turn_index asc, speed desc)` with spawn order as the stable
//! tie-break. That ordering is observable (initiative UI, AI turn order)
//! and must be reproduced exactly from identical inputs.
//!
//! # Invariants
//!
//! - Units that die mid-round are skipped when their entries surface; the
//!   surviving entries are never reordered.
//! - `Ended` is terminal: no call mutates the scheduler afterwards.

use crate::common::{Team, UnitId};
use crate::events::{EventQueue, SimEvent};
use crate::unit::Units;

/// Where the scheduler currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerPhase {
    /// No combat running (before the first round or after a restart).
    Idle,
    /// The given unit is taking its turn.
    Active(UnitId),
    /// Combat is over; terminal.
    Ended { player_won: bool },
}

/// One slot in the per-round initiative order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeEntry {
    pub unit: UnitId,
    /// Which of the unit's turns within the round this entry is.
    pub turn_index: u32,
}

/// Builds and advances the initiative queue, and detects combat end.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnScheduler {
    queue: Vec<InitiativeEntry>,
    queue_index: usize,
    round: u32,
    phase: SchedulerPhase,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            queue_index: 0,
            round: 1,
            phase: SchedulerPhase::Idle,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn active_unit(&self) -> Option<UnitId> {
        match self.phase {
            SchedulerPhase::Active(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, SchedulerPhase::Ended { .. })
    }

    /// This round's initiative order, for UI display.
    pub fn initiative_order(&self) -> &[InitiativeEntry] {
        &self.queue
    }

    /// Current position within the initiative order.
    pub fn queue_index(&self) -> usize {
        self.queue_index
    }

    /// Starts (or restarts) combat: builds the first queue and advances to
    /// the first unit.
    pub fn start_first_round(&mut self, units: &mut Units, events: &mut EventQueue) {
        self.phase = SchedulerPhase::Idle;
        self.round = 1;
        self.build_queue(units);
        events.push(SimEvent::RoundStarted { round: self.round });
        tracing::debug!(round = self.round, entries = self.queue.len(), "round started");
        self.advance(units, events);
    }

    /// Ends the current unit's turn and hands the floor to the next entry.
    pub fn request_end_turn(&mut self, units: &mut Units, events: &mut EventQueue) {
        self.advance(units, events);
    }

    /// Moves to the next live entry, rolling the round over when the queue
    /// runs out. Resets the incoming unit's per-turn pools.
    pub fn advance(&mut self, units: &mut Units, events: &mut EventQueue) {
        if self.is_ended() || self.check_combat_end(units, events) {
            return;
        }
        events.push(SimEvent::TurnChanged);

        while self.queue_index < self.queue.len() {
            let entry = self.queue[self.queue_index];
            self.queue_index += 1;

            let Some(unit) = units.get_mut(entry.unit) else {
                // Unit died since the queue was built; skip its slot.
                continue;
            };

            unit.start_turn();
            self.phase = SchedulerPhase::Active(entry.unit);
            events.push(SimEvent::ActiveUnitChanged { unit: entry.unit });
            tracing::debug!(unit = %entry.unit, turn_index = entry.turn_index, "unit active");
            return;
        }

        // Queue exhausted: next round.
        self.round += 1;
        self.build_queue(units);
        events.push(SimEvent::RoundStarted { round: self.round });
        tracing::debug!(round = self.round, entries = self.queue.len(), "round started");
        if self.queue.is_empty() {
            self.phase = SchedulerPhase::Idle;
            return;
        }
        self.advance(units, events);
    }

    /// Checks the win/loss condition and transitions to `Ended` when a team
    /// has no units left. Returns true when combat is (now) over.
    ///
    /// Loss is checked before victory, so a simultaneous wipe counts as a
    /// player loss.
    pub fn check_combat_end(&mut self, units: &Units, events: &mut EventQueue) -> bool {
        if self.is_ended() {
            return true;
        }
        let players = units.count_team(Team::Player);
        let enemies = units.count_team(Team::Enemy);

        let player_won = if players == 0 {
            false
        } else if enemies == 0 {
            true
        } else {
            return false;
        };

        self.phase = SchedulerPhase::Ended { player_won };
        events.push(SimEvent::CombatEnded { player_won });
        tracing::info!(player_won, "combat ended");
        true
    }

    fn build_queue(&mut self, units: &Units) {
        self.queue.clear();
        self.queue_index = 0;

        let mut entries: Vec<(InitiativeEntry, u32)> = Vec::new();
        for unit in units.iter() {
            let turns = unit.template.turns_per_round.max(1);
            for turn_index in 0..turns {
                entries.push((
                    InitiativeEntry {
                        unit: unit.id,
                        turn_index,
                    },
                    unit.speed(),
                ));
            }
        }
        // Stable sort: spawn-order enumeration survives as the final
        // tie-break past turn index and speed.
        entries.sort_by(|(a, speed_a), (b, speed_b)| {
            a.turn_index
                .cmp(&b.turn_index)
                .then(speed_b.cmp(speed_a))
        });
        self.queue = entries.into_iter().map(|(entry, _)| entry).collect();
    }
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GridPosition;
    use crate::data::UnitTemplate;

    fn unit_with_speed(speed: u32) -> UnitTemplate {
        UnitTemplate::new("fighter").with_stats(10, 5, speed)
    }

    #[test]
    fn one_round_visits_each_unit_once_in_speed_order() {
        let mut units = Units::default();
        let slow = units.spawn(Team::Player, GridPosition::new(0, 0), unit_with_speed(3));
        let fast = units.spawn(Team::Enemy, GridPosition::new(1, 0), unit_with_speed(12));
        let mid = units.spawn(Team::Player, GridPosition::new(2, 0), unit_with_speed(7));

        let mut scheduler = TurnScheduler::new();
        let mut events = EventQueue::default();
        scheduler.start_first_round(&mut units, &mut events);

        let mut visited = vec![scheduler.active_unit().unwrap()];
        for _ in 0..2 {
            scheduler.request_end_turn(&mut units, &mut events);
            visited.push(scheduler.active_unit().unwrap());
        }
        assert_eq!(visited, vec![fast, mid, slow]);

        // The next advance rolls into round two.
        scheduler.request_end_turn(&mut units, &mut events);
        assert_eq!(scheduler.round(), 2);
        assert_eq!(scheduler.active_unit(), Some(fast));
    }

    #[test]
    fn equal_speed_ties_keep_spawn_order() {
        let mut units = Units::default();
        let first = units.spawn(Team::Player, GridPosition::new(0, 0), unit_with_speed(5));
        let second = units.spawn(Team::Enemy, GridPosition::new(1, 0), unit_with_speed(5));

        let mut scheduler = TurnScheduler::new();
        let mut events = EventQueue::default();
        scheduler.start_first_round(&mut units, &mut events);
        assert_eq!(scheduler.active_unit(), Some(first));
        scheduler.request_end_turn(&mut units, &mut events);
        assert_eq!(scheduler.active_unit(), Some(second));
    }

    #[test]
    fn extra_turns_sort_by_turn_index_first() {
        let mut units = Units::default();
        let double = units.spawn(
            Team::Player,
            GridPosition::new(0, 0),
            unit_with_speed(4).with_turns(2, 1, 1),
        );
        let single = units.spawn(Team::Enemy, GridPosition::new(1, 0), unit_with_speed(9));

        let mut scheduler = TurnScheduler::new();
        let mut events = EventQueue::default();
        scheduler.start_first_round(&mut units, &mut events);

        let order: Vec<UnitId> = scheduler
            .initiative_order()
            .iter()
            .map(|entry| entry.unit)
            .collect();
        // First everyone's turn zero (speed order), then the second turn.
        assert_eq!(order, vec![single, double, double]);
    }

    #[test]
    fn dead_units_are_skipped_not_reordered() {
        let mut units = Units::default();
        let a = units.spawn(Team::Player, GridPosition::new(0, 0), unit_with_speed(9));
        let b = units.spawn(Team::Enemy, GridPosition::new(1, 0), unit_with_speed(6));
        let c = units.spawn(Team::Enemy, GridPosition::new(2, 0), unit_with_speed(3));

        let mut scheduler = TurnScheduler::new();
        let mut events = EventQueue::default();
        scheduler.start_first_round(&mut units, &mut events);
        assert_eq!(scheduler.active_unit(), Some(a));

        units.remove(b);
        scheduler.request_end_turn(&mut units, &mut events);
        assert_eq!(scheduler.active_unit(), Some(c));
    }

    #[test]
    fn combat_ends_when_a_team_is_wiped() {
        let mut units = Units::default();
        units.spawn(Team::Player, GridPosition::new(0, 0), unit_with_speed(5));
        let enemy = units.spawn(Team::Enemy, GridPosition::new(1, 0), unit_with_speed(4));

        let mut scheduler = TurnScheduler::new();
        let mut events = EventQueue::default();
        scheduler.start_first_round(&mut units, &mut events);
        events.drain();

        units.remove(enemy);
        scheduler.request_end_turn(&mut units, &mut events);
        assert_eq!(
            scheduler.phase(),
            SchedulerPhase::Ended { player_won: true }
        );
        assert!(
            events
                .pending()
                .contains(&SimEvent::CombatEnded { player_won: true })
        );

        // Terminal: further advances change nothing.
        scheduler.request_end_turn(&mut units, &mut events);
        assert!(scheduler.is_ended());
    }

    #[test]
    fn start_turn_resets_pools_on_activation() {
        let mut units = Units::default();
        let id = units.spawn(Team::Player, GridPosition::new(0, 0), unit_with_speed(5));
        units.spawn(Team::Enemy, GridPosition::new(1, 0), unit_with_speed(1));
        units.get_mut(id).unwrap().moves_remaining = 0;

        let mut scheduler = TurnScheduler::new();
        let mut events = EventQueue::default();
        scheduler.start_first_round(&mut units, &mut events);
        assert_eq!(scheduler.active_unit(), Some(id));
        assert!(units.get(id).unwrap().can_move());
    }
}
