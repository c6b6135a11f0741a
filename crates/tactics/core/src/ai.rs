//! Heuristic decision layer for AI-controlled units.
//!
//! Target selection scores every hostile unit under the acting unit's
//! profile priority and keeps the first-encountered maximum. Action
//! selection tries, in order: an affordable attack that already reaches the
//! target, the reachable move that closes the most distance, then an
//! affordable ability that reaches the target. Scores are reported so a
//! driver could compare choices across units, but within one unit the
//! first qualifying rule wins outright.

use crate::action::{ActionKind, TurnDisposition};
use crate::common::{GridPosition, UnitId};
use crate::data::TargetPriority;
use crate::rng::{PcgRng, compute_seed};
use crate::sim::Simulation;

/// An action the AI wants to take, with the cell to aim it at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionChoice {
    pub action: ActionKind,
    pub target: GridPosition,
    pub score: i32,
}

/// Picks the best hostile target for `unit_id` under its profile priority,
/// or `None` when the unit has no AI profile or no enemies remain.
pub fn select_target(sim: &Simulation, unit_id: UnitId) -> Option<UnitId> {
    let unit = sim.unit(unit_id)?;
    let profile = unit.template.ai?;
    let my_pos = unit.position;
    let my_team = unit.team;

    let mut best: Option<(UnitId, f32)> = None;
    for candidate in sim.units().iter() {
        if !candidate.team.opposes(my_team) {
            continue;
        }
        let distance = my_pos.manhattan_distance(candidate.position);
        let score = match profile.priority {
            TargetPriority::Closest => {
                if distance == 0 {
                    f32::MAX
                } else {
                    1000.0 / (distance + 1) as f32
                }
            }
            TargetPriority::HighestDamage => candidate.attack_damage() as f32,
            TargetPriority::LowestHp => {
                if candidate.hp.current == 0 {
                    f32::MIN
                } else {
                    1000.0 / (candidate.hp.current + 1) as f32
                }
            }
            TargetPriority::StatusCondition => 1.0,
            TargetPriority::Random => {
                let seed = compute_seed(
                    sim.config().game_seed ^ sim.action_nonce(),
                    candidate.id.0 as u64,
                );
                PcgRng::next_u32(seed) as f32 / u32::MAX as f32
            }
        };
        // Strictly greater: ties keep the first-encountered candidate.
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate.id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Picks what `unit_id` should do about `target_id` right now.
pub fn select_action(
    sim: &mut Simulation,
    unit_id: UnitId,
    target_id: UnitId,
) -> Option<ActionChoice> {
    let unit = sim.unit(unit_id)?;
    let target = sim.unit(target_id)?;
    let my_pos = unit.position;
    let attack_range = unit.attack_range();
    let attack_count = unit.template.attacks.len();
    let ability_count = unit.template.abilities.len();
    let target_pos = target.position;
    let target_hp = target.hp.current;
    let distance = my_pos.manhattan_distance(target_pos);

    // First affordable attack that already reaches the target wins; no
    // comparison across attacks.
    for index in 0..attack_count {
        let action = ActionKind::Attack(index);
        let charges = sim
            .unit(unit_id)
            .is_some_and(|unit| action.is_attack_kind(unit));
        if !charges || !sim.can_afford(unit_id, action) {
            continue;
        }
        if sim.legal_targets(unit_id, action).contains(&target_pos) {
            return Some(ActionChoice {
                action,
                target: target_pos,
                score: 100 + target_hp as i32,
            });
        }
    }

    // Otherwise close the distance: the reachable cell strictly nearer to
    // the target, first-encountered on ties.
    if sim.unit(unit_id).is_some_and(|unit| unit.can_move()) {
        let reachable = sim.legal_targets(unit_id, ActionKind::Move);
        let mut best_move = my_pos;
        let mut best_distance = distance;
        for cell in reachable {
            let d = cell.manhattan_distance(target_pos);
            if d < best_distance {
                best_distance = d;
                best_move = cell;
            }
        }
        if best_move != my_pos {
            let score = if best_distance <= attack_range {
                70 - best_distance as i32
            } else {
                40 - best_distance as i32
            };
            return Some(ActionChoice {
                action: ActionKind::Move,
                target: best_move,
                score,
            });
        }
    }

    for index in 0..ability_count {
        let action = ActionKind::Ability(index);
        if !sim.can_afford(unit_id, action) {
            continue;
        }
        if sim.legal_targets(unit_id, action).contains(&target_pos) {
            return Some(ActionChoice {
                action,
                target: target_pos,
                score: 80,
            });
        }
    }

    None
}

/// Drives the active unit's whole turn: pick target, pick action, execute,
/// repeat until nothing qualifies, nothing is affordable, or the safety cap
/// trips. Ends the turn unless an action already ended it.
///
/// Returns the number of actions taken.
pub fn run_turn(sim: &mut Simulation) -> u32 {
    let Some(unit_id) = sim.active_unit() else {
        return 0;
    };
    let cap = sim.config().max_ai_actions_per_turn;
    let mut actions_taken = 0;

    while actions_taken < cap {
        let Some(unit) = sim.unit(unit_id) else {
            break;
        };
        if unit.template.ai.is_none() {
            break;
        }
        if !unit.can_move() && !unit.can_attack() && unit.mana.is_empty() {
            break;
        }

        let Some(target) = select_target(sim, unit_id) else {
            break;
        };
        let Some(choice) = select_action(sim, unit_id, target) else {
            break;
        };
        if !sim.can_afford(unit_id, choice.action) {
            break;
        }

        tracing::debug!(
            unit = %unit_id,
            action = ?choice.action,
            target = %choice.target,
            score = choice.score,
            "ai action"
        );
        match sim.perform_action(unit_id, choice.action, choice.target) {
            Ok((_, TurnDisposition::TurnContinues)) => actions_taken += 1,
            Ok(_) => return actions_taken + 1,
            Err(error) => {
                tracing::debug!(unit = %unit_id, %error, "ai action rejected");
                break;
            }
        }
    }

    if sim.active_unit() == Some(unit_id) {
        sim.request_end_turn();
    }
    actions_taken
}
