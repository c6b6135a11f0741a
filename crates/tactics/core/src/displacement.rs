//! Push and throw resolution along a grid vector.
//!
//! Resolution is pure: these functions walk the grid and report where the
//! displaced body ends up and what stopped it. The simulation applies the
//! result (relocation, collision damage, tile enter effects) through its
//! own mutation path so the occupancy invariant stays in one place.

use crate::common::{GridPosition, UnitId};
use crate::grid::GridIndex;

/// Outcome of resolving a push.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PushResult {
    /// Where the pushed body comes to rest (its own cell if it never moved).
    pub final_position: GridPosition,
    /// Stopped one cell short of terrain or the map edge.
    pub stopped_by_wall: bool,
    /// Stopped one cell short of another unit.
    pub stopped_by_unit: bool,
    /// The unit collided with, when `stopped_by_unit`.
    pub collision_target: Option<UnitId>,
}

impl PushResult {
    fn rest(position: GridPosition) -> Self {
        Self {
            final_position: position,
            stopped_by_wall: false,
            stopped_by_unit: false,
            collision_target: None,
        }
    }
}

/// Resolves a push from `source` in the direction of `toward`, up to
/// `cells` steps.
///
/// The direction is the per-axis clamped unit vector, so pushes can travel
/// diagonally like targeting rays. A zero vector or zero distance is a
/// no-op resolving to the source cell.
pub fn resolve_push(
    grid: &GridIndex,
    source: GridPosition,
    toward: GridPosition,
    cells: u32,
) -> PushResult {
    let mut result = PushResult::rest(source);
    if cells == 0 || !grid.is_valid(source) || !grid.is_valid(toward) {
        return result;
    }

    let dx = (toward.x - source.x).clamp(-1, 1);
    let dz = (toward.z - source.z).clamp(-1, 1);
    if dx == 0 && dz == 0 {
        return result;
    }

    let mut current = source;
    for _ in 0..cells {
        let next = GridPosition::new(current.x + dx, current.z + dz);

        if !grid.is_valid(next) || (!grid.is_walkable(next) && grid.occupant(next).is_none()) {
            result.final_position = current;
            result.stopped_by_wall = true;
            return result;
        }

        if let Some(unit) = grid.occupant(next) {
            result.final_position = current;
            result.stopped_by_unit = true;
            result.collision_target = Some(unit);
            return result;
        }

        current = next;
    }

    result.final_position = current;
    result
}

/// Whether a unit may be thrown to `destination`: in bounds, walkable, and
/// free of units.
pub fn can_throw_unit(grid: &GridIndex, destination: GridPosition) -> bool {
    grid.is_valid(destination)
        && grid.is_walkable(destination)
        && grid.occupant(destination).is_none()
}

/// Whether a static object may be thrown to `destination`: as for units,
/// plus the cell must not already hold another object.
pub fn can_throw_object(grid: &GridIndex, destination: GridPosition) -> bool {
    can_throw_unit(grid, destination) && grid.static_object(destination).is_none()
}
