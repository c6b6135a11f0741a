//! Targeting geometry: which cells a shape can reach and affect.
//!
//! Pure functions over the grid; occupancy and team filtering belong to the
//! caller. Distances are Manhattan, matching the pathfinder's cost model.
//! Line and Cone march with a per-axis clamped unit step, so they can point
//! diagonally even though movement never does; that asymmetry is observed
//! behavior and intentionally kept.

use crate::common::GridPosition;
use crate::grid::GridIndex;

/// The geometric rule determining an action's target and affected cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingShape {
    /// Affects the origin cell only.
    SelfOnly,
    /// One cell within range.
    #[default]
    SingleTarget,
    /// Every cell within `aoe_radius` of the target cell.
    Area,
    /// A ray marched from the origin toward the target.
    Line,
    /// A triangular spread widening with distance along the primary axis.
    Cone,
}

fn unit_step(from: GridPosition, toward: GridPosition) -> (i32, i32) {
    (
        (toward.x - from.x).clamp(-1, 1),
        (toward.z - from.z).clamp(-1, 1),
    )
}

/// Cells affected when an action aimed at `target` resolves.
pub fn affected_cells(
    grid: &GridIndex,
    origin: GridPosition,
    target: GridPosition,
    shape: TargetingShape,
    range: u32,
    aoe_radius: u32,
) -> Vec<GridPosition> {
    let mut cells = Vec::new();
    if !grid.is_valid(origin) {
        return cells;
    }

    match shape {
        TargetingShape::SelfOnly => cells.push(origin),

        TargetingShape::SingleTarget => {
            if grid.is_valid(target) && origin.manhattan_distance(target) <= range {
                cells.push(target);
            }
        }

        TargetingShape::Area => {
            let radius = aoe_radius as i32;
            for x in (target.x - radius)..=(target.x + radius) {
                for z in (target.z - radius)..=(target.z + radius) {
                    let p = GridPosition::new(x, z);
                    if grid.is_valid(p) && target.manhattan_distance(p) <= aoe_radius {
                        cells.push(p);
                    }
                }
            }
        }

        TargetingShape::Line => {
            let (dx, dz) = unit_step(origin, target);
            for i in 0..=range as i32 {
                let p = GridPosition::new(origin.x + dx * i, origin.z + dz * i);
                if !grid.is_valid(p) {
                    break;
                }
                cells.push(p);
            }
        }

        TargetingShape::Cone => {
            let (dx, dz) = unit_step(origin, target);
            for i in 1..=range as i32 {
                for j in -i..=i {
                    let x = origin.x + dx * i + if dz != 0 { j } else { 0 };
                    let z = origin.z + dz * i + if dx != 0 { j } else { 0 };
                    let p = GridPosition::new(x, z);
                    if grid.is_valid(p) {
                        cells.push(p);
                    }
                }
            }
        }
    }

    cells
}

/// Cells a shape may legally be aimed at from `origin`, before occupancy or
/// team filtering. Area shapes may aim `aoe_radius` beyond their range since
/// their blast reaches back inside it.
pub fn valid_target_cells(
    grid: &GridIndex,
    origin: GridPosition,
    shape: TargetingShape,
    range: u32,
    min_range: u32,
    aoe_radius: u32,
) -> Vec<GridPosition> {
    let mut cells = Vec::new();
    if !grid.is_valid(origin) {
        return cells;
    }

    match shape {
        TargetingShape::SelfOnly => cells.push(origin),

        TargetingShape::SingleTarget => {
            scan_ring(grid, origin, range, min_range, range, &mut cells);
        }

        TargetingShape::Area | TargetingShape::Line | TargetingShape::Cone => {
            let reach = range + aoe_radius;
            scan_ring(grid, origin, reach, min_range, reach, &mut cells);
        }
    }

    cells
}

fn scan_ring(
    grid: &GridIndex,
    origin: GridPosition,
    radius: u32,
    min_distance: u32,
    max_distance: u32,
    out: &mut Vec<GridPosition>,
) {
    let radius = radius as i32;
    for x in (origin.x - radius)..=(origin.x + radius) {
        for z in (origin.z - radius)..=(origin.z + radius) {
            let p = GridPosition::new(x, z);
            if !grid.is_valid(p) {
                continue;
            }
            let distance = origin.manhattan_distance(p);
            if distance >= min_distance && distance <= max_distance {
                out.push(p);
            }
        }
    }
}
