//! A* pathfinding over the grid index.
//!
//! Four-directional search with Manhattan heuristic. Determinism is part of
//! the contract: the open list is scanned linearly and only a strictly
//! lower f-cost replaces the current best, so the first-inserted node wins
//! ties and repeated searches over unchanged state return identical paths.
//! Occupied cells are impassable except as the goal, which lets melee
//! approaches path toward an occupied destination.

use crate::common::GridPosition;
use crate::config::SimConfig;
use crate::grid::GridIndex;

/// Per-search node state, reset at the start of every search.
#[derive(Clone, Copy, Debug)]
struct PathNode {
    g_cost: u32,
    h_cost: u32,
    f_cost: u32,
    came_from: Option<u32>,
    closed: bool,
    in_open: bool,
}

impl PathNode {
    const UNVISITED: Self = Self {
        g_cost: u32::MAX,
        h_cost: 0,
        f_cost: u32::MAX,
        came_from: None,
        closed: false,
        in_open: false,
    };
}

/// Weighted shortest-path search. Owns a node arena sized to the grid so a
/// search allocates nothing beyond the returned path.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    width: u32,
    height: u32,
    nodes: Vec<PathNode>,
    open: Vec<u32>,
}

impl Pathfinder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            nodes: vec![PathNode::UNVISITED; (width * height) as usize],
            open: Vec::new(),
        }
    }

    fn node_index(&self, position: GridPosition) -> u32 {
        position.z as u32 * self.width + position.x as u32
    }

    fn node_position(&self, index: u32) -> GridPosition {
        GridPosition::new((index % self.width) as i32, (index / self.width) as i32)
    }

    fn heuristic(a: GridPosition, b: GridPosition) -> u32 {
        SimConfig::MOVE_STRAIGHT_COST * a.manhattan_distance(b)
    }

    fn edge_cost(grid: &GridIndex, into: GridPosition) -> u32 {
        (SimConfig::MOVE_STRAIGHT_COST as f32 * grid.movement_cost(into)).round() as u32
    }

    fn reset(&mut self, grid: &GridIndex) {
        if self.width != grid.width() || self.height != grid.height() {
            self.width = grid.width();
            self.height = grid.height();
            self.nodes = vec![PathNode::UNVISITED; (self.width * self.height) as usize];
        } else {
            self.nodes.fill(PathNode::UNVISITED);
        }
        self.open.clear();
    }

    /// Finds the cheapest path from `start` to `goal`, inclusive of both.
    ///
    /// Returns `None` when either endpoint is out of bounds or no route
    /// exists. The caller decides what "too long" means; see
    /// [`path_cost_tenths`] for the budget metric.
    pub fn find_path(
        &mut self,
        grid: &GridIndex,
        start: GridPosition,
        goal: GridPosition,
    ) -> Option<Vec<GridPosition>> {
        if !grid.is_valid(start) || !grid.is_valid(goal) {
            return None;
        }

        self.reset(grid);

        let start_index = self.node_index(start);
        let goal_index = self.node_index(goal);

        {
            let node = &mut self.nodes[start_index as usize];
            node.g_cost = 0;
            node.h_cost = Self::heuristic(start, goal);
            node.f_cost = node.h_cost;
            node.in_open = true;
        }
        self.open.push(start_index);

        while !self.open.is_empty() {
            // Linear scan; strict comparison keeps first-inserted on ties.
            let mut best_slot = 0;
            for slot in 1..self.open.len() {
                let candidate = self.nodes[self.open[slot] as usize].f_cost;
                if candidate < self.nodes[self.open[best_slot] as usize].f_cost {
                    best_slot = slot;
                }
            }
            let current = self.open.remove(best_slot);

            if current == goal_index {
                return Some(self.reconstruct(current));
            }

            self.nodes[current as usize].closed = true;
            let current_pos = self.node_position(current);

            const NEIGHBOR_STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
            for (dx, dz) in NEIGHBOR_STEPS {
                let next = GridPosition::new(current_pos.x + dx, current_pos.z + dz);
                if !grid.is_valid(next) {
                    continue;
                }
                let next_index = self.node_index(next);
                if self.nodes[next_index as usize].closed {
                    continue;
                }

                // Impassable terrain blocks outright; an occupied cell only
                // blocks when it is not the requested goal.
                let blocked = !grid.is_walkable(next)
                    || (grid.occupant(next).is_some() && next_index != goal_index);
                if blocked {
                    self.nodes[next_index as usize].closed = true;
                    continue;
                }

                let tentative =
                    self.nodes[current as usize].g_cost + Self::edge_cost(grid, next);
                let node = &mut self.nodes[next_index as usize];
                if tentative < node.g_cost {
                    node.came_from = Some(current);
                    node.g_cost = tentative;
                    node.h_cost = Self::heuristic(next, goal);
                    node.f_cost = node.g_cost + node.h_cost;
                    if !node.in_open {
                        node.in_open = true;
                        self.open.push(next_index);
                    }
                }
            }
        }

        None
    }

    fn reconstruct(&self, end: u32) -> Vec<GridPosition> {
        let mut trail = vec![end];
        let mut current = end;
        while let Some(previous) = self.nodes[current as usize].came_from {
            trail.push(previous);
            current = previous;
        }
        trail.reverse();
        trail
            .into_iter()
            .map(|index| self.node_position(index))
            .collect()
    }

    pub fn has_path(&mut self, grid: &GridIndex, a: GridPosition, b: GridPosition) -> bool {
        self.find_path(grid, a, b).is_some()
    }

    /// All positions reachable from `origin` within a cost-weighted budget,
    /// excluding the origin itself and any occupied cell.
    ///
    /// The search window is the square of radius `2 * budget` around the
    /// origin: cheap terrain (multiplier below 1.0) can stretch a path
    /// beyond its Manhattan distance, but never past twice the budget.
    pub fn reachable_set(
        &mut self,
        grid: &GridIndex,
        origin: GridPosition,
        budget: u32,
    ) -> Vec<GridPosition> {
        let mut reachable = Vec::new();
        if !grid.is_valid(origin) {
            return reachable;
        }

        let radius = (2 * budget) as i32;
        let limit = budget * SimConfig::MOVE_STRAIGHT_COST;
        for x in (origin.x - radius)..=(origin.x + radius) {
            for z in (origin.z - radius)..=(origin.z + radius) {
                let candidate = GridPosition::new(x, z);
                if candidate == origin
                    || !grid.is_valid(candidate)
                    || !grid.is_walkable(candidate)
                    || grid.occupant(candidate).is_some()
                {
                    continue;
                }
                if let Some(path) = self.find_path(grid, origin, candidate) {
                    if path_cost_tenths(grid, &path) <= limit {
                        reachable.push(candidate);
                    }
                }
            }
        }
        reachable
    }
}

/// Cost of a path in tenths of a move point: the sum of rounded
/// `10 x movement_cost` edge weights, the same metric the search minimizes.
pub fn path_cost_tenths(grid: &GridIndex, path: &[GridPosition]) -> u32 {
    path.iter()
        .skip(1)
        .map(|&step| Pathfinder::edge_cost(grid, step))
        .sum()
}
