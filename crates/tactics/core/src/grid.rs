//! Spatial grid index: cells, occupancy, walkability, movement cost.
//!
//! The grid is the single source of truth for "what stands where". All
//! occupancy mutation goes through the narrow setter API here so the
//! occupancy invariant (at most one unit per cell) can be enforced in one
//! place. Queries against out-of-range positions return absent results
//! rather than failing.

use crate::common::{GridPosition, ObjectId, UnitId};
use crate::data::{BlockMask, TileCombatModifiers, TileType, TileTypeId};
use crate::error::{ErrorSeverity, SimError};

/// Errors surfaced by grid mutation. Queries never error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {position} is outside the grid")]
    OutOfBounds { position: GridPosition },

    #[error("cell {position} already holds a unit")]
    UnitOccupied { position: GridPosition },

    #[error("cell {position} already holds a static object")]
    ObjectOccupied { position: GridPosition },

    #[error("tile type {tile:?} is not in the tile set")]
    UnknownTileType { tile: TileTypeId },
}

impl SimError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GridError::OutOfBounds { .. } => ErrorSeverity::Validation,
            GridError::UnitOccupied { .. } | GridError::ObjectOccupied { .. } => {
                ErrorSeverity::Recoverable
            }
            GridError::UnknownTileType { .. } => ErrorSeverity::Validation,
        }
    }
}

/// A static object's presence on a cell, with the blocking flags cached so
/// walkability queries do not need the object arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticSlot {
    pub id: ObjectId,
    pub blocks: BlockMask,
}

/// One addressable grid square and its occupancy/terrain state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    occupant: Option<UnitId>,
    static_object: Option<StaticSlot>,
    tile: TileTypeId,
    base_walkable: bool,
}

impl Cell {
    fn new() -> Self {
        Self {
            occupant: None,
            static_object: None,
            tile: TileTypeId::DEFAULT,
            base_walkable: true,
        }
    }

    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    pub fn static_object(&self) -> Option<StaticSlot> {
        self.static_object
    }

    pub fn tile(&self) -> TileTypeId {
        self.tile
    }

    pub fn base_walkable(&self) -> bool {
        self.base_walkable
    }
}

/// Owner of the cell matrix; answers occupancy, walkability, and cost
/// queries for every other subsystem.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridIndex {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    tile_set: Vec<TileType>,
}

impl GridIndex {
    /// Creates a `width x height` grid where every cell carries the tile
    /// set's default tile (index 0).
    ///
    /// The tile set must be non-empty; an empty set leaves cells with no
    /// terrain definition, which the builder treats as an unknown tile.
    pub fn new(width: u32, height: u32, tile_set: Vec<TileType>) -> Result<Self, GridError> {
        if tile_set.is_empty() {
            return Err(GridError::UnknownTileType {
                tile: TileTypeId::DEFAULT,
            });
        }
        let cells = vec![Cell::new(); (width * height) as usize];
        Ok(Self {
            width,
            height,
            cells,
            tile_set,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_valid(&self, position: GridPosition) -> bool {
        position.x >= 0
            && position.z >= 0
            && position.x < self.width as i32
            && position.z < self.height as i32
    }

    fn index(&self, position: GridPosition) -> Option<usize> {
        self.is_valid(position)
            .then(|| (position.z as usize) * self.width as usize + position.x as usize)
    }

    /// Returns the cell at `position`, or `None` when out of bounds.
    pub fn cell(&self, position: GridPosition) -> Option<&Cell> {
        self.index(position).map(|i| &self.cells[i])
    }

    pub fn occupant(&self, position: GridPosition) -> Option<UnitId> {
        self.cell(position).and_then(Cell::occupant)
    }

    pub fn static_object(&self, position: GridPosition) -> Option<StaticSlot> {
        self.cell(position).and_then(Cell::static_object)
    }

    /// Places or clears a unit on a cell.
    ///
    /// # Errors
    ///
    /// `UnitOccupied` when placing a unit on a cell that already hosts a
    /// different one: the occupancy invariant admits at most one unit per
    /// cell, and silently replacing an occupant would desync that unit's
    /// position.
    pub fn set_occupant(
        &mut self,
        position: GridPosition,
        occupant: Option<UnitId>,
    ) -> Result<(), GridError> {
        let index = self
            .index(position)
            .ok_or(GridError::OutOfBounds { position })?;
        let cell = &mut self.cells[index];
        if let (Some(unit), Some(existing)) = (occupant, cell.occupant) {
            if unit != existing {
                return Err(GridError::UnitOccupied { position });
            }
        }
        cell.occupant = occupant;
        Ok(())
    }

    /// Places or clears a static object on a cell.
    pub fn set_static_object(
        &mut self,
        position: GridPosition,
        slot: Option<StaticSlot>,
    ) -> Result<(), GridError> {
        let index = self
            .index(position)
            .ok_or(GridError::OutOfBounds { position })?;
        let cell = &mut self.cells[index];
        if let (Some(new), Some(existing)) = (slot, cell.static_object) {
            if new.id != existing.id {
                return Err(GridError::ObjectOccupied { position });
            }
        }
        cell.static_object = slot;
        Ok(())
    }

    /// Repaints the tile of a cell (level authoring and hazards).
    pub fn set_tile(&mut self, position: GridPosition, tile: TileTypeId) -> Result<(), GridError> {
        if tile.0 as usize >= self.tile_set.len() {
            return Err(GridError::UnknownTileType { tile });
        }
        let index = self
            .index(position)
            .ok_or(GridError::OutOfBounds { position })?;
        self.cells[index].tile = tile;
        Ok(())
    }

    /// Overrides the cell-level walkable flag (walls painted at load time).
    pub fn set_base_walkable(
        &mut self,
        position: GridPosition,
        walkable: bool,
    ) -> Result<(), GridError> {
        let index = self
            .index(position)
            .ok_or(GridError::OutOfBounds { position })?;
        self.cells[index].base_walkable = walkable;
        Ok(())
    }

    /// Tile definition under `position`, or `None` when out of bounds.
    pub fn tile(&self, position: GridPosition) -> Option<&TileType> {
        self.cell(position)
            .map(|cell| &self.tile_set[cell.tile.0 as usize])
    }

    /// Effective walkability: the cell flag, the tile, and any blocking
    /// static object must all permit movement. Out of bounds is never
    /// walkable.
    pub fn is_walkable(&self, position: GridPosition) -> bool {
        let Some(cell) = self.cell(position) else {
            return false;
        };
        if !cell.base_walkable {
            return false;
        }
        if self.tile_set[cell.tile.0 as usize].blocks_movement {
            return false;
        }
        match cell.static_object {
            Some(slot) => !slot.blocks.contains(BlockMask::MOVEMENT),
            None => true,
        }
    }

    /// Movement cost multiplier of the tile at `position` (1.0 default and
    /// for out-of-bounds positions, which pathfinding rejects earlier).
    pub fn movement_cost(&self, position: GridPosition) -> f32 {
        self.tile(position)
            .map(|tile| tile.movement_cost_multiplier)
            .unwrap_or(1.0)
    }

    /// Combat modifiers granted by the tile at `position`.
    pub fn tile_modifiers(&self, position: GridPosition) -> TileCombatModifiers {
        self.tile(position)
            .map(TileCombatModifiers::from)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticObjectSpec;

    fn test_grid() -> GridIndex {
        GridIndex::new(4, 4, vec![TileType::normal("floor")]).unwrap()
    }

    #[test]
    fn out_of_bounds_queries_return_absent() {
        let grid = test_grid();
        let outside = GridPosition::new(-1, 7);
        assert!(!grid.is_valid(outside));
        assert!(grid.cell(outside).is_none());
        assert!(!grid.is_walkable(outside));
        assert_eq!(grid.movement_cost(outside), 1.0);
    }

    #[test]
    fn occupancy_invariant_rejects_double_placement() {
        let mut grid = test_grid();
        let pos = GridPosition::new(1, 1);
        grid.set_occupant(pos, Some(UnitId(0))).unwrap();
        assert_eq!(
            grid.set_occupant(pos, Some(UnitId(1))),
            Err(GridError::UnitOccupied { position: pos })
        );
        // Re-asserting the same occupant is fine.
        grid.set_occupant(pos, Some(UnitId(0))).unwrap();
        grid.set_occupant(pos, None).unwrap();
        grid.set_occupant(pos, Some(UnitId(1))).unwrap();
    }

    #[test]
    fn walkability_combines_flag_tile_and_object() {
        let mut grid = GridIndex::new(
            4,
            4,
            vec![TileType::normal("floor"), TileType::blocking("wall")],
        )
        .unwrap();
        let pos = GridPosition::new(2, 2);
        assert!(grid.is_walkable(pos));

        grid.set_base_walkable(pos, false).unwrap();
        assert!(!grid.is_walkable(pos));
        grid.set_base_walkable(pos, true).unwrap();

        grid.set_tile(pos, TileTypeId(1)).unwrap();
        assert!(!grid.is_walkable(pos));
        grid.set_tile(pos, TileTypeId(0)).unwrap();

        let spec = StaticObjectSpec::new("crate");
        grid.set_static_object(
            pos,
            Some(StaticSlot {
                id: ObjectId(0),
                blocks: spec.blocks,
            }),
        )
        .unwrap();
        assert!(!grid.is_walkable(pos));

        // A decorative object that blocks nothing leaves the cell walkable.
        grid.set_static_object(pos, None).unwrap();
        grid.set_static_object(
            pos,
            Some(StaticSlot {
                id: ObjectId(0),
                blocks: BlockMask::PROJECTILES,
            }),
        )
        .unwrap();
        assert!(grid.is_walkable(pos));
    }

    #[test]
    fn unknown_tile_rejected() {
        let mut grid = test_grid();
        assert_eq!(
            grid.set_tile(GridPosition::new(0, 0), TileTypeId(9)),
            Err(GridError::UnknownTileType { tile: TileTypeId(9) })
        );
    }
}
