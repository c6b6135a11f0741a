//! Deterministic tactical-combat simulation core.
//!
//! `tactics-core` decides what can happen on the board, when, and with what
//! effect: the spatial grid and its occupancy invariants, A* pathfinding,
//! targeting geometry, the initiative scheduler, per-unit action resources,
//! displacement, and the AI decision layer. Rendering, input, and asset
//! concerns live in collaborating crates; they drive the core through
//! [`sim::Simulation`] and observe it through drained [`events::SimEvent`]s.
pub mod action;
pub mod ai;
pub mod common;
pub mod config;
pub mod data;
pub mod displacement;
pub mod error;
pub mod events;
pub mod grid;
pub mod path;
pub mod rng;
pub mod sim;
pub mod targeting;
pub mod turn;
pub mod unit;

pub use action::{ActionError, ActionKind, ActionOutcome, EffectTicket, TurnDisposition};
pub use common::{GridPosition, ObjectId, ResourceMeter, Team, UnitId};
pub use config::SimConfig;
pub use data::{
    AbilitySpec, AiProfile, AttackSpec, BlockMask, StaticObjectSpec, TargetPriority,
    TileCombatModifiers, TileType, TileTypeId, UnitTemplate,
};
pub use displacement::PushResult;
pub use error::{ErrorSeverity, SimError};
pub use events::{EventQueue, SimEvent};
pub use grid::{Cell, GridError, GridIndex, StaticSlot};
pub use path::{Pathfinder, path_cost_tenths};
pub use sim::{Simulation, SpawnError};
pub use targeting::{TargetingShape, affected_cells, valid_target_cells};
pub use turn::{InitiativeEntry, SchedulerPhase, TurnScheduler};
pub use unit::{ResourceError, ResourceKind, StaticObjectState, UnitState};
