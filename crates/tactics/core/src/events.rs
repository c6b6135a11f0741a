//! Notifications the core emits for collaborators (UI, AI hookup, logging).
//!
//! Events accumulate in order on a queue owned by the simulation; the
//! presentation layer drains them after each call. The core never waits on
//! a consumer.

use crate::action::ActionKind;
use crate::common::{GridPosition, ObjectId, UnitId};
use crate::unit::ResourceKind;

/// Everything observable that happens inside the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimEvent {
    /// A new round began and the initiative queue was rebuilt.
    RoundStarted { round: u32 },

    /// Turn bookkeeping changed (queue index, skips); cheap UI refresh hook.
    TurnChanged,

    /// A different unit became the active one.
    ActiveUnitChanged { unit: UnitId },

    /// Combat reached a terminal state.
    CombatEnded { player_won: bool },

    /// A resource pool changed on a unit.
    ResourceChanged { unit: UnitId, kind: ResourceKind },

    ActionStarted { unit: UnitId, action: ActionKind },
    ActionCompleted { unit: UnitId, action: ActionKind },

    UnitMoved {
        unit: UnitId,
        from: GridPosition,
        to: GridPosition,
    },

    UnitDamaged {
        unit: UnitId,
        amount: u32,
        remaining_hp: u32,
    },

    UnitDied { unit: UnitId },

    ObjectDamaged { object: ObjectId, amount: u32 },

    ObjectDestroyed { object: ObjectId },

    /// A ghost took over an enemy body; the ghost entity is gone.
    UnitPossessed { ghost: UnitId, body: UnitId },
}

/// Ordered queue of pending notifications.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    pending: Vec<SimEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: SimEvent) {
        self.pending.push(event);
    }

    /// Removes and returns all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Read-only view for tests and diagnostics.
    pub fn pending(&self) -> &[SimEvent] {
        &self.pending
    }
}
