//! Actions a unit can take, as tagged variants with a shared surface.
//!
//! An action is identified by its kind plus, for attacks and abilities, an
//! index into the acting unit's template lists. Legality, target sets, and
//! effects are resolved by the simulation (`crate::sim`); this module owns
//! the vocabulary: kinds, costs, errors, and the two-phase effect ticket.

use crate::common::{GridPosition, UnitId};
use crate::error::{ErrorSeverity, SimError};
use crate::grid::GridError;
use crate::unit::{ResourceError, ResourceKind, UnitState};

/// Which action a unit is taking.
///
/// `Attack` and `Ability` carry the index of the spec within the unit
/// template's `attacks`/`abilities` list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Move,
    Attack(usize),
    Ability(usize),
    Possess,
}

impl ActionKind {
    /// Display name, resolved against the acting unit's template.
    pub fn name<'a>(&self, unit: &'a UnitState) -> &'a str {
        match *self {
            ActionKind::Move => "Move",
            ActionKind::Attack(index) => unit
                .template
                .attacks
                .get(index)
                .map(|spec| spec.name.as_str())
                .unwrap_or("Attack"),
            ActionKind::Ability(index) => unit
                .template
                .abilities
                .get(index)
                .map(|spec| spec.name.as_str())
                .unwrap_or("Ability"),
            ActionKind::Possess => "Possess",
        }
    }

    /// The pool and amount this action draws from, or `None` when the index
    /// does not name an entry in the unit's template.
    pub fn resource_cost(&self, unit: &UnitState) -> Option<(ResourceKind, u32)> {
        match *self {
            ActionKind::Move => Some((ResourceKind::Move, 1)),
            ActionKind::Attack(index) => {
                let spec = unit.template.attacks.get(index)?;
                if spec.costs_attack_charge {
                    Some((ResourceKind::Attack, 1))
                } else {
                    Some((ResourceKind::Mana, spec.mana_cost))
                }
            }
            ActionKind::Ability(index) => {
                let spec = unit.template.abilities.get(index)?;
                Some((ResourceKind::Mana, spec.mana_cost))
            }
            ActionKind::Possess => Some((ResourceKind::Attack, 1)),
        }
    }

    /// True for actions that draw from the attack pool; the AI treats these
    /// as its strike options.
    pub fn is_attack_kind(&self, unit: &UnitState) -> bool {
        matches!(
            self.resource_cost(unit),
            Some((ResourceKind::Attack, _))
        )
    }
}

/// Why an action request was rejected. Rejection happens before any state
/// mutation; a failed request leaves the simulation untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("{0} does not exist")]
    UnitNotFound(UnitId),

    #[error("{unit} is not the active unit")]
    NotActiveUnit { unit: UnitId },

    #[error("{unit} already has an action in flight")]
    Busy { unit: UnitId },

    #[error("combat has already ended")]
    CombatEnded,

    #[error("{unit} has no such action")]
    UnknownAction { unit: UnitId },

    #[error("{position} is not a legal target for this action")]
    InvalidTarget { position: GridPosition },

    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Grid mutation failed mid-effect: the occupancy invariant no longer
    /// matches unit state. A bug, not a player-recoverable condition.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl SimError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ActionError::UnitNotFound(_) | ActionError::UnknownAction { .. } => {
                ErrorSeverity::Validation
            }
            ActionError::NotActiveUnit { .. }
            | ActionError::Busy { .. }
            | ActionError::CombatEnded
            | ActionError::InvalidTarget { .. } => ErrorSeverity::Recoverable,
            ActionError::Resource(inner) => inner.severity(),
            ActionError::Grid(_) => ErrorSeverity::Internal,
        }
    }
}

/// What an executed effect did, for logs and presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    /// Cells the effect touched (path end for moves, blast cells for
    /// attacks and abilities).
    pub affected: Vec<GridPosition>,
    pub damage_dealt: u32,
    pub units_killed: u32,
    pub objects_destroyed: u32,
}

/// Token for an effect whose state mutation has been applied but whose
/// turn bookkeeping has not yet run.
///
/// Returned by `Simulation::begin_action`; must be handed back to
/// `Simulation::complete_action` once the presentation layer has finished
/// animating. Deliberately neither `Clone` nor `Copy`: one begin, one
/// complete. While a ticket is outstanding the simulation is busy and
/// rejects further action requests.
#[derive(Debug)]
#[must_use = "pass the ticket back to complete_action to finish the turn step"]
pub struct EffectTicket {
    pub(crate) unit: UnitId,
    pub(crate) action: ActionKind,
    pub(crate) outcome: ActionOutcome,
}

impl EffectTicket {
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn outcome(&self) -> &ActionOutcome {
        &self.outcome
    }
}

/// What the scheduler decided after an action completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDisposition {
    /// The unit still has affordable pools; its turn continues.
    TurnContinues,
    /// The unit is exhausted or gone; the scheduler advanced.
    TurnEnded,
    /// Combat reached a terminal state during the action.
    CombatOver,
}
