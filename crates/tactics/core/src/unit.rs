//! Unit and static-object state, plus the per-unit action resource model.
//!
//! Units live in an arena with stable, spawn-ordered iteration; the order is
//! observable (initiative tie-breaking, AI candidate scans) and must not
//! change when units die. Resource pools gate which actions are affordable:
//! move and attack charges reset at the start of every turn, mana persists
//! across turns and is only ever consumed.

use crate::common::{GridPosition, ObjectId, ResourceMeter, Team, UnitId};
use crate::data::{BlockMask, StaticObjectSpec, UnitTemplate};
use crate::error::{ErrorSeverity, SimError};

/// The pool an action draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Move,
    Attack,
    Mana,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceError {
    #[error("insufficient {kind}: need {required}, have {available}")]
    Insufficient {
        kind: ResourceKind,
        required: u32,
        available: u32,
    },
}

impl SimError for ResourceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// A unit participating in combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub team: Team,
    pub position: GridPosition,
    pub hp: ResourceMeter,
    pub mana: ResourceMeter,
    pub moves_remaining: u32,
    pub attacks_remaining: u32,
    /// Designer stat caps and action lists, cloned at spawn, never mutated.
    pub template: UnitTemplate,
}

impl UnitState {
    pub fn new(id: UnitId, team: Team, position: GridPosition, template: UnitTemplate) -> Self {
        Self {
            id,
            team,
            position,
            hp: ResourceMeter::full(template.max_hp),
            mana: ResourceMeter::full(template.max_mana),
            moves_remaining: template.moves_per_turn,
            attacks_remaining: template.attacks_per_turn,
            template,
        }
    }

    /// Resets the per-turn pools. Mana is deliberately untouched: it carries
    /// over between turns and only spending reduces it.
    pub fn start_turn(&mut self) {
        self.moves_remaining = self.template.moves_per_turn;
        self.attacks_remaining = self.template.attacks_per_turn;
    }

    pub fn can_move(&self) -> bool {
        self.moves_remaining > 0
    }

    pub fn can_attack(&self) -> bool {
        self.attacks_remaining > 0
    }

    pub fn can_spend(&self, kind: ResourceKind, amount: u32) -> bool {
        self.available(kind) >= amount
    }

    /// Current balance of the given pool.
    pub fn available(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Move => self.moves_remaining,
            ResourceKind::Attack => self.attacks_remaining,
            ResourceKind::Mana => self.mana.current,
        }
    }

    /// Decrements the matching pool, leaving the others untouched.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) -> Result<(), ResourceError> {
        let available = self.available(kind);
        if available < amount {
            return Err(ResourceError::Insufficient {
                kind,
                required: amount,
                available,
            });
        }
        match kind {
            ResourceKind::Move => self.moves_remaining -= amount,
            ResourceKind::Attack => self.attacks_remaining -= amount,
            ResourceKind::Mana => {
                self.mana.deplete(amount);
            }
        }
        Ok(())
    }

    /// True when no pool can fund any further action this turn.
    pub fn is_exhausted(&self) -> bool {
        self.moves_remaining == 0 && self.attacks_remaining == 0 && self.mana.is_empty()
    }

    /// Applies raw damage, returning the amount actually removed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.hp.deplete(amount)
    }

    pub fn is_dead(&self) -> bool {
        self.hp.is_empty()
    }

    pub fn attack_damage(&self) -> u32 {
        self.template.attack_damage
    }

    pub fn attack_range(&self) -> u32 {
        self.template.attack_range
    }

    pub fn speed(&self) -> u32 {
        self.template.speed
    }

    pub fn is_ghost(&self) -> bool {
        self.template.is_ghost
    }
}

/// Arena of all units, indexed by [`UnitId`]. Slots are tombstoned on death
/// so iteration order stays the spawn order for the life of the session.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Units {
    slots: Vec<Option<UnitState>>,
}

impl Units {
    pub fn spawn(&mut self, team: Team, position: GridPosition, template: UnitTemplate) -> UnitId {
        let id = UnitId(self.slots.len() as u32);
        self.slots
            .push(Some(UnitState::new(id, team, position, template)));
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitState> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn remove(&mut self, id: UnitId) -> Option<UnitState> {
        self.slots.get_mut(id.0 as usize)?.take()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    /// Live units in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitState> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn count_team(&self, team: Team) -> usize {
        self.iter().filter(|unit| unit.team == team).count()
    }
}

/// A static object currently on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticObjectState {
    pub id: ObjectId,
    pub name: String,
    pub position: GridPosition,
    /// `None` means indestructible.
    pub hp: Option<ResourceMeter>,
    pub pushable: bool,
    pub blocks: BlockMask,
}

impl StaticObjectState {
    pub fn new(id: ObjectId, position: GridPosition, spec: &StaticObjectSpec) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            position,
            hp: spec.max_hp.map(ResourceMeter::full),
            pushable: spec.pushable,
            blocks: spec.blocks,
        }
    }

    /// Applies damage; returns true when the object is destroyed.
    /// Indestructible objects shrug everything off.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        match self.hp.as_mut() {
            Some(meter) => {
                meter.deplete(amount);
                meter.is_empty()
            }
            None => false,
        }
    }
}

/// Arena of static objects, same tombstone scheme as [`Units`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticObjects {
    slots: Vec<Option<StaticObjectState>>,
}

impl StaticObjects {
    pub fn place(&mut self, position: GridPosition, spec: &StaticObjectSpec) -> ObjectId {
        let id = ObjectId(self.slots.len() as u32);
        self.slots
            .push(Some(StaticObjectState::new(id, position, spec)));
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&StaticObjectState> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut StaticObjectState> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<StaticObjectState> {
        self.slots.get_mut(id.0 as usize)?.take()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaticObjectState> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grunt() -> UnitTemplate {
        UnitTemplate::new("grunt").with_stats(10, 5, 10)
    }

    #[test]
    fn start_turn_resets_charges_but_not_mana() {
        let mut unit = UnitState::new(UnitId(0), Team::Player, GridPosition::ORIGIN, grunt());
        unit.spend(ResourceKind::Move, 1).unwrap();
        unit.spend(ResourceKind::Attack, 1).unwrap();
        unit.spend(ResourceKind::Mana, 3).unwrap();
        assert!(!unit.can_move());
        assert!(!unit.can_attack());

        unit.start_turn();
        assert!(unit.can_move());
        assert!(unit.can_attack());
        assert_eq!(unit.mana.current, 2);
    }

    #[test]
    fn pools_are_independent() {
        let mut unit = UnitState::new(UnitId(0), Team::Player, GridPosition::ORIGIN, grunt());
        unit.spend(ResourceKind::Move, 1).unwrap();
        assert_eq!(unit.attacks_remaining, 1);
        assert_eq!(unit.mana.current, 5);

        assert_eq!(
            unit.spend(ResourceKind::Move, 1),
            Err(ResourceError::Insufficient {
                kind: ResourceKind::Move,
                required: 1,
                available: 0,
            })
        );
        // The failed spend must not have touched anything.
        assert_eq!(unit.attacks_remaining, 1);
        assert_eq!(unit.mana.current, 5);
    }

    #[test]
    fn removal_keeps_iteration_order_stable() {
        let mut units = Units::default();
        let a = units.spawn(Team::Player, GridPosition::new(0, 0), grunt());
        let b = units.spawn(Team::Enemy, GridPosition::new(1, 0), grunt());
        let c = units.spawn(Team::Player, GridPosition::new(2, 0), grunt());

        units.remove(b);
        let order: Vec<UnitId> = units.iter().map(|u| u.id).collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(units.count_team(Team::Enemy), 0);
    }

    #[test]
    fn indestructible_object_survives_damage() {
        let spec = StaticObjectSpec::new("pillar");
        let mut obj = StaticObjectState::new(ObjectId(0), GridPosition::ORIGIN, &spec);
        assert!(!obj.apply_damage(100));

        let spec = StaticObjectSpec::new("crate").with_hp(2);
        let mut obj = StaticObjectState::new(ObjectId(1), GridPosition::ORIGIN, &spec);
        assert!(!obj.apply_damage(1));
        assert!(obj.apply_damage(1));
    }
}
