//! The simulation context: one owned aggregate for a combat session.
//!
//! [`Simulation`] replaces the scattered process-wide managers a scene-based
//! engine would use. It owns the grid, the unit and object arenas, the
//! pathfinder scratch, the scheduler, and the event queue, and every
//! mutation funnels through its narrow APIs. Occupant changes update the
//! cell and the unit's position in one call, so no query can observe a
//! half-moved unit.
//!
//! Action execution follows a two-phase contract: `begin_action` validates,
//! spends, and applies all state mutation synchronously, returning an
//! [`EffectTicket`]; `complete_action` runs the turn bookkeeping once the
//! presentation layer (if any) has caught up. `perform_action` does both
//! for headless callers.

use crate::action::{ActionError, ActionKind, ActionOutcome, EffectTicket, TurnDisposition};
use crate::common::{GridPosition, ObjectId, Team, UnitId};
use crate::config::SimConfig;
use crate::data::{StaticObjectSpec, TileType, TileTypeId, UnitTemplate};
use crate::displacement::{self, PushResult};
use crate::error::{ErrorSeverity, SimError};
use crate::events::{EventQueue, SimEvent};
use crate::grid::{GridError, GridIndex, StaticSlot};
use crate::path::Pathfinder;
use crate::targeting::{self, TargetingShape};
use crate::turn::{InitiativeEntry, SchedulerPhase, TurnScheduler};
use crate::unit::{ResourceError, StaticObjects, UnitState, Units};

/// Errors raised while populating the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnError {
    #[error("spawn position {position} is outside the grid")]
    OutOfBounds { position: GridPosition },

    #[error("spawn position {position} is not walkable")]
    NotWalkable { position: GridPosition },

    #[error("spawn position {position} is already occupied")]
    Occupied { position: GridPosition },

    #[error(transparent)]
    Grid(GridError),
}

impl SimError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SpawnError::OutOfBounds { .. } => ErrorSeverity::Validation,
            SpawnError::NotWalkable { .. } | SpawnError::Occupied { .. } => {
                ErrorSeverity::Recoverable
            }
            SpawnError::Grid(_) => ErrorSeverity::Internal,
        }
    }
}

/// One combat session's worth of simulation state.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: GridIndex,
    units: Units,
    objects: StaticObjects,
    pathfinder: Pathfinder,
    scheduler: TurnScheduler,
    events: EventQueue,
    /// Unit with an effect ticket outstanding; blocks further actions.
    in_flight: Option<UnitId>,
    /// Monotonic count of begun actions; salts AI random draws.
    action_nonce: u64,
}

impl Simulation {
    pub fn new(
        config: SimConfig,
        width: u32,
        height: u32,
        tile_set: Vec<TileType>,
    ) -> Result<Self, GridError> {
        let grid = GridIndex::new(width, height, tile_set)?;
        let pathfinder = Pathfinder::new(width, height);
        Ok(Self {
            config,
            grid,
            units: Units::default(),
            objects: StaticObjects::default(),
            pathfinder,
            scheduler: TurnScheduler::new(),
            events: EventQueue::default(),
            in_flight: None,
            action_nonce: 0,
        })
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn objects(&self) -> &StaticObjects {
        &self.objects
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(id)
    }

    pub fn round(&self) -> u32 {
        self.scheduler.round()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    pub fn active_unit(&self) -> Option<UnitId> {
        self.scheduler.active_unit()
    }

    pub fn initiative_order(&self) -> &[InitiativeEntry] {
        self.scheduler.initiative_order()
    }

    pub fn is_player_turn(&self) -> bool {
        self.active_team() == Some(Team::Player)
    }

    pub fn is_enemy_turn(&self) -> bool {
        self.active_team() == Some(Team::Enemy)
    }

    fn active_team(&self) -> Option<Team> {
        self.active_unit()
            .and_then(|id| self.units.get(id))
            .map(|unit| unit.team)
    }

    /// True while an effect ticket is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn action_nonce(&self) -> u64 {
        self.action_nonce
    }

    /// Removes and returns all pending notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Pathfinding passthrough for collaborators (range previews, tests).
    pub fn find_path(
        &mut self,
        start: GridPosition,
        goal: GridPosition,
    ) -> Option<Vec<GridPosition>> {
        self.pathfinder.find_path(&self.grid, start, goal)
    }

    // ========================================================================
    // Board setup (scene-loader interface)
    // ========================================================================

    /// Spawns a unit onto a free, walkable cell.
    pub fn spawn_unit(
        &mut self,
        template: &UnitTemplate,
        team: Team,
        position: GridPosition,
    ) -> Result<UnitId, SpawnError> {
        if !self.grid.is_valid(position) {
            return Err(SpawnError::OutOfBounds { position });
        }
        if !self.grid.is_walkable(position) {
            return Err(SpawnError::NotWalkable { position });
        }
        if self.grid.occupant(position).is_some() {
            return Err(SpawnError::Occupied { position });
        }
        let id = self.units.spawn(team, position, template.clone());
        self.grid
            .set_occupant(position, Some(id))
            .map_err(SpawnError::Grid)?;
        tracing::debug!(unit = %id, %position, name = %template.name, "unit spawned");
        Ok(id)
    }

    /// Places a static object; cells hold at most one.
    pub fn place_object(
        &mut self,
        spec: &StaticObjectSpec,
        position: GridPosition,
    ) -> Result<ObjectId, SpawnError> {
        if !self.grid.is_valid(position) {
            return Err(SpawnError::OutOfBounds { position });
        }
        if self.grid.static_object(position).is_some() {
            return Err(SpawnError::Occupied { position });
        }
        let id = self.objects.place(position, spec);
        self.grid
            .set_static_object(
                position,
                Some(StaticSlot {
                    id,
                    blocks: spec.blocks,
                }),
            )
            .map_err(SpawnError::Grid)?;
        Ok(id)
    }

    /// Repaints a cell's tile (level authoring, spreading hazards).
    pub fn set_tile(&mut self, position: GridPosition, tile: TileTypeId) -> Result<(), GridError> {
        self.grid.set_tile(position, tile)
    }

    /// Overrides a cell's walkable flag.
    pub fn set_base_walkable(
        &mut self,
        position: GridPosition,
        walkable: bool,
    ) -> Result<(), GridError> {
        self.grid.set_base_walkable(position, walkable)
    }

    // ========================================================================
    // Turn loop (game-loop interface)
    // ========================================================================

    /// Starts combat once every unit and object is on the board.
    pub fn start_first_round(&mut self) {
        self.scheduler
            .start_first_round(&mut self.units, &mut self.events);
        self.settle_active_unit();
    }

    /// Ends the active unit's turn. Ignored while an effect is in flight or
    /// after combat has ended.
    pub fn request_end_turn(&mut self) {
        if self.is_busy() || self.scheduler.is_ended() {
            return;
        }
        self.advance_turn();
    }

    fn advance_turn(&mut self) {
        self.scheduler.advance(&mut self.units, &mut self.events);
        self.settle_active_unit();
    }

    /// Applies standing tile damage to the freshly activated unit. If the
    /// tile kills it, keeps advancing until a unit survives activation or
    /// combat ends.
    fn settle_active_unit(&mut self) {
        loop {
            let Some(active) = self.scheduler.active_unit() else {
                return;
            };
            let Some(unit) = self.units.get(active) else {
                return;
            };
            let damage = self
                .grid
                .tile(unit.position)
                .map(|tile| tile.damage_per_turn)
                .unwrap_or(0);
            if damage == 0 {
                return;
            }
            self.damage_unit(active, damage);
            if self.units.contains(active) || self.scheduler.is_ended() {
                return;
            }
            self.scheduler.advance(&mut self.units, &mut self.events);
        }
    }

    // ========================================================================
    // Action queries
    // ========================================================================

    /// Whether the unit's pools can fund the action right now. Unknown units
    /// or action indices simply cannot afford anything.
    pub fn can_afford(&self, unit_id: UnitId, action: ActionKind) -> bool {
        let Some(unit) = self.units.get(unit_id) else {
            return false;
        };
        match action.resource_cost(unit) {
            Some((kind, amount)) => unit.can_spend(kind, amount),
            None => false,
        }
    }

    /// All cells the action may legally be aimed at, before affordability.
    ///
    /// Needs `&mut self` because move legality runs the pathfinder.
    pub fn legal_targets(&mut self, unit_id: UnitId, action: ActionKind) -> Vec<GridPosition> {
        let Some(unit) = self.units.get(unit_id) else {
            return Vec::new();
        };
        let origin = unit.position;
        let team = unit.team;

        match action {
            ActionKind::Move => {
                let budget = unit.template.move_range;
                self.pathfinder.reachable_set(&self.grid, origin, budget)
            }

            ActionKind::Attack(index) => {
                let Some(spec) = unit.template.attacks.get(index).cloned() else {
                    return Vec::new();
                };
                if spec.shape == TargetingShape::SelfOnly {
                    return vec![origin];
                }
                let cells = targeting::valid_target_cells(
                    &self.grid,
                    origin,
                    spec.shape,
                    spec.range,
                    spec.min_range,
                    spec.aoe_radius,
                );
                match spec.shape {
                    // Point shapes need a hostile unit on the cell; area
                    // shapes may be aimed at any cell in reach.
                    TargetingShape::SingleTarget | TargetingShape::Line => cells
                        .into_iter()
                        .filter(|&cell| {
                            self.grid
                                .occupant(cell)
                                .and_then(|id| self.units.get(id))
                                .is_some_and(|other| other.team.opposes(team))
                        })
                        .collect(),
                    _ => cells,
                }
            }

            ActionKind::Ability(index) => {
                let Some(spec) = unit.template.abilities.get(index) else {
                    return Vec::new();
                };
                targeting::valid_target_cells(
                    &self.grid,
                    origin,
                    spec.shape,
                    spec.range,
                    0,
                    spec.aoe_radius,
                )
            }

            ActionKind::Possess => {
                if !unit.is_ghost() {
                    return Vec::new();
                }
                let range = unit.template.possess_range;
                targeting::valid_target_cells(
                    &self.grid,
                    origin,
                    TargetingShape::SingleTarget,
                    range,
                    0,
                    0,
                )
                .into_iter()
                .filter(|&cell| {
                    self.grid
                        .occupant(cell)
                        .and_then(|id| self.units.get(id))
                        .is_some_and(|other| other.team.opposes(team))
                })
                .collect()
            }
        }
    }

    pub fn is_legal_target(
        &mut self,
        unit_id: UnitId,
        action: ActionKind,
        target: GridPosition,
    ) -> bool {
        self.legal_targets(unit_id, action).contains(&target)
    }

    // ========================================================================
    // Action execution
    // ========================================================================

    /// Validates and applies an action. Nothing is mutated on error; on
    /// success the returned ticket must be fed to [`Self::complete_action`].
    pub fn begin_action(
        &mut self,
        unit_id: UnitId,
        action: ActionKind,
        target: GridPosition,
    ) -> Result<EffectTicket, ActionError> {
        if self.scheduler.is_ended() {
            return Err(ActionError::CombatEnded);
        }
        if self.is_busy() {
            return Err(ActionError::Busy { unit: unit_id });
        }
        let unit = self
            .units
            .get(unit_id)
            .ok_or(ActionError::UnitNotFound(unit_id))?;
        if self.scheduler.active_unit() != Some(unit_id) {
            return Err(ActionError::NotActiveUnit { unit: unit_id });
        }
        let (kind, amount) = action
            .resource_cost(unit)
            .ok_or(ActionError::UnknownAction { unit: unit_id })?;
        if !unit.can_spend(kind, amount) {
            return Err(ActionError::Resource(ResourceError::Insufficient {
                kind,
                required: amount,
                available: unit.available(kind),
            }));
        }
        if !self.is_legal_target(unit_id, action, target) {
            return Err(ActionError::InvalidTarget { position: target });
        }

        // Point of no return: spend, then apply the effect to completion.
        let unit = self.units.get_mut(unit_id).expect("validated above");
        unit.spend(kind, amount)?;
        self.events.push(SimEvent::ResourceChanged {
            unit: unit_id,
            kind,
        });
        self.events.push(SimEvent::ActionStarted {
            unit: unit_id,
            action,
        });
        tracing::debug!(unit = %unit_id, ?action, %target, "action started");

        let outcome = match action {
            ActionKind::Move => self.apply_move(unit_id, target)?,
            ActionKind::Attack(index) => self.apply_attack(unit_id, index, target)?,
            ActionKind::Ability(index) => self.apply_ability(unit_id, index, target)?,
            ActionKind::Possess => self.apply_possess(unit_id, target)?,
        };

        self.action_nonce += 1;
        self.in_flight = Some(unit_id);
        Ok(EffectTicket {
            unit: unit_id,
            action,
            outcome,
        })
    }

    /// Finishes an action: clears the busy flag and decides whether the
    /// unit's turn continues.
    ///
    /// This simulation uses the resource-pool turn variant: a turn only
    /// ends here when the unit is gone or has nothing left to spend.
    pub fn complete_action(&mut self, ticket: EffectTicket) -> TurnDisposition {
        self.in_flight = None;
        self.events.push(SimEvent::ActionCompleted {
            unit: ticket.unit,
            action: ticket.action,
        });

        if self.scheduler.is_ended() {
            return TurnDisposition::CombatOver;
        }
        let still_here = self
            .units
            .get(ticket.unit)
            .is_some_and(|unit| !unit.is_exhausted());
        if still_here {
            TurnDisposition::TurnContinues
        } else {
            self.advance_turn();
            if self.scheduler.is_ended() {
                TurnDisposition::CombatOver
            } else {
                TurnDisposition::TurnEnded
            }
        }
    }

    /// `begin_action` + `complete_action` for callers with no presentation
    /// delay.
    pub fn perform_action(
        &mut self,
        unit_id: UnitId,
        action: ActionKind,
        target: GridPosition,
    ) -> Result<(ActionOutcome, TurnDisposition), ActionError> {
        let ticket = self.begin_action(unit_id, action, target)?;
        let outcome = ticket.outcome().clone();
        let disposition = self.complete_action(ticket);
        Ok((outcome, disposition))
    }

    // ========================================================================
    // Effects
    // ========================================================================

    fn apply_move(
        &mut self,
        unit_id: UnitId,
        destination: GridPosition,
    ) -> Result<ActionOutcome, ActionError> {
        self.relocate_unit(unit_id, destination)?;
        Ok(ActionOutcome {
            affected: vec![destination],
            ..ActionOutcome::default()
        })
    }

    fn apply_attack(
        &mut self,
        unit_id: UnitId,
        index: usize,
        target: GridPosition,
    ) -> Result<ActionOutcome, ActionError> {
        let unit = self
            .units
            .get(unit_id)
            .ok_or(ActionError::UnitNotFound(unit_id))?;
        let spec = unit
            .template
            .attacks
            .get(index)
            .cloned()
            .ok_or(ActionError::UnknownAction { unit: unit_id })?;
        let damage = if spec.use_unit_attack_damage {
            unit.attack_damage()
        } else {
            spec.base_damage
        };
        let origin = unit.position;
        let affected = targeting::affected_cells(
            &self.grid,
            origin,
            target,
            spec.shape,
            spec.range,
            spec.aoe_radius,
        );
        Ok(self.damage_cells(unit_id, affected, damage))
    }

    fn apply_ability(
        &mut self,
        unit_id: UnitId,
        index: usize,
        target: GridPosition,
    ) -> Result<ActionOutcome, ActionError> {
        let unit = self
            .units
            .get(unit_id)
            .ok_or(ActionError::UnitNotFound(unit_id))?;
        let spec = unit
            .template
            .abilities
            .get(index)
            .cloned()
            .ok_or(ActionError::UnknownAction { unit: unit_id })?;
        let origin = unit.position;
        let affected = targeting::affected_cells(
            &self.grid,
            origin,
            target,
            spec.shape,
            spec.range,
            spec.aoe_radius,
        );
        Ok(self.damage_cells(unit_id, affected, spec.damage))
    }

    /// Shared strike resolution: hostile units and static objects on the
    /// affected cells take the damage.
    fn damage_cells(
        &mut self,
        attacker: UnitId,
        affected: Vec<GridPosition>,
        damage: u32,
    ) -> ActionOutcome {
        let attacker_team = self
            .units
            .get(attacker)
            .map(|unit| unit.team)
            .expect("attacker validated before effects");
        let mut outcome = ActionOutcome {
            affected: affected.clone(),
            ..ActionOutcome::default()
        };

        for cell in affected {
            if let Some(victim) = self.grid.occupant(cell) {
                let hostile = self
                    .units
                    .get(victim)
                    .is_some_and(|unit| unit.team.opposes(attacker_team));
                if hostile {
                    outcome.damage_dealt += damage;
                    if self.damage_unit(victim, damage) {
                        outcome.units_killed += 1;
                    }
                }
            }
            if let Some(slot) = self.grid.static_object(cell) {
                outcome.damage_dealt += damage;
                if self.damage_object(slot.id, damage) {
                    outcome.objects_destroyed += 1;
                }
            }
        }
        outcome
    }

    fn apply_possess(
        &mut self,
        ghost_id: UnitId,
        target: GridPosition,
    ) -> Result<ActionOutcome, ActionError> {
        let body_id = self
            .grid
            .occupant(target)
            .ok_or(ActionError::InvalidTarget { position: target })?;
        let ghost_team = self
            .units
            .get(ghost_id)
            .map(|unit| unit.team)
            .ok_or(ActionError::UnitNotFound(ghost_id))?;

        let body = self
            .units
            .get_mut(body_id)
            .ok_or(ActionError::InvalidTarget { position: target })?;
        body.team = ghost_team;
        self.events.push(SimEvent::UnitPossessed {
            ghost: ghost_id,
            body: body_id,
        });
        tracing::debug!(ghost = %ghost_id, body = %body_id, "possession");

        // The ghost entity is consumed: vacate its cell before removal so
        // the tile never reads as occupied by a dead ghost.
        if let Some(ghost) = self.units.get(ghost_id) {
            let position = ghost.position;
            self.grid
                .set_occupant(position, None)
                .map_err(ActionError::Grid)?;
            self.units.remove(ghost_id);
        }
        self.scheduler
            .check_combat_end(&self.units, &mut self.events);

        Ok(ActionOutcome {
            affected: vec![target],
            ..ActionOutcome::default()
        })
    }

    // ========================================================================
    // Displacement (push / throw surface for effects and abilities)
    // ========================================================================

    /// Pushes a unit directly away from `pusher_position`, up to `cells`
    /// steps, dealing collision damage when it slams into another unit.
    pub fn push_unit(
        &mut self,
        unit_id: UnitId,
        pusher_position: GridPosition,
        cells: u32,
        damage_on_collision: bool,
    ) -> Option<PushResult> {
        let unit = self.units.get(unit_id)?;
        let from = unit.position;
        let toward = GridPosition::new(
            from.x + (from.x - pusher_position.x).clamp(-1, 1),
            from.z + (from.z - pusher_position.z).clamp(-1, 1),
        );
        let result = displacement::resolve_push(&self.grid, from, toward, cells);

        if result.final_position != from {
            // Relocation cannot fail: resolve_push only rests on free cells.
            if self.relocate_unit(unit_id, result.final_position).is_err() {
                return None;
            }
        }
        if damage_on_collision {
            if let Some(victim) = result.collision_target {
                self.damage_unit(victim, self.config.push_collision_damage);
            }
        }
        Some(result)
    }

    /// Pushes a pushable static object away from `pusher_position`.
    pub fn push_object(
        &mut self,
        object_id: ObjectId,
        pusher_position: GridPosition,
        cells: u32,
        damage_on_collision: bool,
    ) -> Option<PushResult> {
        let object = self.objects.get(object_id)?;
        if !object.pushable {
            return None;
        }
        let from = object.position;
        let toward = GridPosition::new(
            from.x + (from.x - pusher_position.x).clamp(-1, 1),
            from.z + (from.z - pusher_position.z).clamp(-1, 1),
        );
        let result = displacement::resolve_push(&self.grid, from, toward, cells);

        if result.final_position != from {
            self.relocate_object(object_id, result.final_position);
        }
        if damage_on_collision {
            if let Some(victim) = result.collision_target {
                self.damage_unit(victim, self.config.push_collision_damage);
            }
        }
        Some(result)
    }

    /// Teleports a unit to `destination` iff the throw rules allow it.
    /// Returns false (and mutates nothing) otherwise.
    pub fn throw_unit(&mut self, unit_id: UnitId, destination: GridPosition) -> bool {
        if !self.units.contains(unit_id) || !displacement::can_throw_unit(&self.grid, destination)
        {
            return false;
        }
        self.relocate_unit(unit_id, destination).is_ok()
    }

    /// Teleports a pushable object to `destination` iff the throw rules
    /// allow it.
    pub fn throw_object(&mut self, object_id: ObjectId, destination: GridPosition) -> bool {
        let Some(object) = self.objects.get(object_id) else {
            return false;
        };
        if !object.pushable || !displacement::can_throw_object(&self.grid, destination) {
            return false;
        }
        self.relocate_object(object_id, destination);
        true
    }

    // ========================================================================
    // State mutation primitives
    // ========================================================================

    /// Moves a unit between cells atomically: destination claimed, origin
    /// vacated, unit position updated, all before returning. Applies the
    /// destination tile's enter damage afterwards.
    fn relocate_unit(
        &mut self,
        unit_id: UnitId,
        destination: GridPosition,
    ) -> Result<(), ActionError> {
        let unit = self
            .units
            .get(unit_id)
            .ok_or(ActionError::UnitNotFound(unit_id))?;
        let from = unit.position;

        self.grid
            .set_occupant(destination, Some(unit_id))
            .map_err(ActionError::Grid)?;
        self.grid
            .set_occupant(from, None)
            .map_err(ActionError::Grid)?;
        let unit = self.units.get_mut(unit_id).expect("checked above");
        unit.position = destination;
        debug_assert_eq!(self.grid.occupant(destination), Some(unit_id));

        self.events.push(SimEvent::UnitMoved {
            unit: unit_id,
            from,
            to: destination,
        });

        let enter_damage = self
            .grid
            .tile(destination)
            .map(|tile| tile.damage_on_enter)
            .unwrap_or(0);
        if enter_damage > 0 {
            self.damage_unit(unit_id, enter_damage);
        }
        Ok(())
    }

    fn relocate_object(&mut self, object_id: ObjectId, destination: GridPosition) {
        let Some(object) = self.objects.get(object_id) else {
            return;
        };
        let from = object.position;
        let blocks = object.blocks;
        if self
            .grid
            .set_static_object(destination, Some(StaticSlot { id: object_id, blocks }))
            .is_err()
        {
            return;
        }
        let _ = self.grid.set_static_object(from, None);
        if let Some(object) = self.objects.get_mut(object_id) {
            object.position = destination;
        }
    }

    /// Applies damage to a unit, handling death cleanup and the immediate
    /// combat-end check. Returns true when the unit died.
    pub fn damage_unit(&mut self, unit_id: UnitId, amount: u32) -> bool {
        let Some(unit) = self.units.get_mut(unit_id) else {
            return false;
        };
        let dealt = unit.apply_damage(amount);
        let remaining = unit.hp.current;
        let dead = unit.is_dead();
        let position = unit.position;
        self.events.push(SimEvent::UnitDamaged {
            unit: unit_id,
            amount: dealt,
            remaining_hp: remaining,
        });

        if dead {
            // Vacate before removal so no query sees a corpse occupying.
            let _ = self.grid.set_occupant(position, None);
            self.units.remove(unit_id);
            self.events.push(SimEvent::UnitDied { unit: unit_id });
            tracing::debug!(unit = %unit_id, "unit died");
            self.scheduler
                .check_combat_end(&self.units, &mut self.events);
        }
        dead
    }

    /// Applies damage to a static object, clearing its cell on destruction.
    /// Returns true when the object was destroyed.
    pub fn damage_object(&mut self, object_id: ObjectId, amount: u32) -> bool {
        let Some(object) = self.objects.get_mut(object_id) else {
            return false;
        };
        let destroyed = object.apply_damage(amount);
        let position = object.position;
        self.events.push(SimEvent::ObjectDamaged {
            object: object_id,
            amount,
        });
        if destroyed {
            let _ = self.grid.set_static_object(position, None);
            self.objects.remove(object_id);
            self.events.push(SimEvent::ObjectDestroyed { object: object_id });
        }
        destroyed
    }
}
