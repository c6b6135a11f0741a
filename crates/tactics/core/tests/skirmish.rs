//! End-to-end scenarios driving the whole simulation surface: spawn, turn
//! loop, action pipeline, displacement, and AI, the way a client would.

use tactics_core::{
    ActionError, ActionKind, AiProfile, AttackSpec, GridPosition, SchedulerPhase, SimConfig,
    SimEvent, Simulation, StaticObjectSpec, TargetPriority, Team, TileType, TileTypeId,
    TurnDisposition, UnitTemplate, ai,
};

fn pos(x: i32, z: i32) -> GridPosition {
    GridPosition::new(x, z)
}

fn open_sim() -> Simulation {
    Simulation::new(
        SimConfig::default(),
        10,
        10,
        vec![
            TileType::normal("floor"),
            TileType::blocking("wall"),
            TileType::normal("embers")
                .with_enter_damage(1)
                .with_standing_damage(2),
        ],
    )
    .unwrap()
}

fn soldier() -> UnitTemplate {
    UnitTemplate::new("soldier")
        .with_stats(10, 5, 10)
        .with_combat(2, 1)
        .with_attack(AttackSpec::basic("strike", 1))
}

#[test]
fn move_targets_exclude_occupied_and_attack_respects_range() {
    let mut sim = open_sim();
    let a = sim
        .spawn_unit(&soldier().with_stats(10, 5, 20), Team::Player, pos(0, 0))
        .unwrap();
    let b = sim.spawn_unit(&soldier(), Team::Enemy, pos(3, 0)).unwrap();
    sim.start_first_round();
    assert_eq!(sim.active_unit(), Some(a));

    let moves = sim.legal_targets(a, ActionKind::Move);
    assert!(!moves.contains(&pos(3, 0)), "occupied cell is not a move target");
    assert!(moves.contains(&pos(2, 0)), "path of length 2 fits budget 4");

    // Attack range 1 from (0,0) cannot reach the enemy at distance 3.
    assert!(sim.legal_targets(a, ActionKind::Attack(0)).is_empty());

    // After stepping to (2,0) the enemy is adjacent and attackable.
    let (_, disposition) = sim.perform_action(a, ActionKind::Move, pos(2, 0)).unwrap();
    assert_eq!(disposition, TurnDisposition::TurnContinues);
    assert_eq!(sim.unit(a).unwrap().position, pos(2, 0));
    assert_eq!(
        sim.legal_targets(a, ActionKind::Attack(0)),
        vec![pos(3, 0)]
    );

    let (outcome, _) = sim.perform_action(a, ActionKind::Attack(0), pos(3, 0)).unwrap();
    assert_eq!(outcome.damage_dealt, 2);
    assert_eq!(sim.unit(b).unwrap().hp.current, 8);
}

#[test]
fn push_toward_wall_stops_adjacent_and_leaves_wall_untouched() {
    let mut sim = open_sim();
    // Wall one cell east of the victim.
    sim.set_tile(pos(5, 4), TileTypeId(1)).unwrap();
    let victim = sim.spawn_unit(&soldier(), Team::Enemy, pos(4, 4)).unwrap();
    let wall_tile_before = sim.grid().tile(pos(5, 4)).cloned();

    // Pushed three cells away from a unit standing to the west.
    let result = sim.push_unit(victim, pos(3, 4), 3, true).unwrap();
    assert_eq!(result.final_position, pos(4, 4), "already adjacent to the wall");
    assert!(result.stopped_by_wall);
    assert!(!result.stopped_by_unit);
    assert_eq!(sim.grid().occupant(pos(5, 4)), None);
    assert_eq!(sim.grid().tile(pos(5, 4)).cloned(), wall_tile_before);
    assert_eq!(sim.unit(victim).unwrap().position, pos(4, 4));
}

#[test]
fn push_collision_damages_the_obstacle_unit() {
    let mut sim = open_sim();
    let pushed = sim.spawn_unit(&soldier(), Team::Enemy, pos(2, 2)).unwrap();
    let obstacle = sim.spawn_unit(&soldier(), Team::Enemy, pos(5, 2)).unwrap();

    let result = sim.push_unit(pushed, pos(1, 2), 4, true).unwrap();
    assert_eq!(result.final_position, pos(4, 2), "stops one short of the obstacle");
    assert!(result.stopped_by_unit);
    assert_eq!(result.collision_target, Some(obstacle));
    assert_eq!(sim.unit(obstacle).unwrap().hp.current, 9);
}

#[test]
fn throw_refuses_occupied_or_blocked_cells() {
    let mut sim = open_sim();
    sim.set_tile(pos(6, 6), TileTypeId(1)).unwrap();
    let unit = sim.spawn_unit(&soldier(), Team::Player, pos(1, 1)).unwrap();
    let _other = sim.spawn_unit(&soldier(), Team::Enemy, pos(2, 2)).unwrap();

    assert!(!sim.throw_unit(unit, pos(2, 2)), "occupied");
    assert!(!sim.throw_unit(unit, pos(6, 6)), "blocked tile");
    assert!(sim.throw_unit(unit, pos(3, 3)));
    assert_eq!(sim.unit(unit).unwrap().position, pos(3, 3));
    assert_eq!(sim.grid().occupant(pos(1, 1)), None);
}

#[test]
fn resource_pools_gate_actions_and_exhaustion_ends_turn() {
    let mut sim = open_sim();
    // No mana: the turn ends exactly when moves and attacks run out.
    let a = sim
        .spawn_unit(&soldier().with_stats(10, 0, 20), Team::Player, pos(0, 0))
        .unwrap();
    let b = sim
        .spawn_unit(&soldier().with_stats(10, 0, 1), Team::Enemy, pos(2, 0))
        .unwrap();
    sim.start_first_round();

    let (_, disposition) = sim.perform_action(a, ActionKind::Move, pos(1, 0)).unwrap();
    assert_eq!(disposition, TurnDisposition::TurnContinues);

    // Move pool is empty now; a second move is rejected before mutation.
    let err = sim.begin_action(a, ActionKind::Move, pos(0, 0)).unwrap_err();
    assert!(matches!(err, ActionError::Resource(_)));
    assert_eq!(sim.unit(a).unwrap().position, pos(1, 0));

    let (_, disposition) = sim.perform_action(a, ActionKind::Attack(0), pos(2, 0)).unwrap();
    assert_eq!(disposition, TurnDisposition::TurnEnded);
    assert_eq!(sim.active_unit(), Some(b));
}

#[test]
fn spending_one_pool_never_touches_the_others() {
    let mut sim = open_sim();
    let caster = soldier().with_ability(tactics_core::AbilitySpec::new("bolt", 2, 3, 1));
    let a = sim.spawn_unit(&caster, Team::Player, pos(0, 0)).unwrap();
    sim.spawn_unit(&soldier(), Team::Enemy, pos(9, 9)).unwrap();
    sim.start_first_round();

    sim.perform_action(a, ActionKind::Ability(0), pos(1, 1)).unwrap();
    let unit = sim.unit(a).unwrap();
    assert_eq!(unit.mana.current, 3);
    assert_eq!(unit.moves_remaining, 1);
    assert_eq!(unit.attacks_remaining, 1);

    // Mana persists across turns: no refill at the next activation.
    sim.request_end_turn();
    sim.request_end_turn();
    assert_eq!(sim.active_unit(), Some(a));
    assert_eq!(sim.unit(a).unwrap().mana.current, 3);
}

#[test]
fn busy_flag_blocks_second_action_until_completion() {
    let mut sim = open_sim();
    let a = sim.spawn_unit(&soldier(), Team::Player, pos(0, 0)).unwrap();
    sim.spawn_unit(&soldier(), Team::Enemy, pos(9, 9)).unwrap();
    sim.start_first_round();

    let ticket = sim.begin_action(a, ActionKind::Move, pos(1, 0)).unwrap();
    assert!(sim.is_busy());
    let err = sim.begin_action(a, ActionKind::Attack(0), pos(1, 1)).unwrap_err();
    assert!(matches!(err, ActionError::Busy { .. }));

    assert_eq!(sim.complete_action(ticket), TurnDisposition::TurnContinues);
    assert!(!sim.is_busy());
}

#[test]
fn killing_the_last_enemy_ends_combat_immediately() {
    let mut sim = open_sim();
    let a = sim
        .spawn_unit(&soldier().with_combat(10, 1).with_stats(10, 0, 20), Team::Player, pos(0, 0))
        .unwrap();
    sim.spawn_unit(&soldier().with_stats(3, 0, 1), Team::Enemy, pos(1, 0)).unwrap();
    sim.start_first_round();
    sim.drain_events();

    let (outcome, disposition) = sim.perform_action(a, ActionKind::Attack(0), pos(1, 0)).unwrap();
    assert_eq!(outcome.units_killed, 1);
    assert_eq!(disposition, TurnDisposition::CombatOver);
    assert_eq!(sim.phase(), SchedulerPhase::Ended { player_won: true });

    let events = sim.drain_events();
    assert!(events.contains(&SimEvent::CombatEnded { player_won: true }));
    assert!(events.iter().any(|e| matches!(e, SimEvent::UnitDied { .. })));
}

#[test]
fn tile_hazards_hurt_on_enter_and_while_standing() {
    let mut sim = open_sim();
    sim.set_tile(pos(1, 0), TileTypeId(2)).unwrap();
    let a = sim
        .spawn_unit(&soldier().with_stats(10, 0, 20), Team::Player, pos(0, 0))
        .unwrap();
    sim.spawn_unit(&soldier(), Team::Enemy, pos(9, 9)).unwrap();
    sim.start_first_round();

    sim.perform_action(a, ActionKind::Move, pos(1, 0)).unwrap();
    assert_eq!(sim.unit(a).unwrap().hp.current, 9, "enter damage");

    // Full rotation back to the unit: standing damage applies on turn start.
    sim.request_end_turn();
    sim.request_end_turn();
    assert_eq!(sim.active_unit(), Some(a));
    assert_eq!(sim.unit(a).unwrap().hp.current, 7, "standing damage");
}

#[test]
fn attacks_break_static_objects() {
    let mut sim = open_sim();
    // Area attacks may be aimed at object cells; point attacks need a unit.
    let smash = AttackSpec::basic("smash", 1).with_shape(tactics_core::TargetingShape::Area);
    let mut breaker = soldier().with_stats(10, 5, 20);
    breaker.attacks = vec![smash];
    let a = sim.spawn_unit(&breaker, Team::Player, pos(0, 0)).unwrap();
    sim.spawn_unit(&soldier(), Team::Enemy, pos(9, 9)).unwrap();
    let crate_id = sim
        .place_object(&StaticObjectSpec::new("crate").with_hp(2), pos(1, 0))
        .unwrap();
    sim.start_first_round();
    assert!(!sim.grid().is_walkable(pos(1, 0)), "crate blocks movement");

    let (outcome, _) = sim.perform_action(a, ActionKind::Attack(0), pos(1, 0)).unwrap();
    assert_eq!(outcome.objects_destroyed, 1);
    assert!(sim.objects().get(crate_id).is_none());
    assert!(sim.grid().is_walkable(pos(1, 0)), "destroyed crate frees the cell");
}

#[test]
fn ghost_possession_flips_the_body_and_consumes_the_ghost() {
    let mut sim = open_sim();
    let ghost_template = UnitTemplate::new("wraith")
        .with_stats(6, 5, 15)
        .ghost();
    let ghost = sim
        .spawn_unit(&ghost_template, Team::Player, pos(2, 2))
        .unwrap();
    let body = sim.spawn_unit(&soldier(), Team::Enemy, pos(3, 2)).unwrap();
    sim.spawn_unit(&soldier(), Team::Enemy, pos(9, 9)).unwrap();
    sim.start_first_round();
    assert_eq!(sim.active_unit(), Some(ghost));

    let targets = sim.legal_targets(ghost, ActionKind::Possess);
    assert!(targets.contains(&pos(3, 2)));

    let (_, disposition) = sim.perform_action(ghost, ActionKind::Possess, pos(3, 2)).unwrap();
    // The acting entity is gone, so its turn cannot continue.
    assert_eq!(disposition, TurnDisposition::TurnEnded);
    assert!(sim.unit(ghost).is_none());
    assert_eq!(sim.unit(body).unwrap().team, Team::Player);
    assert_eq!(sim.grid().occupant(pos(2, 2)), None, "ghost cell vacated");
    assert!(
        sim.drain_events()
            .contains(&SimEvent::UnitPossessed { ghost, body })
    );
}

#[test]
fn identical_seeds_replay_identically() {
    fn run() -> Vec<SimEvent> {
        let mut sim = Simulation::new(
            SimConfig::with_seed(99),
            10,
            10,
            vec![TileType::normal("floor")],
        )
        .unwrap();
        let raider = soldier().with_ai(AiProfile::new(TargetPriority::Random));
        sim.spawn_unit(&raider, Team::Player, pos(0, 0)).unwrap();
        sim.spawn_unit(&raider, Team::Player, pos(0, 9)).unwrap();
        sim.spawn_unit(&raider, Team::Enemy, pos(9, 0)).unwrap();
        sim.spawn_unit(&raider, Team::Enemy, pos(9, 9)).unwrap();
        sim.start_first_round();

        let mut log = sim.drain_events();
        for _ in 0..40 {
            if sim.phase() != SchedulerPhase::Idle && !matches!(sim.phase(), SchedulerPhase::Ended { .. })
            {
                ai::run_turn(&mut sim);
                log.extend(sim.drain_events());
            }
        }
        log
    }

    assert_eq!(run(), run());
}
