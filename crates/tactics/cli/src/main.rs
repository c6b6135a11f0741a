//! Headless skirmish runner.
//!
//! Composition root for the simulation core: builds a demo scenario, wires
//! the AI for both sides, and runs the turn loop to termination, printing
//! core notifications as they drain. This is the "game loop collaborator"
//! the core expects; a rendering client would replace the loop body but
//! keep the same calls.

use anyhow::{Context, Result, bail};
use tactics_core::{
    AiProfile, AttackSpec, GridPosition, SchedulerPhase, SimConfig, SimEvent, Simulation,
    StaticObjectSpec, TargetPriority, TargetingShape, Team, TileType, TileTypeId, UnitTemplate, ai,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut sim = build_skirmish().context("failed to build scenario")?;
    sim.start_first_round();
    report_events(&mut sim);

    // Both sides run on the AI driver here; a real client would route
    // player turns through input instead.
    let mut guard = 0;
    loop {
        match sim.phase() {
            SchedulerPhase::Ended { player_won } => {
                println!(
                    "combat over after round {}: {}",
                    sim.round(),
                    if player_won { "player wins" } else { "player loses" }
                );
                return Ok(());
            }
            SchedulerPhase::Idle => bail!("scheduler idle mid-combat"),
            SchedulerPhase::Active(_) => {
                ai::run_turn(&mut sim);
                report_events(&mut sim);
            }
        }
        guard += 1;
        if guard > 1000 {
            bail!("skirmish did not terminate within 1000 turns");
        }
    }
}

fn build_skirmish() -> Result<Simulation> {
    let tiles = vec![
        TileType::normal("floor"),
        TileType::blocking("wall"),
        TileType::normal("mud").with_movement_cost(2.0),
        TileType::normal("embers").with_enter_damage(1).with_standing_damage(1),
    ];
    let mut sim = Simulation::new(SimConfig::with_seed(7), 10, 10, tiles)?;

    // A wall segment with one gap, some mud, and a burning patch.
    for z in 2..8 {
        if z != 5 {
            sim.set_tile(GridPosition::new(4, z), TileTypeId(1))?;
        }
    }
    for x in 5..8 {
        sim.set_tile(GridPosition::new(x, 2), TileTypeId(2))?;
    }
    sim.set_tile(GridPosition::new(6, 6), TileTypeId(3))?;

    sim.place_object(
        &StaticObjectSpec::new("crate").with_hp(4).pushable(),
        GridPosition::new(3, 5),
    )?;

    let knight = UnitTemplate::new("knight")
        .with_stats(14, 2, 8)
        .with_combat(3, 1)
        .with_attack(AttackSpec::basic("sword", 1))
        .with_ai(AiProfile::new(TargetPriority::Closest));
    let archer = UnitTemplate::new("archer")
        .with_stats(9, 4, 11)
        .with_combat(2, 4)
        .with_attack(
            AttackSpec::basic("longbow", 4)
                .with_min_range(2)
                .with_shape(TargetingShape::SingleTarget),
        )
        .with_ai(AiProfile::new(TargetPriority::LowestHp));
    let raider = UnitTemplate::new("raider")
        .with_stats(10, 0, 10)
        .with_combat(2, 1)
        .with_attack(AttackSpec::basic("axe", 1))
        .with_ai(AiProfile::new(TargetPriority::Closest));

    sim.spawn_unit(&knight, Team::Player, GridPosition::new(1, 4))?;
    sim.spawn_unit(&archer, Team::Player, GridPosition::new(0, 5))?;
    sim.spawn_unit(&raider, Team::Enemy, GridPosition::new(8, 5))?;
    sim.spawn_unit(&raider, Team::Enemy, GridPosition::new(8, 6))?;

    Ok(sim)
}

fn report_events(sim: &mut Simulation) {
    for event in sim.drain_events() {
        match event {
            SimEvent::RoundStarted { round } => println!("-- round {round} --"),
            SimEvent::ActiveUnitChanged { unit } => tracing::info!(%unit, "turn"),
            SimEvent::UnitMoved { unit, from, to } => {
                tracing::info!(%unit, %from, %to, "moved")
            }
            SimEvent::UnitDamaged {
                unit,
                amount,
                remaining_hp,
            } => tracing::info!(%unit, amount, remaining_hp, "damaged"),
            SimEvent::UnitDied { unit } => println!("{unit} has fallen"),
            SimEvent::CombatEnded { player_won } => {
                tracing::info!(player_won, "combat ended")
            }
            _ => {}
        }
    }
}
