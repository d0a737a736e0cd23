//! Headless Skirmish Runner
//!
//! Drops the player into a seeded arena with walls and hostiles, drives it
//! with scripted click targets, and prints a summary of the run.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use shadowstep::actor::{Enemy, Hostile, Player, TargetOutcome};
use shadowstep::core::{load_config, GameConfig, Result};
use shadowstep::coordinator::EntityCoordinator;
use shadowstep::diagnostics::TracingSink;
use shadowstep::spatial::{ArenaCollision, BlockedCells};
use shadowstep::Vec2;

const CELL_SIZE: f32 = 16.0;
const BODY_RADIUS: f32 = 12.0;
const PLAYER_RADIUS: f32 = 8.0;
/// Player swings at the engaged hostile when this close
const MELEE_REACH: f32 = 32.0;
const SWING_INTERVAL: f32 = 0.5;

/// Headless skirmish runner
#[derive(Parser, Debug)]
#[command(name = "shadowstep")]
#[command(about = "Run a scripted skirmish and report combat statistics")]
struct Args {
    /// TOML config overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Frames per second of simulated time
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Number of hostiles to spawn
    #[arg(long, default_value_t = 6)]
    hostiles: usize,

    /// Number of wall blocks in the arena
    #[arg(long, default_value_t = 12)]
    walls: usize,

    /// Arena side length in world units
    #[arg(long, default_value_t = 1200.0)]
    arena: f32,

    /// Pick a new click target every N frames
    #[arg(long, default_value_t = 180)]
    retarget_every: u32,

    /// Start the run sneaking
    #[arg(long)]
    sneak: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    frames: u32,
    hits_taken: u32,
    hits_dealt: u32,
    frames_in_combat: u32,
    targets_issued: u32,
    targets_rejected: u32,
    blocked_steps: u32,
    avg_frame_ms: f64,
    max_frame_ms: f64,
    final_position: (f32, f32),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shadowstep=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!("Starting skirmish (seed {})", seed);

    let terrain = build_terrain(&mut rng, args.walls, args.arena);
    let center = Vec2::splat(args.arena / 2.0);
    let hostiles = spawn_hostiles(&mut rng, &terrain, &config, args.hostiles, args.arena, center);
    tracing::info!(
        "Arena ready: {} blocked cells, {} hostiles",
        terrain.len(),
        hostiles.len()
    );

    let mut player = Player::new(center, config.movement.clone());
    if args.sneak {
        player.toggle_sneak();
    }

    let collision = ArenaCollision::new(terrain, BODY_RADIUS).with_mover_radius(PLAYER_RADIUS);
    let mut coordinator = EntityCoordinator::new(player, hostiles, config.combat.clone())
        .with_collision(collision)
        .with_sink(TracingSink);

    let dt = 1.0 / args.fps;
    let mut summary = RunSummary {
        seed,
        frames: args.frames,
        hits_taken: 0,
        hits_dealt: 0,
        frames_in_combat: 0,
        targets_issued: 0,
        targets_rejected: 0,
        blocked_steps: 0,
        avg_frame_ms: 0.0,
        max_frame_ms: 0.0,
        final_position: (0.0, 0.0),
    };
    let mut swing_timer = 0.0_f32;

    for frame in 0..args.frames {
        if frame % args.retarget_every.max(1) == 0 {
            let target = Vec2::new(rng.gen_range(0.0..args.arena), rng.gen_range(0.0..args.arena));
            summary.targets_issued += 1;
            if coordinator.move_player_to(target) == TargetOutcome::Rejected {
                summary.targets_rejected += 1;
            }
        }

        let positions: Vec<Vec2> = coordinator.hostiles().iter().map(|h| h.position()).collect();
        if let Some(arena) = coordinator.collision_mut() {
            arena.set_sight_blockers(positions);
        }

        let report = coordinator.update(dt, None);
        if report.hit_by.is_some() {
            summary.hits_taken += 1;
        }
        if matches!(report.player_step, shadowstep::StepOutcome::Blocked { .. }) {
            summary.blocked_steps += 1;
        }

        swing_timer = (swing_timer - dt).max(0.0);
        if let Some(id) = coordinator.enemy_in_combat() {
            summary.frames_in_combat += 1;
            let in_reach = coordinator
                .hostile(id)
                .map(|h| h.position().distance(coordinator.player().position()) <= MELEE_REACH)
                .unwrap_or(false);
            if in_reach && swing_timer <= 0.0 {
                coordinator.attack_enemy(id)?;
                summary.hits_dealt += 1;
                swing_timer = SWING_INTERVAL;
            }
        }
    }

    summary.avg_frame_ms = coordinator.metrics().avg_pathfinding_time_ms();
    summary.max_frame_ms = coordinator.metrics().max_pathfinding_time_ms();
    let end = coordinator.player().position();
    summary.final_position = (end.x, end.y);

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            tracing::warn!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Scatter rectangular walls, keeping the arena center clear for the player
fn build_terrain(rng: &mut ChaCha8Rng, walls: usize, arena: f32) -> BlockedCells {
    let mut terrain = BlockedCells::with_cell_size(CELL_SIZE);
    let center = Vec2::splat(arena / 2.0);

    let mut placed = 0;
    let mut attempts = 0;
    while placed < walls && attempts < walls * 20 {
        attempts += 1;
        let min = Vec2::new(rng.gen_range(0.0..arena), rng.gen_range(0.0..arena));
        let size = Vec2::new(rng.gen_range(CELL_SIZE..CELL_SIZE * 8.0), rng.gen_range(CELL_SIZE..CELL_SIZE * 8.0));
        let max = min + size;
        let clearance = 64.0;
        if center.x + clearance > min.x
            && center.x - clearance < max.x
            && center.y + clearance > min.y
            && center.y - clearance < max.y
        {
            continue;
        }
        terrain.block_rect(min, max);
        placed += 1;
    }
    terrain
}

fn spawn_hostiles(
    rng: &mut ChaCha8Rng,
    terrain: &BlockedCells,
    config: &GameConfig,
    count: usize,
    arena: f32,
    center: Vec2,
) -> Vec<Enemy> {
    let mut hostiles = Vec::with_capacity(count);
    let mut attempts = 0;
    while hostiles.len() < count && attempts < count * 50 {
        attempts += 1;
        let position = Vec2::new(rng.gen_range(0.0..arena), rng.gen_range(0.0..arena));
        if terrain.is_position_blocked(position) || position.distance(center) < config.enemy.detection_range {
            continue;
        }
        hostiles.push(Enemy::new(position, config.enemy.clone()));
    }
    hostiles
}

fn print_text(summary: &RunSummary) {
    println!("Skirmish Result");
    println!("===============");
    println!("Frames: {}", summary.frames);
    println!("Hits taken: {}", summary.hits_taken);
    println!("Hits dealt: {}", summary.hits_dealt);
    println!("Frames in combat: {}", summary.frames_in_combat);
    println!(
        "Targets: {} issued, {} rejected",
        summary.targets_issued, summary.targets_rejected
    );
    println!("Blocked steps: {}", summary.blocked_steps);
    println!(
        "Frame time: {:.3} ms avg, {:.3} ms max",
        summary.avg_frame_ms, summary.max_frame_ms
    );
    println!(
        "Final position: ({:.1}, {:.1})",
        summary.final_position.0, summary.final_position.1
    );
    println!("Seed: {}", summary.seed);
}
