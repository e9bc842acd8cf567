//! headless-run: run a seeded Z-Team session without a frontend.
//!
//! Usage:
//!   headless-run run --seconds 120 --seed 7 --towers 4
//!   headless-run run --config session.json --snapshot

use std::path::PathBuf;
use std::process;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zteam_core::commands::SessionCommand;
use zteam_core::events::GameEvent;
use zteam_core::types::{flat_look_rotation, ground_direction};
use zteam_sim::{Session, SimConfig};

/// Radius of the ring of towers placed by `--towers`.
const TOWER_RING_RADIUS: f32 = 8.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "headless-run: Z-Team headless session runner\n\
         \n\
         Commands:\n\
         \n\
         run       Run a session and print a JSON summary\n\
         \n\
           --seconds <N>      Simulated seconds to run (default: 60)\n\
           --seed <N>         RNG seed (overrides the config file)\n\
           --config <path>    SimConfig JSON file (optional)\n\
           --towers <N>       Towers to place around the player (default: 0)\n\
           --snapshot         Also print the final snapshot\n\
         \n\
         Logging is controlled by RUST_LOG (default: info).\n"
    );
}

fn parse_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn load_config(args: &[String]) -> SimConfig {
    let Some(path) = parse_value::<PathBuf>(args, "--config") else {
        return SimConfig::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match SimConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error in {}: {e}", path.display());
            process::exit(1);
        }
    }
}

// --- Run command ---

#[derive(Debug, Default)]
struct Tally {
    robots_spawned: u32,
    robots_killed: u32,
    shots_fired: u32,
    towers_built: u32,
    towers_destroyed: u32,
    zbucks_collected: u32,
    player_hits: u32,
    resets: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RobotSpawned { .. } => self.robots_spawned += 1,
            GameEvent::RobotKilled { .. } => self.robots_killed += 1,
            GameEvent::ShotFired { .. } => self.shots_fired += 1,
            GameEvent::TowerBuilt { .. } => self.towers_built += 1,
            GameEvent::TowerDestroyed { .. } => self.towers_destroyed += 1,
            GameEvent::ZBuckCollected { value, .. } => self.zbucks_collected += value,
            GameEvent::PlayerHit { .. } => self.player_hits += 1,
            GameEvent::SessionReset => self.resets += 1,
            GameEvent::ZBuckSpawned { .. } | GameEvent::StateChanged { .. } => {}
        }
    }
}

fn cmd_run(args: &[String]) {
    let mut config = load_config(args);
    if let Some(seed) = parse_value::<u64>(args, "--seed") {
        config.seed = seed;
    }
    let seconds: f32 = parse_value(args, "--seconds").unwrap_or(60.0);
    let towers: u32 = parse_value(args, "--towers").unwrap_or(0);

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let center = session.config().player_start;
    for i in 0..towers {
        let direction = ground_direction(360.0 * i as f32 / towers as f32);
        session.queue_command(SessionCommand::SpawnTower {
            position: center + direction * TOWER_RING_RADIUS,
            orientation: flat_look_rotation(direction).unwrap_or_default(),
        });
    }

    let ticks = (seconds.max(0.0) * session.config().tick_rate as f32) as u64;
    info!(seed = session.config().seed, ticks, towers, "running session");

    let mut tally = Tally::default();
    let mut last = None;
    for _ in 0..ticks {
        let snapshot = session.tick();
        for event in &snapshot.events {
            tally.record(event);
        }
        last = Some(snapshot);
    }

    let Some(last) = last else {
        warn!("nothing to run");
        return;
    };

    let summary = serde_json::json!({
        "seed": session.config().seed,
        "ticks": ticks,
        "sim_seconds": last.time.elapsed_secs,
        "state": last.state,
        "live_robots": last.live_robots,
        "towers_standing": last.towers.len(),
        "player_health": last.player.health,
        "wallet": last.player.wallet,
        "robots_spawned": tally.robots_spawned,
        "robots_killed": tally.robots_killed,
        "shots_fired": tally.shots_fired,
        "towers_built": tally.towers_built,
        "towers_destroyed": tally.towers_destroyed,
        "zbucks_collected": tally.zbucks_collected,
        "player_hits": tally.player_hits,
        "resets": tally.resets,
    });

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error encoding summary: {e}");
            process::exit(1);
        }
    }

    if has_flag(args, "--snapshot") {
        match serde_json::to_string_pretty(&last) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error encoding snapshot: {e}");
                process::exit(1);
            }
        }
    }
}
