//! Headless skirmish simulation
//!
//! Drives the full core end to end: a player and a patrol of NPCs on a
//! terrain-scattered grid, marauder attacks raising distress calls, and
//! rescue decisions logged each round.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cinder_keep::core::types::EntityId;
use cinder_keep::core::SimulationConfig;
use cinder_keep::faction::{
    AttackReport, CombatStats, DecayMode, DistressAlertRegistry, Faction,
    FactionRelationshipMatrix,
};
use cinder_keep::grid::{find_path, HexCoord, HexGrid, PathProgress, Terrain};
use cinder_keep::turn::{EntityRegistry, Npc, Player, TurnScheduler};

const SEED: u64 = 0xC1DE;
const GRID_WIDTH: u32 = 24;
const GRID_HEIGHT: u32 = 18;
const NPC_COUNT: usize = 4;
const ROUNDS: u64 = 6;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Cinder Keep skirmish simulation");

    let config = SimulationConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);

    // Scatter terrain over an open floor
    let mut grid = HexGrid::new(GRID_WIDTH, GRID_HEIGHT);
    for q in 0..GRID_WIDTH as i32 {
        for r in 0..GRID_HEIGHT as i32 {
            let roll: f32 = rng.gen();
            let terrain = if roll < 0.08 {
                Terrain::Wall
            } else if roll < 0.16 {
                Terrain::Rubble
            } else if roll < 0.20 {
                Terrain::Mire
            } else {
                Terrain::Floor
            };
            grid.set_terrain(HexCoord::new(q, r), terrain);
        }
    }

    // Player and a militia patrol
    let mut scheduler = TurnScheduler::new();
    let mut entities = EntityRegistry::new();

    let player_id = EntityId::new();
    entities.insert(player_id, Box::new(Player::new("Wanderer", 4)));
    scheduler
        .register_player(player_id)
        .expect("first player registration cannot fail");

    let mut npc_ids = Vec::new();
    for i in 0..NPC_COUNT {
        let id = EntityId::new();
        entities.insert(id, Box::new(Npc::new(format!("Guard-{i}"), 3)));
        scheduler.register_npc(id);
        npc_ids.push(id);
    }

    let matrix = FactionRelationshipMatrix::standard();
    let mut alerts = DistressAlertRegistry::new(DecayMode::Rounds(config.alert_duration_rounds));

    // A marauder presence the patrol will react to
    let marauder = EntityId::new();
    let victim_stats = CombatStats {
        base_damage: 8.0,
        max_health: 60.0,
        crit_chance: 0.05,
        crit_multiplier: 2.0,
        protected_archetype: true,
    };

    for _ in 0..ROUNDS {
        let turn = scheduler.turn_number();
        alerts.set_turn(turn);

        // A guard takes a hit somewhere on the map
        let victim = npc_ids[rng.gen_range(0..npc_ids.len())];
        let position = HexCoord::new(
            rng.gen_range(0..GRID_WIDTH as i32),
            rng.gen_range(0..GRID_HEIGHT as i32),
        );
        let damage = rng.gen_range(4.0..14.0);
        let health = rng.gen_range(0.1..0.9);

        if let Some(result) = alerts.broadcast(AttackReport {
            victim,
            attacker: marauder,
            victim_faction: Faction::Militia,
            position,
            damage,
            victim_health_fraction: health,
            victim_stats,
        }) {
            tracing::info!(
                turn,
                merged = result.merged,
                sound = result.call.sound_level(),
                "distress call at ({}, {})",
                result.call.position.q,
                result.call.position.r,
            );
        }

        // The patrol leader listens, then looks
        let listener = HexCoord::new(GRID_WIDTH as i32 / 2, GRID_HEIGHT as i32 / 2);
        if let Some(heard) = alerts.loudest_call(listener, config.hearing_range, None) {
            tracing::info!(turn, sound = heard.sound_level(), "loudest call heard");
        }
        if let Some(rescue) = alerts.highest_priority_call(
            &matrix,
            Faction::Militia,
            listener,
            config.vision_range,
            None,
        ) {
            tracing::info!(turn, threat = rescue.threat_level, "rescue target chosen");

            // Walk a responder toward the victim, one step per tick
            if let Some(path) = find_path(&grid, listener, rescue.position, Some(20)) {
                let mut progress = PathProgress::new(path);
                let mut steps = 0;
                while progress.advance().is_some() {
                    steps += 1;
                }
                tracing::info!(turn, steps, "responder route walked");
            } else {
                tracing::info!(turn, "no route to the victim within budget");
            }
        }

        // Resolve the round
        scheduler.end_player_turn(&mut entities);
        while !matches!(
            scheduler.state(),
            cinder_keep::turn::SimulationState::PlayerTurn
        ) {
            scheduler.advance(&mut entities);
            if config.npc_turn_delay_ms > 0 {
                std::thread::sleep(std::time::Duration::from_millis(config.npc_turn_delay_ms));
            }
        }

        alerts.sweep(|id| entities.contains(id) || id == marauder);
    }

    tracing::info!(
        turns_played = scheduler.turn_number() - 1,
        events = scheduler.history().len(),
        live_alerts = alerts.active_count(),
        "simulation finished"
    );

    match serde_json::to_string_pretty(&scheduler) {
        Ok(snapshot) => tracing::debug!("scheduler snapshot:\n{snapshot}"),
        Err(error) => tracing::warn!(%error, "failed to serialize scheduler"),
    }
}
