//! `derby`: headless demolition-derby match runner.
//!
//! Seats one scripted local player against CPU drivers, runs the arena at a
//! fixed tick rate for the configured match length and logs the scoreboard.

use anyhow::Result;
use audio::{KiraBus, NullBus, SoundBus};
use engine_core::Time;
use game::cpu::CpuPattern;
use game::hud::LogHud;
use game::player::{PlayerSpec, PlayerTeam, VehicleKind};
use game::{Arena, GameConfig};

/// Register every sound file under `assets/sounds/` by its file stem.
fn load_sound_library(bus: &mut KiraBus) {
    let Ok(entries) = std::fs::read_dir("assets/sounds") else {
        log::info!("no assets/sounds directory, continuing without samples");
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            continue;
        };
        if let Err(e) = bus.load_sound(&name, &path) {
            log::warn!("could not load sound {:?}: {}", path, e);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    config.save();

    let audio: Box<dyn SoundBus> = if config.sound_enabled {
        match KiraBus::new(true) {
            Ok(mut bus) => {
                load_sound_library(&mut bus);
                Box::new(bus)
            }
            Err(e) => {
                log::warn!("audio device unavailable ({}), running silent", e);
                Box::new(NullBus)
            }
        }
    } else {
        Box::new(NullBus)
    };

    let mut arena = Arena::new(config.clone(), audio, Box::new(LogHud::default()));
    arena.add_player(PlayerSpec::local("Player 1", VehicleKind::Taxi));

    let roster = [
        (VehicleKind::Police, PlayerTeam::Blue, CpuPattern::FollowAndAttack),
        (VehicleKind::FireTruck, PlayerTeam::Green, CpuPattern::Patrol),
        (VehicleKind::Tank, PlayerTeam::Yellow, CpuPattern::FollowAndAttack),
        (VehicleKind::TrashTruck, PlayerTeam::Blue, CpuPattern::Patrol),
        (VehicleKind::RaceCar, PlayerTeam::Green, CpuPattern::FollowAndAttack),
    ];
    for i in 1..config.player_count {
        let (vehicle, team, pattern) = roster[(i - 1) % roster.len()];
        arena.add_player(PlayerSpec::cpu(&format!("CPU {}", i), vehicle, team, pattern));
    }

    let dt = config.tick_dt();
    let ticks = (config.match_seconds / dt).ceil() as u64;
    log::info!(
        "match start: {} seats, {}s at {} Hz",
        arena.players.len(),
        config.match_seconds,
        config.tick_hz
    );

    let mut time = Time::new();
    for tick in 0..ticks {
        // Scripted local input: drive a weaving line and shoot on a pattern.
        {
            let game::world::Arena { players, scene } = &mut arena;
            let local = &mut players[0];
            local.try_accelerate(scene, 1.0);
            local.try_turn(scene, (scene.now * 0.25).sin() * 0.6);
            if tick % 30 == 0 {
                local.try_fire_bullets(scene);
            }
            if tick % 240 == 120 {
                local.try_fire_rockets(scene);
            }
            if tick % 600 == 300 {
                local.try_fire_special_weapon(scene);
                local.try_stop_fire_special_weapon(scene);
            }
        }

        arena.tick(dt);
        time.update();
    }

    log::info!(
        "match over: {} ticks in {:.2}s wall time",
        time.frame_count(),
        time.elapsed_seconds()
    );
    for (name, deaths, state) in arena.scoreboard() {
        log::info!("  {:<10} deaths: {:<3} ({:?})", name, deaths, state);
    }

    Ok(())
}
