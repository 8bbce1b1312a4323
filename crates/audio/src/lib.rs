//! Audio plumbing using Kira.
//!
//! Sounds are addressed by `(name, player seat)` so each competitor owns an
//! isolated set of channels: player 2's engine loop never cuts off player 1's.
//! The player core talks to [`SoundBus`] only; the Kira-backed implementation
//! lives here, and [`NullBus`] covers headless runs and tests.

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle},
    sound::PlaybackRate,
    tween::Tween,
};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

/// Channel key for a sound owned by one player seat.
pub fn player_key(name: &str, player_index: usize) -> String {
    format!("player{}-{}", player_index + 1, name)
}

/// Per-player sound channel surface consumed by the player core.
pub trait SoundBus {
    /// Restart the keyed sound from the beginning. `detune` randomizes pitch
    /// so rapid-fire weapons do not sound machine-stamped.
    fn play(&mut self, name: &str, detune: bool, player_index: usize);
    /// Start the keyed sound looping; no-op if already playing.
    fn play_looped(&mut self, name: &str, player_index: usize);
    /// Play only if the channel is currently silent.
    fn play_if_not_playing(&mut self, name: &str, detune: bool, player_index: usize);
    fn stop(&mut self, name: &str, player_index: usize);
    /// Silence every channel belonging to one seat (used on respawn).
    fn stop_all_for_player(&mut self, player_index: usize);
    fn is_playing(&self, name: &str, player_index: usize) -> bool;
    /// Engine pitch follows throttle through this.
    fn set_playback_rate(&mut self, name: &str, rate: f64, player_index: usize);
    /// Drop bookkeeping for one-shot sounds that finished on their own.
    fn cleanup(&mut self) {}
}

/// Kira-backed sound bus.
pub struct KiraBus {
    manager: AudioManager,
    library: HashMap<String, StaticSoundData>,
    active: HashMap<String, StaticSoundHandle>,
    enabled: bool,
}

impl KiraBus {
    pub fn new(enabled: bool) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            library: HashMap::new(),
            active: HashMap::new(),
            enabled,
        })
    }

    /// Load a sound asset into the library under `name`.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let data = StaticSoundData::from_file(path)?;
        self.library.insert(name.to_string(), data);
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn start(&mut self, name: &str, detune: bool, looped: bool, player_index: usize) {
        if !self.enabled {
            return;
        }
        let Some(mut data) = self.library.get(name).cloned() else {
            log::debug!("no sound loaded for '{}'", name);
            return;
        };

        if looped {
            data = data.loop_region(0.0..);
        }
        if detune {
            // +/- 8 semitones so rapid fire is not machine-stamped.
            let semitones = rand::thread_rng().gen_range(-8.0..8.0);
            data = data.playback_rate(PlaybackRate::Semitones(semitones));
        }

        match self.manager.play(data) {
            Ok(handle) => {
                let key = player_key(name, player_index);
                if let Some(mut old) = self.active.insert(key, handle) {
                    old.stop(Tween::default());
                }
            }
            Err(e) => log::warn!("could not play '{}': {}", name, e),
        }
    }
}

impl SoundBus for KiraBus {
    fn play(&mut self, name: &str, detune: bool, player_index: usize) {
        // Restart semantics: an already-playing channel is cut off.
        self.stop(name, player_index);
        self.start(name, detune, false, player_index);
    }

    fn play_looped(&mut self, name: &str, player_index: usize) {
        if self.is_playing(name, player_index) {
            return;
        }
        self.start(name, false, true, player_index);
    }

    fn play_if_not_playing(&mut self, name: &str, detune: bool, player_index: usize) {
        if self.is_playing(name, player_index) {
            return;
        }
        self.start(name, detune, false, player_index);
    }

    fn stop(&mut self, name: &str, player_index: usize) {
        if let Some(mut handle) = self.active.remove(&player_key(name, player_index)) {
            handle.stop(Tween::default());
        }
    }

    fn stop_all_for_player(&mut self, player_index: usize) {
        let prefix = format!("player{}-", player_index + 1);
        self.active.retain(|key, handle| {
            if key.starts_with(&prefix) {
                handle.stop(Tween::default());
                false
            } else {
                true
            }
        });
    }

    fn is_playing(&self, name: &str, player_index: usize) -> bool {
        self.active
            .get(&player_key(name, player_index))
            .map(|h| h.state() == kira::sound::PlaybackState::Playing)
            .unwrap_or(false)
    }

    fn set_playback_rate(&mut self, name: &str, rate: f64, player_index: usize) {
        if let Some(handle) = self.active.get_mut(&player_key(name, player_index)) {
            handle.set_playback_rate(rate, Tween::default());
        }
    }

    fn cleanup(&mut self) {
        self.active
            .retain(|_, handle| handle.state() != kira::sound::PlaybackState::Stopped);
    }
}

/// Sound bus that swallows everything. Headless simulation and tests.
#[derive(Debug, Default)]
pub struct NullBus;

impl SoundBus for NullBus {
    fn play(&mut self, _name: &str, _detune: bool, _player_index: usize) {}
    fn play_looped(&mut self, _name: &str, _player_index: usize) {}
    fn play_if_not_playing(&mut self, _name: &str, _detune: bool, _player_index: usize) {}
    fn stop(&mut self, _name: &str, _player_index: usize) {}
    fn stop_all_for_player(&mut self, _player_index: usize) {}
    fn is_playing(&self, _name: &str, _player_index: usize) -> bool {
        false
    }
    fn set_playback_rate(&mut self, _name: &str, _rate: f64, _player_index: usize) {}
}

// Re-export for convenience
pub use kira;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_seat_scoped() {
        assert_eq!(player_key("engine", 0), "player1-engine");
        assert_eq!(player_key("engine", 3), "player4-engine");
        assert_ne!(player_key("rocket", 0), player_key("rocket", 1));
    }

    #[test]
    fn null_bus_reports_silence() {
        let mut bus = NullBus;
        bus.play("explosion", true, 0);
        assert!(!bus.is_playing("explosion", 0));
    }
}
