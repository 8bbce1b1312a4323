//! Time management for the simulation loop and weapon cooldown clocks.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the engine started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
        self.accumulator += self.delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}

/// Start/stop/elapsed-time gate that rate-limits an action.
///
/// A clock never stops itself: once started it blocks the guarded action until
/// someone calls [`CooldownClock::stop`], normally via the per-tick
/// [`CooldownClock::stop_if_expired`] sweep. Elapsed time is simulation time
/// fed through [`CooldownClock::advance`], so cooldown behavior is
/// deterministic under a fixed timestep.
#[derive(Debug, Clone)]
pub struct CooldownClock {
    cooldown_secs: f32,
    /// Alternate duration for an upgraded weapon. Carried by every clock;
    /// no upgrade path selects it yet.
    #[allow(dead_code)]
    upgraded_cooldown_secs: f32,
    running: bool,
    elapsed: f32,
}

impl CooldownClock {
    pub fn new(cooldown_secs: f32, upgraded_cooldown_secs: f32) -> Self {
        Self {
            cooldown_secs,
            upgraded_cooldown_secs,
            running: false,
            elapsed: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin the cooldown window, resetting any previous elapsed time.
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Advance the clock by a simulation step. No-op while stopped.
    pub fn advance(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed > self.cooldown_secs
    }

    pub fn is_running_and_not_expired(&self) -> bool {
        self.running && !self.is_expired()
    }

    /// The per-tick sweep that re-arms the guarded action.
    pub fn stop_if_expired(&mut self) {
        if self.is_expired() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_stopped() {
        let clock = CooldownClock::new(0.5, 0.5);
        assert!(!clock.is_running());
        assert!(!clock.is_expired());
    }

    #[test]
    fn clock_blocks_until_swept() {
        let mut clock = CooldownClock::new(0.5, 0.5);
        clock.start();
        assert!(clock.is_running());

        clock.advance(0.6);
        // Expired but still running: clocks never self-stop.
        assert!(clock.is_expired());
        assert!(clock.is_running());

        clock.stop_if_expired();
        assert!(!clock.is_running());
    }

    #[test]
    fn sweep_is_noop_before_expiry() {
        let mut clock = CooldownClock::new(0.5, 0.5);
        clock.start();
        clock.advance(0.3);
        clock.stop_if_expired();
        assert!(clock.is_running());
        assert!(clock.is_running_and_not_expired());
    }

    #[test]
    fn restart_resets_elapsed() {
        let mut clock = CooldownClock::new(0.25, 0.25);
        clock.start();
        clock.advance(0.2);
        clock.start();
        assert!(clock.elapsed_seconds() < f32::EPSILON);
        assert!(!clock.is_expired());
    }

    #[test]
    fn advance_is_noop_while_stopped() {
        let mut clock = CooldownClock::new(0.25, 0.25);
        clock.advance(10.0);
        assert!(!clock.is_expired());
    }
}
