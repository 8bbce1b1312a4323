//! HUD surface for the local seat.
//!
//! The player core reports health, weapon selection and kill-feed lines
//! through this trait; the headless runner logs them, tests capture them.

/// Sink for local-player HUD updates.
pub trait Hud {
    /// Health changed; `percentage` is 0..=1 (never negative even if the
    /// underlying hit points are).
    fn update_health(&mut self, percentage: f32);
    fn select_next_weapon(&mut self);
    fn select_previous_weapon(&mut self);
    /// One-line kill-feed / status notification.
    fn notify(&mut self, message: &str);
}

/// HUD that writes everything to the log. Used by the headless runner.
#[derive(Debug, Default)]
pub struct LogHud {
    weapon_row: i32,
}

impl Hud for LogHud {
    fn update_health(&mut self, percentage: f32) {
        log::info!("health: {:.0}%", percentage * 100.0);
    }

    fn select_next_weapon(&mut self) {
        self.weapon_row += 1;
        log::info!("weapon row -> {}", self.weapon_row);
    }

    fn select_previous_weapon(&mut self) {
        self.weapon_row -= 1;
        log::info!("weapon row -> {}", self.weapon_row);
    }

    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
    }
}

/// HUD that records nothing. Remote and CPU seats.
#[derive(Debug, Default)]
pub struct NullHud;

impl Hud for NullHud {
    fn update_health(&mut self, _percentage: f32) {}
    fn select_next_weapon(&mut self) {}
    fn select_previous_weapon(&mut self) {}
    fn notify(&mut self, _message: &str) {}
}

/// HUD that keeps the last values it was handed. Test double.
#[derive(Debug, Default)]
pub struct RecordingHud {
    pub last_health: Option<f32>,
    pub weapon_steps: i32,
    pub notifications: Vec<String>,
}

impl Hud for RecordingHud {
    fn update_health(&mut self, percentage: f32) {
        self.last_health = Some(percentage);
    }

    fn select_next_weapon(&mut self) {
        self.weapon_steps += 1;
    }

    fn select_previous_weapon(&mut self) {
        self.weapon_steps -= 1;
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
