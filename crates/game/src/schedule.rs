//! Simulation-clock event queue.
//!
//! Delayed work (respawn countdowns) is scheduled against the arena's own
//! clock instead of a host timer, so replaying the same inputs at the same
//! tick rate fires events on exactly the same tick every run.

/// A deferred game action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Move the player at this seat index from `Dead` to `Respawning`.
    RespawnPlayer(usize),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: f32,
    event: GameEvent,
}

/// Pending events ordered by due time on the simulation clock.
#[derive(Debug, Default)]
pub struct ScheduledEvents {
    queue: Vec<Scheduled>,
}

impl ScheduledEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire once the clock reaches `now + delay_secs`.
    pub fn schedule_in(&mut self, now: f32, delay_secs: f32, event: GameEvent) {
        self.queue.push(Scheduled {
            due: now + delay_secs,
            event,
        });
    }

    /// Pop every event whose due time has been reached, earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<GameEvent> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.queue.retain(|s| {
            if s.due <= now {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|s| s.event).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fire_only_once_due() {
        let mut events = ScheduledEvents::new();
        events.schedule_in(0.0, 5.0, GameEvent::RespawnPlayer(2));
        assert!(events.drain_due(4.99).is_empty());
        assert_eq!(events.pending(), 1);
        assert_eq!(events.drain_due(5.0), vec![GameEvent::RespawnPlayer(2)]);
        assert_eq!(events.pending(), 0);
    }

    #[test]
    fn events_drain_earliest_first() {
        let mut events = ScheduledEvents::new();
        events.schedule_in(0.0, 3.0, GameEvent::RespawnPlayer(1));
        events.schedule_in(0.0, 1.0, GameEvent::RespawnPlayer(0));
        assert_eq!(
            events.drain_due(10.0),
            vec![GameEvent::RespawnPlayer(0), GameEvent::RespawnPlayer(1)]
        );
    }

    #[test]
    fn draining_leaves_future_events_queued() {
        let mut events = ScheduledEvents::new();
        events.schedule_in(1.0, 1.0, GameEvent::RespawnPlayer(0));
        events.schedule_in(1.0, 9.0, GameEvent::RespawnPlayer(1));
        assert_eq!(events.drain_due(2.5), vec![GameEvent::RespawnPlayer(0)]);
        assert_eq!(events.pending(), 1);
    }
}
