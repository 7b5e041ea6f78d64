//! Virtual time that excludes paused intervals

use crate::physics::math::Scalar;

/// Tracks elapsed simulated time across pauses and visibility changes
///
/// All times are wall-clock seconds supplied by the caller, so the clock
/// never reads a global timer itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    start: Scalar,
    cumulative_pause: Scalar,
    pause_started: Option<Scalar>,
    hidden: bool,
    paused_before_hidden: bool,
    last_frame: Option<Scalar>,
}

impl SimulationClock {
    pub fn new(now: Scalar) -> Self {
        Self {
            start: now,
            cumulative_pause: 0.0,
            pause_started: None,
            hidden: false,
            paused_before_hidden: false,
            last_frame: None,
        }
    }

    /// Start again from `now`, keeping the visibility flag.
    pub fn reset(&mut self, now: Scalar) {
        let hidden = self.hidden;
        *self = Self::new(now);
        self.hidden = hidden;
        if hidden {
            self.pause_started = Some(now);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// `now - start - cumulative_pause`, frozen while paused.
    pub fn elapsed(&self, now: Scalar) -> Scalar {
        let reference = self.pause_started.unwrap_or(now);
        (reference - self.start - self.cumulative_pause).max(0.0)
    }

    pub fn pause(&mut self, now: Scalar) {
        if self.pause_started.is_none() {
            self.pause_started = Some(now);
        }
    }

    /// Resume and make the next frame a timing baseline.
    pub fn resume(&mut self, now: Scalar) {
        if let Some(started) = self.pause_started.take() {
            self.cumulative_pause += (now - started).max(0.0);
        }
        self.last_frame = None;
    }

    pub fn toggle(&mut self, now: Scalar) {
        if self.is_paused() {
            self.resume(now);
        } else {
            self.pause(now);
        }
    }

    pub fn set_paused(&mut self, paused: bool, now: Scalar) {
        if paused {
            self.pause(now);
        } else {
            self.resume(now);
        }
    }

    /// Hiding pauses the clock and remembers whether it was already paused;
    /// showing it again restores that state.
    pub fn set_hidden(&mut self, hidden: bool, now: Scalar) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            self.paused_before_hidden = self.is_paused();
            self.pause(now);
        } else {
            if !self.paused_before_hidden {
                self.resume(now);
            }
            self.last_frame = None;
        }
    }

    /// Seconds since the previous frame, or `None` for a baseline frame or
    /// while paused.
    pub fn tick(&mut self, now: Scalar) -> Option<Scalar> {
        if self.is_paused() {
            return None;
        }
        let previous = self.last_frame.replace(now)?;
        Some((now - previous).max(0.0))
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_excludes_pauses() {
        let mut clock = SimulationClock::new(10.0);
        clock.pause(12.0);
        assert_eq!(clock.elapsed(20.0), 2.0);

        clock.resume(15.0);
        assert_eq!(clock.elapsed(16.0), 3.0);
    }

    #[test]
    fn test_first_frame_is_baseline() {
        let mut clock = SimulationClock::new(0.0);
        assert_eq!(clock.tick(0.5), None);
        assert_eq!(clock.tick(0.75), Some(0.25));
    }

    #[test]
    fn test_resume_discards_paused_span() {
        let mut clock = SimulationClock::new(0.0);
        clock.tick(0.0);
        clock.tick(1.0);

        clock.pause(1.0);
        assert_eq!(clock.tick(5.0), None);
        clock.resume(100.0);

        assert_eq!(clock.tick(100.1), None);
        let dt = clock.tick(100.2).unwrap();
        assert!((dt - 0.1).abs() < 1e-9);
        assert!((clock.elapsed(100.2) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_hidden_restores_previous_pause_state() {
        let mut clock = SimulationClock::new(0.0);
        clock.set_hidden(true, 1.0);
        assert!(clock.is_paused());
        clock.set_hidden(false, 4.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(5.0), 2.0);

        clock.pause(6.0);
        clock.set_hidden(true, 7.0);
        clock.set_hidden(false, 8.0);
        assert!(clock.is_paused());
    }

    #[test]
    fn test_toggle() {
        let mut clock = SimulationClock::default();
        clock.toggle(1.0);
        assert!(clock.is_paused());
        clock.toggle(2.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(3.0), 2.0);
    }

    #[test]
    fn test_first_frame_after_showing_is_baseline() {
        let mut clock = SimulationClock::new(0.0);
        clock.tick(0.0);
        assert_eq!(clock.tick(0.1), Some(0.1));

        clock.set_hidden(true, 0.2);
        assert_eq!(clock.tick(10.0), None);
        clock.set_hidden(false, 50.0);

        assert_eq!(clock.tick(50.05), None);
        let dt = clock.tick(50.1).unwrap();
        assert!((dt - 0.05).abs() < 1e-9);
        // The hidden span from 0.2 to 50.0 is not counted
        assert!((clock.elapsed(50.1) - 0.3).abs() < 1e-9);
    }
}
