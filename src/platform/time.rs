//! Frame timing

use crate::consts::MAX_FRAME_MS;

/// Delta used for the very first frame
const FIRST_FRAME_MS: f32 = 1000.0 / 60.0;

/// Turns host frame timestamps (ms) into simulation deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame, clamped so a backgrounded tab
    /// cannot produce one giant step when it comes back
    pub fn frame(&mut self, time_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) as f32).clamp(0.0, MAX_FRAME_MS),
            None => FIRST_FRAME_MS,
        };
        self.last_time = Some(time_ms);
        dt
    }

    /// Forget the last timestamp (e.g. after the page was hidden)
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_uses_nominal_step() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(5000.0), FIRST_FRAME_MS);
        assert_eq!(clock.frame(5016.0), 16.0);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.frame(0.0);
        assert_eq!(clock.frame(3000.0), MAX_FRAME_MS);
    }

    #[test]
    fn test_time_going_backwards_gives_zero() {
        let mut clock = FrameClock::new();
        clock.frame(100.0);
        assert_eq!(clock.frame(50.0), 0.0);
    }
}
