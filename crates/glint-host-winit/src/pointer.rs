//! Last-known pointer position, fed by asynchronous cursor events.
//!
//! The tracker and the frame callback run on the same event-loop thread, so
//! a frame always sees the newest position processed before its redraw.

use glint_core::PointerUnits;

#[derive(Debug)]
pub struct PointerTracker {
    units: PointerUnits,
    window: [f64; 2],
    pos: [f64; 2],
}

impl PointerTracker {
    pub fn new(units: PointerUnits, width: u32, height: u32) -> Self {
        Self {
            units,
            window: [f64::from(width.max(1)), f64::from(height.max(1))],
            // Until the first event arrives. Matches the historical default.
            pos: [1.0, 1.0],
        }
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window = [f64::from(width.max(1)), f64::from(height.max(1))];
    }

    /// Record a cursor event, in physical pixels.
    pub fn update(&mut self, x: f64, y: f64) {
        self.pos = [x, y];
    }

    /// The most recent position in the configured units.
    pub fn sample(&self) -> [f32; 2] {
        match self.units {
            PointerUnits::Pixels => [self.pos[0] as f32, self.pos[1] as f32],
            PointerUnits::Normalized => [
                (self.pos[0] / self.window[0]).clamp(0.0, 1.0) as f32,
                (self.pos[1] / self.window[1]).clamp(0.0, 1.0) as f32,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_event_wins() {
        let mut t = PointerTracker::new(PointerUnits::Pixels, 800, 600);
        t.update(10.0, 20.0);
        t.update(30.0, 40.0);
        t.update(50.0, 60.0);
        assert_eq!(t.sample(), [50.0, 60.0]);
    }

    #[test]
    fn normalized_divides_by_window_size() {
        let mut t = PointerTracker::new(PointerUnits::Normalized, 800, 600);
        t.update(400.0, 150.0);
        assert_eq!(t.sample(), [0.5, 0.25]);
    }

    #[test]
    fn normalized_clamps_outside_the_window() {
        let mut t = PointerTracker::new(PointerUnits::Normalized, 800, 600);
        t.update(-5.0, 9000.0);
        assert_eq!(t.sample(), [0.0, 1.0]);
    }

    #[test]
    fn resize_changes_normalization() {
        let mut t = PointerTracker::new(PointerUnits::Normalized, 800, 600);
        t.update(400.0, 300.0);
        assert_eq!(t.sample(), [0.5, 0.5]);
        t.set_window_size(1600, 1200);
        assert_eq!(t.sample(), [0.25, 0.25]);
    }

    #[test]
    fn pixels_pass_through_unscaled() {
        let mut t = PointerTracker::new(PointerUnits::Pixels, 800, 600);
        t.update(123.0, 456.0);
        assert_eq!(t.sample(), [123.0, 456.0]);
    }
}
