//! Frame pacing and the sketch clock.

use std::time::{Duration, Instant};

/// Admits frames no closer together than the target interval.
///
/// The host arms the pacer when a frame starts and sleeps (WaitUntil) until
/// the returned deadline; scheduler jitter can only stretch the gap, never
/// shrink it below `1/fps`.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            next_deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// May a frame start at `now`? Always true before the first frame.
    pub fn frame_due(&self, now: Instant) -> bool {
        match self.next_deadline {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    /// Record a frame starting at `now`; returns the earliest start of the next.
    pub fn arm(&mut self, now: Instant) -> Instant {
        let deadline = now + self.interval;
        self.next_deadline = Some(deadline);
        deadline
    }

    /// The deadline set by the last [`arm`](Self::arm), if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    /// Admit a frame at `now` if one is due, arming the next deadline.
    ///
    /// Redraw events the pacer did not ask for (resize drags, OS expose
    /// redraws) also land here; returning `None` keeps them from running
    /// the frame callback early.
    pub fn try_admit(&mut self, now: Instant) -> Option<Instant> {
        if self.frame_due(now) {
            Some(self.arm(now))
        } else {
            None
        }
    }
}

/// Wall-clock seconds since the loop started.
#[derive(Debug)]
pub struct SketchClock {
    start: Instant,
}

impl SketchClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_always_due() {
        let pacer = FramePacer::new(60);
        assert!(pacer.frame_due(Instant::now()));
    }

    #[test]
    fn frames_are_spaced_at_least_one_interval_apart() {
        let mut pacer = FramePacer::new(60);
        let t0 = Instant::now();
        let deadline = pacer.arm(t0);

        assert_eq!(deadline - t0, pacer.interval());
        assert!(!pacer.frame_due(t0));
        assert!(!pacer.frame_due(t0 + pacer.interval() / 2));
        assert!(pacer.frame_due(deadline));
        assert!(pacer.frame_due(deadline + Duration::from_millis(5)));
    }

    #[test]
    fn sixty_fps_never_admits_closer_than_16ms() {
        let mut pacer = FramePacer::new(60);
        let mut now = Instant::now();
        let mut last_start = None;

        // Simulate a jittery scheduler polling every 3ms for ~30 frames.
        for _ in 0..700 {
            if pacer.frame_due(now) {
                if let Some(prev) = last_start {
                    let gap: Duration = now - prev;
                    assert!(
                        gap >= Duration::from_micros(16_666),
                        "frames {gap:?} apart"
                    );
                }
                last_start = Some(now);
                pacer.arm(now);
            }
            now += Duration::from_millis(3);
        }
        assert!(last_start.is_some());
    }

    #[test]
    fn resize_storm_redraws_are_rejected_until_the_deadline() {
        // A resize drag can deliver redraw events every couple of
        // milliseconds; only the ones landing on or after the armed
        // deadline may run the frame callback.
        let mut pacer = FramePacer::new(60);
        let mut now = Instant::now();
        let mut last_admitted = None;

        for _ in 0..200 {
            if let Some(_deadline) = pacer.try_admit(now) {
                if let Some(prev) = last_admitted {
                    let gap: Duration = now - prev;
                    assert!(
                        gap >= Duration::from_micros(16_666),
                        "admitted frames {gap:?} apart"
                    );
                }
                last_admitted = Some(now);
            }
            now += Duration::from_millis(2);
        }

        assert!(last_admitted.is_some());
    }

    #[test]
    fn two_redraws_in_quick_succession_admit_only_one_frame() {
        let mut pacer = FramePacer::new(60);
        let t0 = Instant::now();

        assert!(pacer.try_admit(t0).is_some());
        assert!(pacer.try_admit(t0 + Duration::from_millis(2)).is_none());
        assert!(pacer.try_admit(t0 + pacer.interval()).is_some());
    }

    #[test]
    fn zero_fps_is_clamped_to_one() {
        let pacer = FramePacer::new(0);
        assert_eq!(pacer.interval(), Duration::from_secs(1));
    }
}
