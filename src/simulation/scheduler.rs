//! Fixed-tick scheduling: decouples simulation rate from render rate.
//!
//! Two deadlines share one thread. Ticks fire at a fixed cadence and catch up
//! without skipping when the loop falls behind; frames fire at their own
//! cadence and carry an interpolation fraction describing how far between
//! ticks the frame falls. The scheduler is a pure function of supplied
//! millisecond timestamps, so callers may busy-poll, sleep to
//! [`TickScheduler::next_deadline`], or drive it from synthetic clocks in
//! tests. The deadline arithmetic is identical either way.

use crate::core::config::EngineConfig;

/// Deadline state for the tick/frame loop.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    ms_per_tick: u64,
    ms_per_frame: u64,
    next_tick_at: u64,
    last_frame_at: u64,
}

impl TickScheduler {
    /// Starts the clocks at `now_ms`.
    pub fn new(config: &EngineConfig, now_ms: u64) -> Self {
        Self {
            ms_per_tick: config.ms_per_tick as u64,
            ms_per_frame: config.ms_per_frame() as u64,
            next_tick_at: now_ms + config.ms_per_tick as u64,
            last_frame_at: now_ms,
        }
    }

    /// Number of simulation ticks due at `now_ms`.
    ///
    /// Advances the tick deadline once per due tick, so an overrun loop runs
    /// the missed ticks instead of skipping them. Over any interval this
    /// yields exactly `elapsed / ms_per_tick` ticks (integer division),
    /// independent of how often it is polled.
    pub fn due_ticks(&mut self, now_ms: u64) -> u32 {
        let mut ticks = 0;
        while now_ms >= self.next_tick_at {
            self.next_tick_at += self.ms_per_tick;
            ticks += 1;
        }
        ticks
    }

    /// If a frame is due at `now_ms`, marks it rendered and returns the
    /// interpolation fraction for it.
    pub fn frame_due(&mut self, now_ms: u64) -> Option<f64> {
        if now_ms - self.last_frame_at >= self.ms_per_frame {
            self.last_frame_at = now_ms;
            Some(self.interpolation(now_ms))
        } else {
            None
        }
    }

    /// Progress between the last tick and the next, for pose prediction.
    ///
    /// After `due_ticks` has caught up, `now < next_tick_at <= now + tick`,
    /// so the fraction lands in `[0, 1)`; polling exactly on a tick boundary
    /// reads 0.
    pub fn interpolation(&self, now_ms: u64) -> f64 {
        (now_ms + self.ms_per_tick - self.next_tick_at) as f64 / self.ms_per_tick as f64
    }

    /// The earliest future instant at which anything becomes due. Callers
    /// that sleep instead of spinning wait until this.
    pub fn next_deadline(&self) -> u64 {
        self.next_tick_at.min(self.last_frame_at + self.ms_per_frame)
    }

    /// Adopts new cadences. Existing deadlines are preserved so a settings
    /// change mid-run cannot drop or duplicate a tick.
    pub fn apply_config(&mut self, config: &EngineConfig) {
        self.ms_per_tick = config.ms_per_tick as u64;
        self.ms_per_frame = config.ms_per_frame() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(ms_per_tick: i32, max_fps: i32) -> TickScheduler {
        let mut config = EngineConfig::default();
        config.ms_per_tick = ms_per_tick;
        config.max_fps = max_fps;
        TickScheduler::new(&config, 0)
    }

    #[test]
    fn test_tick_count_matches_elapsed_time() {
        // floor(elapsed / MS_PER_TICK) ticks regardless of poll cadence.
        let mut fine = scheduler(25, 100);
        let mut total = 0;
        for now in (0..=1000).step_by(7) {
            total += fine.due_ticks(now);
        }
        assert_eq!(total + fine.due_ticks(1000), 1000 / 25);

        let mut coarse = scheduler(25, 100);
        assert_eq!(coarse.due_ticks(1000), 1000 / 25);
    }

    #[test]
    fn test_overrun_catches_up_without_skipping() {
        let mut sched = scheduler(25, 100);
        assert_eq!(sched.due_ticks(24), 0);
        // A long stall: all missed ticks are reported at once.
        assert_eq!(sched.due_ticks(250), 10);
        assert_eq!(sched.due_ticks(251), 0);
        assert_eq!(sched.due_ticks(275), 1);
    }

    #[test]
    fn test_frame_cadence_independent_of_ticks() {
        let mut sched = scheduler(25, 100); // 10 ms per frame
        assert!(sched.frame_due(5).is_none());
        assert!(sched.frame_due(10).is_some());
        assert!(sched.frame_due(15).is_none());
        assert!(sched.frame_due(20).is_some());
        // No ticks were consumed by frames.
        assert_eq!(sched.due_ticks(100), 4);
    }

    #[test]
    fn test_interpolation_fraction_range() {
        let mut sched = scheduler(25, 100);
        sched.due_ticks(30); // next tick at 50
        let t = sched.interpolation(30);
        assert!((t - 5.0 / 25.0).abs() < 1e-12);
        for now in 30..50 {
            sched.due_ticks(now);
            let t = sched.interpolation(now);
            assert!(t > 0.0 && t < 1.0);
        }
        // Exactly on a tick boundary the fraction restarts at zero.
        sched.due_ticks(50);
        assert_eq!(sched.interpolation(50), 0.0);
    }

    #[test]
    fn test_next_deadline_is_nearest_clock() {
        let mut sched = scheduler(25, 100);
        // Frame at 10 comes before tick at 25.
        assert_eq!(sched.next_deadline(), 10);
        sched.frame_due(10);
        assert_eq!(sched.next_deadline(), 20);
        sched.frame_due(20);
        sched.frame_due(24);
        assert_eq!(sched.next_deadline(), 25);
    }
}
