use crate::random::source::RandomSource;

/// Cooperative staggered-spawn timeline for a container.
///
/// Each spawn waits a randomly drawn delay in `[0, delay_max)`, then releases
/// exactly one unit. Reaching the cap simply ends the sequence; there are no
/// retries and no failure mode, and already-spawned units are unaffected.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    max_units: u32,
    delay_max: f64,
    spawned: u32,
    waited: f64,
    pending_delay: Option<f64>,
}

impl SpawnScheduler {
    /// Scheduler that will release up to `max_units` units.
    pub fn new(max_units: u32, delay_max: f64) -> Self {
        Self {
            max_units,
            delay_max,
            spawned: 0,
            waited: 0.0,
            pending_delay: None,
        }
    }

    /// Units spawned so far; monotone, terminal at the cap.
    pub fn spawn_cursor(&self) -> u32 {
        self.spawned
    }

    /// Whether the spawn sequence has finished.
    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.max_units
    }

    /// Advance by `dt` seconds and return how many units to spawn now.
    ///
    /// Loops within the tick, so a large `dt` (or forced-zero delays) can
    /// release several units at once, one per elapsed delay.
    pub fn advance(&mut self, dt: f64, rng: &mut dyn RandomSource) -> u32 {
        if self.is_exhausted() {
            return 0;
        }

        let mut budget = dt.max(0.0);
        let mut count = 0u32;
        loop {
            let delay = *self
                .pending_delay
                .get_or_insert_with(|| rng.next_f64() * self.delay_max);
            let remaining = (delay - self.waited).max(0.0);
            if budget < remaining {
                self.waited += budget;
                break;
            }
            budget -= remaining;
            self.waited = 0.0;
            self.pending_delay = None;
            self.spawned += 1;
            count += 1;
            tracing::debug!(cursor = self.spawned, "spawn interval elapsed");
            if self.is_exhausted() {
                break;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::source::SplitMix64;

    #[test]
    fn zero_delays_release_everything_at_once() {
        let mut rng = SplitMix64::new(1);
        let mut s = SpawnScheduler::new(20, 0.0);
        assert_eq!(s.advance(0.0, &mut rng), 20);
        assert_eq!(s.spawn_cursor(), 20);
        assert!(s.is_exhausted());
        // Later ticks stay inert.
        assert_eq!(s.advance(100.0, &mut rng), 0);
        assert_eq!(s.spawn_cursor(), 20);
    }

    #[test]
    fn cursor_never_exceeds_cap() {
        let mut rng = SplitMix64::new(2);
        let mut s = SpawnScheduler::new(5, 5.0);
        let mut total = 0;
        for _ in 0..100 {
            total += s.advance(1.0, &mut rng);
            assert!(s.spawn_cursor() <= 5);
        }
        assert_eq!(total, 5);
    }

    #[test]
    fn short_ticks_accumulate_toward_one_delay() {
        struct Fixed(f64);
        impl RandomSource for Fixed {
            fn next_f64(&mut self) -> f64 {
                self.0
            }
        }

        // Delay is fixed at 0.5 * 4.0 = 2.0 seconds.
        let mut rng = Fixed(0.5);
        let mut s = SpawnScheduler::new(2, 4.0);
        assert_eq!(s.advance(1.0, &mut rng), 0);
        assert_eq!(s.advance(0.5, &mut rng), 0);
        assert_eq!(s.advance(0.5, &mut rng), 1);
        assert_eq!(s.spawn_cursor(), 1);
        // The next delay starts counting only after the previous spawn.
        assert_eq!(s.advance(1.5, &mut rng), 0);
        assert_eq!(s.advance(0.5, &mut rng), 1);
        assert!(s.is_exhausted());
    }

    #[test]
    fn one_large_tick_spawns_several_units() {
        struct Fixed(f64);
        impl RandomSource for Fixed {
            fn next_f64(&mut self) -> f64 {
                self.0
            }
        }

        // Each delay is 1.0 s; a 3.5 s tick covers three of them.
        let mut rng = Fixed(0.25);
        let mut s = SpawnScheduler::new(10, 4.0);
        assert_eq!(s.advance(3.5, &mut rng), 3);
        assert_eq!(s.spawn_cursor(), 3);
    }
}
