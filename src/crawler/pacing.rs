//! Request pacing
//!
//! Every wait in a crawl goes through a `Pacer`, named by the reason for the
//! wait. The production pacer sleeps for a duration drawn from the configured
//! policy; tests substitute a pacer that only records the calls.

use crate::config::{CrawlerSettings, DelayRange};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Reason for a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pause {
    /// After navigating to a target, before the first scrape
    InitialLoad,

    /// After activating the next-page control, before scraping the new page
    PageSettle,

    /// Between two targets
    BetweenTargets,
}

/// Wait durations for each kind of pause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayPolicy {
    pub initial_load: Duration,
    pub page_settle: DelayRange,
    pub between_targets: DelayRange,
}

impl DelayPolicy {
    pub fn from_settings(settings: &CrawlerSettings) -> Self {
        Self {
            initial_load: Duration::from_millis(settings.initial_load_ms),
            page_settle: settings.page_settle_ms,
            between_targets: settings.between_targets_ms,
        }
    }

    /// Picks the wait for `pause`
    ///
    /// The initial load wait is fixed; the others are drawn uniformly from
    /// their inclusive ranges.
    pub fn duration_for<R: Rng + ?Sized>(&self, pause: Pause, rng: &mut R) -> Duration {
        match pause {
            Pause::InitialLoad => self.initial_load,
            Pause::PageSettle => sample(&self.page_settle, rng),
            Pause::BetweenTargets => sample(&self.between_targets, rng),
        }
    }
}

fn sample<R: Rng + ?Sized>(range: &DelayRange, rng: &mut R) -> Duration {
    if range.min >= range.max {
        return Duration::from_millis(range.min);
    }
    Duration::from_millis(rng.gen_range(range.min..=range.max))
}

/// Performs the waits of a crawl
#[async_trait(?Send)]
pub trait Pacer {
    async fn pause(&mut self, pause: Pause);
}

/// Pacer that sleeps on the tokio timer
pub struct SleepPacer {
    policy: DelayPolicy,
    rng: StdRng,
}

impl SleepPacer {
    pub fn new(policy: DelayPolicy) -> Self {
        Self {
            policy,
            rng: StdRng::from_entropy(),
        }
    }
}

#[async_trait(?Send)]
impl Pacer for SleepPacer {
    async fn pause(&mut self, pause: Pause) {
        let duration = self.policy.duration_for(pause, &mut self.rng);
        tracing::debug!("Waiting {:?} ({:?})", duration, pause);
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> DelayPolicy {
        DelayPolicy {
            initial_load: Duration::from_millis(15_000),
            page_settle: DelayRange::new(5_000, 9_000),
            between_targets: DelayRange::new(5_000, 17_000),
        }
    }

    #[test]
    fn test_initial_load_is_fixed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(
                policy().duration_for(Pause::InitialLoad, &mut rng),
                Duration::from_millis(15_000)
            );
        }
    }

    #[test]
    fn test_random_waits_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = policy();
        for _ in 0..200 {
            let settle = policy.duration_for(Pause::PageSettle, &mut rng);
            assert!(settle >= Duration::from_millis(5_000));
            assert!(settle <= Duration::from_millis(9_000));

            let between = policy.duration_for(Pause::BetweenTargets, &mut rng);
            assert!(between >= Duration::from_millis(5_000));
            assert!(between <= Duration::from_millis(17_000));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            sample(&DelayRange::zero(), &mut rng),
            Duration::from_millis(0)
        );
        assert_eq!(
            sample(&DelayRange::new(250, 250), &mut rng),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = CrawlerSettings::default();
        let policy = DelayPolicy::from_settings(&settings);
        assert_eq!(policy, self::policy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_pacer_sleeps_for_policy_duration() {
        let mut pacer = SleepPacer::new(policy());
        let start = tokio::time::Instant::now();
        pacer.pause(Pause::InitialLoad).await;
        assert!(start.elapsed() >= Duration::from_millis(15_000));
    }
}
