use rand::Rng;
use std::time::Duration;

/// Largest fraction of the nominal delay added as jitter.
pub const JITTER_FRACTION: f64 = 0.2;

/// Capped exponential backoff, optionally jittered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Add up to `JITTER_FRACTION` of the nominal delay at random.
    pub jitter: bool,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Fixed delay with no growth and no jitter (mostly for tests).
    pub fn constant(delay: Duration) -> Self {
        Self {
            base_delay: delay,
            max_delay: delay,
            jitter: false,
        }
    }

    /// Un-jittered delay after failed attempt `attempt` (1-based):
    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        match 2u32.checked_pow(attempt.saturating_sub(1)) {
            Some(exp) => self.base_delay.saturating_mul(exp).min(self.max_delay),
            None => self.max_delay,
        }
    }

    /// Delay to wait after failed attempt `attempt`, with jitter applied.
    pub fn delay(&self, attempt: u32) -> Duration {
        let nominal = self.nominal_delay(attempt);
        if !self.jitter || nominal.is_zero() {
            return nominal;
        }
        let extra = rand::thread_rng().gen_range(0.0..=JITTER_FRACTION);
        nominal.saturating_add(nominal.mul_f64(extra)).min(self.max_delay)
    }
}
