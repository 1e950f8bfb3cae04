//! Exponential backoff for polling an empty task source.

use crate::config::BackoffConfig;

/// Doubling delay sequence `base, 2*base, 4*base, ...` capped at `max`
///
/// [`Backoffs::reset`] restarts the sequence after a successful fetch.
#[derive(Debug, Clone)]
pub struct Backoffs {
    base: u64,
    max: u64,
    attempt: u32,
}

impl Backoffs {
    pub fn new(base_seconds: u64, max_seconds: u64) -> Self {
        let base = base_seconds.max(1);
        Self {
            base,
            max: max_seconds.max(base),
            attempt: 0,
        }
    }

    /// Next delay in seconds
    pub fn next_seconds(&mut self) -> u64 {
        let factor = 1u64.checked_shl(self.attempt).unwrap_or(u64::MAX);
        let delay = self.base.saturating_mul(factor).min(self.max);
        if delay < self.max {
            self.attempt += 1;
        }
        delay
    }

    /// Delay the next call would return, without advancing
    pub fn peek_seconds(&self) -> u64 {
        self.clone().next_seconds()
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

impl From<&BackoffConfig> for Backoffs {
    fn from(config: &BackoffConfig) -> Self {
        Self::new(config.base_seconds, config.max_seconds)
    }
}

impl Default for Backoffs {
    fn default() -> Self {
        Self::from(&BackoffConfig::default())
    }
}
