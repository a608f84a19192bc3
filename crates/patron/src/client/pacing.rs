//! Randomized delays between client-streamed sends.
//!
//! Pacing only simulates a patron taking their time between orders. It has no
//! bearing on correctness: a zero range disables it entirely.

use core::{fmt, str::FromStr, time::Duration};
use patron_core::Error;
use rand::Rng;

/// Default delay range between single orders of a client-streamed call.
pub const STAGED_PACING: Pacing = Pacing::from_millis(500, 1500);

/// Default delay range between carts of a bidirectional call.
pub const INTERACTIVE_PACING: Pacing = Pacing::from_millis(500, 4000);

/// Inclusive range of milliseconds to wait before each send after the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    min_ms: u64,
    max_ms: u64,
}

impl Pacing {
    /// Creates a pacing range. Callers must uphold `min_ms <= max_ms`; use
    /// [`Pacing::new`] for unchecked input.
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn new(min_ms: u64, max_ms: u64) -> patron_core::Result<Self> {
        if min_ms > max_ms {
            return Err(Error::InvalidRequest {
                reason: format!("pacing minimum ({min_ms} ms) exceeds maximum ({max_ms} ms)"),
            });
        }
        Ok(Self::from_millis(min_ms, max_ms))
    }

    /// No delay at all.
    pub const fn none() -> Self {
        Self::from_millis(0, 0)
    }

    pub fn is_none(&self) -> bool {
        self.max_ms == 0
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Picks a delay uniformly from the range.
    pub fn sample(&self) -> Duration {
        if self.min_ms >= self.max_ms {
            return self.min();
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }

    /// Sleeps for a sampled delay.
    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis() as u64, "pacing");
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min_ms == self.max_ms {
            write!(f, "{}", self.min_ms)
        } else {
            write!(f, "{}-{}", self.min_ms, self.max_ms)
        }
    }
}

/// Parses `"500-1500"` (a range), `"250"` (a fixed delay) or `"0"` (none), all
/// in milliseconds.
impl FromStr for Pacing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |raw: &str| {
            raw.trim().parse::<u64>().map_err(|e| Error::InvalidRequest {
                reason: format!("invalid pacing `{s}`: {e}"),
            })
        };

        match s.split_once('-') {
            Some((min, max)) => Self::new(parse(min)?, parse(max)?),
            None => {
                let fixed = parse(s)?;
                Ok(Self::from_millis(fixed, fixed))
            }
        }
    }
}
