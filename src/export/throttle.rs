//! Minimum spacing between paced remote operations.
//!
//! One [`Throttler`] is shared by the whole traversal. It is applied once per
//! folder child before that child is dispatched, so no two dispatches happen
//! closer together than the configured interval, whichever folder they
//! belong to.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use quip_export_core::export::Throttler;
//!
//! # async fn example() {
//! let throttler = Throttler::new(Duration::from_millis(500));
//! throttler.before_call().await; // immediate
//! throttler.before_call().await; // waits ~500ms
//! # }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, trace, warn};

use super::constants::DEFAULT_THROTTLE_INTERVAL;

/// Cumulative wait after which a single warning is logged (5 minutes).
const CUMULATIVE_DELAY_WARNING_THRESHOLD: Duration = Duration::from_secs(300);

const LONG_THROTTLE_WARNING: &str =
    "export has spent a long time throttled; a shorter throttle interval would speed it up";

/// Global minimum-interval gate.
///
/// `Send + Sync`; wrap in `Arc` to share. The last-call timestamp sits behind
/// a `tokio::sync::Mutex`, so concurrent callers are serialized and each one
/// observes the timestamp left by the previous caller.
#[derive(Debug)]
pub struct Throttler {
    interval: Duration,
    disabled: bool,
    /// `None` until the first call returns.
    last_call: Mutex<Option<Instant>>,
    cumulative_delay_ms: AtomicU64,
    warned: AtomicBool,
}

impl Default for Throttler {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}

impl Throttler {
    /// Creates a throttler with the given minimum interval.
    ///
    /// A zero interval is equivalent to [`Throttler::disabled`].
    #[must_use]
    #[instrument(skip_all, fields(interval_ms = interval.as_millis()))]
    pub fn new(interval: Duration) -> Self {
        debug!("creating throttler");
        Self {
            interval,
            disabled: interval.is_zero(),
            last_call: Mutex::new(None),
            cumulative_delay_ms: AtomicU64::new(0),
            warned: AtomicBool::new(false),
        }
    }

    /// Creates a throttler that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            interval: Duration::ZERO,
            disabled: true,
            last_call: Mutex::new(None),
            cumulative_delay_ms: AtomicU64::new(0),
            warned: AtomicBool::new(false),
        }
    }

    /// Returns whether throttling is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Total time spent waiting so far.
    #[must_use]
    pub fn cumulative_delay(&self) -> Duration {
        Duration::from_millis(self.cumulative_delay_ms.load(Ordering::SeqCst))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_cumulative_delay(&self, delay: Duration) -> Duration {
        let added = delay.as_millis() as u64;
        let previous = self.cumulative_delay_ms.fetch_add(added, Ordering::SeqCst);
        Duration::from_millis(previous + added)
    }

    /// Waits until `interval` has elapsed since the previous call returned.
    ///
    /// The first call returns immediately.
    pub async fn before_call(&self) {
        if self.disabled {
            return;
        }

        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                let delay = self.interval.saturating_sub(elapsed);
                let cumulative = self.add_cumulative_delay(delay);
                trace!(
                    delay_ms = delay.as_millis(),
                    cumulative_ms = cumulative.as_millis(),
                    "throttling"
                );
                if cumulative >= CUMULATIVE_DELAY_WARNING_THRESHOLD
                    && !self.warned.swap(true, Ordering::SeqCst)
                {
                    warn!(
                        cumulative_delay_secs = cumulative.as_secs(),
                        interval_ms = self.interval.as_millis(),
                        "{LONG_THROTTLE_WARNING}"
                    );
                }
                tokio::time::sleep(delay).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
