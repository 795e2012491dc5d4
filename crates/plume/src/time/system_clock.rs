use crate::{PLUME_EPOCH, TimeSource};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source reporting milliseconds since a custom epoch.
///
/// Every call reads `SystemTime::now()`, so NTP steps and manual adjustments
/// are visible to the caller. That is intentional: the generator compares
/// each reading with the last timestamp it issued and refuses to mint IDs
/// when the clock has moved backwards past its tolerance.
///
/// A wall clock earlier than the epoch reads as `0` and, with the `tracing`
/// feature, logs a warning on every such read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    /// Constructs a clock aligned to [`PLUME_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(PLUME_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock using `epoch` (a [`Duration`] since 1970-01-01 UTC)
    /// as the origin (t = 0).
    ///
    /// # Example
    ///
    /// ```
    /// use plume::{SystemClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let plume = SystemClock::default();
    /// let twitter = SystemClock::with_epoch(TWITTER_EPOCH);
    ///
    /// // The Twitter epoch is older, so its clock reads larger values.
    /// assert!(twitter.current_millis() > plume.current_millis());
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The origin of this clock as a [`Duration`] since the UNIX epoch.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        let now = SystemTime::now();
        millis_since(now, self.epoch).unwrap_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                epoch_millis = self.epoch.as_millis() as u64,
                "system clock reads earlier than the snowflake epoch"
            );
            0
        })
    }
}

/// Milliseconds from `epoch` to `now`, or `None` if `now` is before it.
fn millis_since(now: SystemTime, epoch: Duration) -> Option<u64> {
    now.duration_since(UNIX_EPOCH)
        .ok()?
        .checked_sub(epoch)
        .map(|elapsed| elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DISCORD_EPOCH;

    #[test]
    fn reads_millis_since_epoch() {
        let clock = SystemClock::with_epoch(DISCORD_EPOCH);
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let expected = unix_millis - DISCORD_EPOCH.as_millis() as u64;

        let ts = clock.current_millis();
        assert!(ts >= expected);
        assert!(ts - expected < 1_000);
    }

    #[test]
    fn future_epoch_reads_zero() {
        let far_future = Duration::from_millis(u64::MAX / 2);
        let clock = SystemClock::with_epoch(far_future);
        assert_eq!(clock.current_millis(), 0);
    }

    #[test]
    fn time_before_epoch_is_detected() {
        let epoch = Duration::from_millis(1_000);
        assert_eq!(millis_since(UNIX_EPOCH + epoch, epoch), Some(0));
        assert_eq!(
            millis_since(UNIX_EPOCH + Duration::from_millis(1_250), epoch),
            Some(250)
        );
        assert_eq!(
            millis_since(UNIX_EPOCH + Duration::from_millis(999), epoch),
            None
        );
        assert_eq!(
            millis_since(UNIX_EPOCH - Duration::from_millis(1), Duration::ZERO),
            None
        );
    }

    #[test]
    fn shared_clock_reads_through_references() {
        let clock = std::sync::Arc::new(SystemClock::default());
        let borrowed = &*clock;
        assert!(clock.current_millis() <= borrowed.current_millis());
    }
}
