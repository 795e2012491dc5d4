use core::time::Duration;
use std::sync::Arc;

/// Plume epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const PLUME_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// A source of milliseconds since a fixed custom epoch.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests. Implementations are not required to be strictly
/// monotonic: a clock that steps backwards is detected and handled by the
/// [`SnowflakeGenerator`], not by the clock itself.
///
/// # Example
///
/// ```
/// use plume::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
