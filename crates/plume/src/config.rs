use crate::{ProcessId, WorkerId};
use core::time::Duration;

/// Construction-time settings of a [`SnowflakeGenerator`].
///
/// The `(worker_id, process_id)` pair must be unique across every generator
/// that mints into the same ID space. Assigning it is an operational concern;
/// the generator trusts what it is given.
///
/// With the `serde` feature the config can be embedded in a collaborator's
/// config file. Durations are written as whole milliseconds:
///
/// ```
/// # #[cfg(feature = "serde")] {
/// use plume::GeneratorConfig;
///
/// let config: GeneratorConfig =
///     serde_json::from_str(r#"{ "worker_id": 3, "max_clock_skew": 10 }"#).unwrap();
/// assert_eq!(config.worker_id.get(), 3);
/// assert_eq!(config.max_clock_skew.as_millis(), 10);
/// # }
/// ```
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GeneratorConfig {
    pub worker_id: WorkerId,
    pub process_id: ProcessId,
    /// How far the clock may step backwards before generation fails with
    /// [`Error::ClockRegression`] instead of waiting for it to catch up.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub max_clock_skew: Duration,
    /// Upper bound on the time a single blocking or async generation call
    /// spends waiting for the clock. Never shorter than
    /// [`Self::MIN_WAIT_TIMEOUT`] once it reaches a generator.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "millis::wait_timeout"))]
    pub wait_timeout: Duration,
}

impl GeneratorConfig {
    pub const DEFAULT_MAX_CLOCK_SKEW: Duration = Duration::from_millis(5);
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);
    /// Floor for `wait_timeout`. Shorter values are raised to it so that
    /// sequence exhaustion is always waited out.
    pub const MIN_WAIT_TIMEOUT: Duration = Duration::from_millis(1);

    pub const fn new(worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self {
            worker_id,
            process_id,
            max_clock_skew: Self::DEFAULT_MAX_CLOCK_SKEW,
            wait_timeout: Self::DEFAULT_WAIT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_worker_id(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = worker_id;
        self
    }

    #[must_use]
    pub const fn with_process_id(mut self, process_id: ProcessId) -> Self {
        self.process_id = process_id;
        self
    }

    #[must_use]
    pub const fn with_max_clock_skew(mut self, max_clock_skew: Duration) -> Self {
        self.max_clock_skew = max_clock_skew;
        self
    }

    #[must_use]
    pub const fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = clamp_wait_timeout(wait_timeout);
        self
    }
}

pub(crate) const fn clamp_wait_timeout(wait_timeout: Duration) -> Duration {
    if wait_timeout.as_nanos() < GeneratorConfig::MIN_WAIT_TIMEOUT.as_nanos() {
        GeneratorConfig::MIN_WAIT_TIMEOUT
    } else {
        wait_timeout
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(WorkerId::default(), ProcessId::default())
    }
}

#[cfg(feature = "serde")]
mod millis {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(Duration::from_millis)
    }

    pub fn wait_timeout<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(d).map(super::clamp_wait_timeout)
    }
}
