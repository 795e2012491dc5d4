use crate::RawSnowflake;

/// Outcome of one [`SnowflakeGenerator::try_poll`] attempt.
///
/// `Pending` is not a failure: the caller backs off until the clock reads
/// `yield_until` and polls again, which is what
/// [`SnowflakeGenerator::generate`] does.
///
/// [`SnowflakeGenerator::try_poll`]: crate::SnowflakeGenerator::try_poll
/// [`SnowflakeGenerator::generate`]: crate::SnowflakeGenerator::generate
///
/// # Example
///
/// ```
/// use plume::{IdGenStatus, ProcessId, SnowflakeGenerator, TimeSource, WorkerId};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator =
///     SnowflakeGenerator::from_components(WorkerId::default(), ProcessId::default(), FixedTime);
/// match generator.try_poll().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {}", id.timestamp()),
///     IdGenStatus::Pending { yield_until } => println!("Back off until: {yield_until}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: RawSnowflake,
    },
    /// No ID could be generated at the current clock reading.
    ///
    /// Wait until the clock reaches or exceeds `yield_until` before trying
    /// again.
    Pending {
        /// The timestamp (inclusive, in ms since the epoch) at which
        /// generation may resume.
        yield_until: u64,
    },
}
