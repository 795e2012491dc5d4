/// A result type defaulting to the generator's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by [`SnowflakeGenerator`].
///
/// Sequence exhaustion is not an error: the generator waits for the next
/// millisecond internally. What remains are conditions under which handing
/// out an ID would break uniqueness or ordering.
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reported a time earlier than the last issued timestamp by
    /// more than the configured tolerance.
    ///
    /// The caller decides whether to abort or to pause until real time
    /// catches up with `last_millis`.
    #[error(
        "clock moved backwards by {}ms (last = {last_millis}, now = {now_millis})",
        last_millis.saturating_sub(*now_millis)
    )]
    ClockRegression {
        /// The newest timestamp already used by this generator.
        last_millis: u64,
        /// The regressed clock reading.
        now_millis: u64,
    },

    /// The clock is past the largest timestamp the 42-bit field can carry.
    #[error("timestamp {millis} does not fit the snowflake layout")]
    TimestampOverflow { millis: u64 },

    /// The generator did not become ready within its configured wait
    /// timeout, e.g. because the clock stopped advancing.
    #[error("timed out waiting for the clock to reach {yield_until}")]
    WaitTimeout { yield_until: u64 },
}
