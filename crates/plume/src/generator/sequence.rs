use crate::RawSnowflake;
use core::cmp::Ordering;

/// Why [`SequenceCounter::next`] could not hand out a sequence value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SequenceError {
    /// All 4096 values for `timestamp` are used; retry in the next
    /// millisecond.
    #[error("sequence exhausted for millisecond {timestamp}")]
    Exhausted { timestamp: u64 },

    /// `now` is earlier than the last timestamp the counter handed out.
    #[error("clock regression from {last} to {now}")]
    ClockRegression { last: u64, now: u64 },
}

/// Per-millisecond sequence state of one generator.
///
/// The counter must be owned by exactly one generator: uniqueness rests on a
/// single writer controlling the (worker, process, sequence) space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SequenceCounter {
    last_timestamp: Option<u64>,
    sequence: u16,
}

impl SequenceCounter {
    /// A counter that has not handed out any value yet.
    pub const fn new() -> Self {
        Self {
            last_timestamp: None,
            sequence: 0,
        }
    }

    /// Restores a counter that last handed out `sequence` at
    /// `last_timestamp`, e.g. from persisted state after a restart.
    ///
    /// Sequences above [`RawSnowflake::MAX_SEQUENCE`] are clamped to it,
    /// leaving the millisecond exhausted.
    pub const fn resume(last_timestamp: u64, sequence: u16) -> Self {
        let sequence = if sequence > RawSnowflake::MAX_SEQUENCE {
            RawSnowflake::MAX_SEQUENCE
        } else {
            sequence
        };
        Self {
            last_timestamp: Some(last_timestamp),
            sequence,
        }
    }

    /// The newest timestamp a value was handed out for.
    pub const fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// The last sequence value handed out.
    pub const fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Returns the sequence value to encode alongside `now`.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::Exhausted`] once all values for `now` are used.
    ///   The counter stays exhausted until it sees a later timestamp.
    /// - [`SequenceError::ClockRegression`] if `now` is earlier than the last
    ///   timestamp. The state is left untouched.
    pub fn next(&mut self, now: u64) -> Result<u16, SequenceError> {
        let Some(last) = self.last_timestamp else {
            return Ok(self.rollover(now));
        };

        match now.cmp(&last) {
            Ordering::Greater => Ok(self.rollover(now)),
            Ordering::Equal => {
                if self.sequence < RawSnowflake::MAX_SEQUENCE {
                    self.sequence += 1;
                    Ok(self.sequence)
                } else {
                    Err(SequenceError::Exhausted { timestamp: now })
                }
            }
            Ordering::Less => Err(SequenceError::ClockRegression { last, now }),
        }
    }

    fn rollover(&mut self, now: u64) -> u16 {
        self.last_timestamp = Some(now);
        self.sequence = 0;
        0
    }
}
