use crate::{ProcessId, WorkerId};
use chrono::{DateTime, Utc};
use core::{fmt, str::FromStr, time::Duration};

/// A 64-bit Snowflake ID using the plume layout.
///
/// - 42 bits timestamp (ms since [`PLUME_EPOCH`])
/// - 5 bits worker ID
/// - 5 bits process ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21           17 16            12 11             0
///              +----------------+---------------+----------------+---------------+
///  Field:      | timestamp (42) | worker ID (5) | process ID (5) | sequence (12) |
///              +----------------+---------------+----------------+---------------+
///              |<------------ MSB ------------- 64 bits ------------ LSB ------->|
/// ```
///
/// The four fields cover all 64 bits, so every `u64` is a valid
/// `RawSnowflake` and decoding never fails. Ordering by the raw value is
/// ordering by mint time.
///
/// The textual form is the decimal value, which keeps IDs exact for clients
/// whose numbers are IEEE doubles.
///
/// [`PLUME_EPOCH`]: crate::PLUME_EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct RawSnowflake {
    id: u64,
}

/// The decoded fields of a [`RawSnowflake`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct SnowflakeParts {
    /// Milliseconds since the epoch; only the low 42 bits are encoded.
    pub timestamp: u64,
    pub worker_id: WorkerId,
    pub process_id: ProcessId,
    /// Intra-millisecond counter; only the low 12 bits are encoded.
    pub sequence: u16,
}

impl RawSnowflake {
    /// Bitmask for the 42-bit timestamp field (after shifting).
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for the 5-bit worker ID field (after shifting).
    pub const WORKER_ID_MASK: u64 = (1 << WorkerId::BITS) - 1;

    /// Bitmask for the 5-bit process ID field (after shifting).
    pub const PROCESS_ID_MASK: u64 = (1 << ProcessId::BITS) - 1;

    /// Bitmask for the 12-bit sequence field.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = 22;

    /// Number of bits to shift the worker ID to its position (bit 17).
    pub const WORKER_ID_SHIFT: u32 = 17;

    /// Number of bits to shift the process ID to its position (bit 12).
    pub const PROCESS_ID_SHIFT: u32 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Largest timestamp the layout can carry.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest sequence value within one millisecond.
    pub const MAX_SEQUENCE: u16 = Self::SEQUENCE_MASK as u16;

    /// Wraps a previously minted raw value.
    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    /// Returns the underlying integer.
    pub const fn to_raw(self) -> u64 {
        self.id
    }

    /// Packs the fields into an ID.
    ///
    /// Out-of-range `timestamp` and `sequence` values are masked to their low
    /// bits so that a bad value can never bleed into a neighbouring field.
    pub const fn from_parts(
        timestamp: u64,
        worker_id: WorkerId,
        process_id: ProcessId,
        sequence: u16,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id.get() as u64 & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let process_id =
            (process_id.get() as u64 & Self::PROCESS_ID_MASK) << Self::PROCESS_ID_SHIFT;
        let sequence = (sequence as u64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | process_id | sequence,
        }
    }

    /// Extracts the timestamp (ms since the epoch).
    pub const fn timestamp(self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker_id(self) -> WorkerId {
        WorkerId::from_masked(self.id >> Self::WORKER_ID_SHIFT)
    }

    /// Extracts the process ID.
    pub const fn process_id(self) -> ProcessId {
        ProcessId::from_masked(self.id >> Self::PROCESS_ID_SHIFT)
    }

    /// Extracts the sequence number.
    pub const fn sequence(self) -> u16 {
        ((self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u16
    }

    /// Decodes all four fields.
    pub const fn into_parts(self) -> SnowflakeParts {
        SnowflakeParts {
            timestamp: self.timestamp(),
            worker_id: self.worker_id(),
            process_id: self.process_id(),
            sequence: self.sequence(),
        }
    }

    /// The UTC instant encoded in the timestamp, given the epoch the ID was
    /// minted against.
    ///
    /// Returns `None` only if the instant is not representable by `chrono`.
    pub fn created_at(self, epoch: Duration) -> Option<DateTime<Utc>> {
        let unix_millis = epoch.as_millis().checked_add(u128::from(self.timestamp()))?;
        DateTime::from_timestamp_millis(i64::try_from(unix_millis).ok()?)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(self) -> String {
        format!("{:020}", self.id)
    }
}

impl SnowflakeParts {
    /// Re-encodes the fields. Equivalent to [`RawSnowflake::from_parts`].
    pub const fn encode(self) -> RawSnowflake {
        RawSnowflake::from_parts(
            self.timestamp,
            self.worker_id,
            self.process_id,
            self.sequence,
        )
    }
}

impl From<SnowflakeParts> for RawSnowflake {
    fn from(parts: SnowflakeParts) -> Self {
        parts.encode()
    }
}

impl From<RawSnowflake> for SnowflakeParts {
    fn from(id: RawSnowflake) -> Self {
        id.into_parts()
    }
}

impl From<u64> for RawSnowflake {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl From<RawSnowflake> for u64 {
    fn from(id: RawSnowflake) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for RawSnowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl fmt::Debug for RawSnowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSnowflake")
            .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id().get())
            .field("process_id", &self.process_id().get())
            .field("sequence", &self.sequence())
            .finish()
    }
}

/// Text that is not the decimal form of a 64-bit unsigned integer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid snowflake {input:?}: expected a decimal 64-bit unsigned integer")]
pub struct ParseSnowflakeError {
    input: String,
}

impl ParseSnowflakeError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for RawSnowflake {
    type Err = ParseSnowflakeError;

    /// Parses the decimal form. Signs, whitespace and other radixes are
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSnowflakeError {
            input: s.to_owned(),
        };
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u64>().map(Self::from_raw).map_err(|_| invalid())
    }
}
