use core::fmt;

/// A Snowflake field value was outside the range its bit width allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{field} {value} is out of range (max = {max})")]
pub struct PartOutOfRange {
    /// Name of the field that was rejected.
    pub field: &'static str,
    /// The rejected value.
    pub value: u64,
    /// The largest value the field can hold.
    pub max: u64,
}

macro_rules! snowflake_part {
    ($(#[$meta:meta])* $name:ident, $field:literal, $bits:expr) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        pub struct $name(u8);

        impl $name {
            /// Number of bits this field occupies in a [`RawSnowflake`].
            ///
            /// [`RawSnowflake`]: crate::RawSnowflake
            pub const BITS: u32 = $bits;

            /// Largest representable value.
            pub const MAX: u8 = (1 << $bits) - 1;

            /// Returns `None` if `value` does not fit in the field.
            pub const fn new(value: u8) -> Option<Self> {
                if value <= Self::MAX {
                    Some(Self(value))
                } else {
                    None
                }
            }

            /// Keeps only the low bits of `value` that fit in the field.
            pub(crate) const fn from_masked(value: u64) -> Self {
                Self((value & Self::MAX as u64) as u8)
            }

            pub const fn get(self) -> u8 {
                self.0
            }
        }

        impl TryFrom<u8> for $name {
            type Error = PartOutOfRange;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(PartOutOfRange {
                    field: $field,
                    value: u64::from(value),
                    max: u64::from(Self::MAX),
                })
            }
        }

        impl TryFrom<u64> for $name {
            type Error = PartOutOfRange;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                u8::try_from(value)
                    .ok()
                    .and_then(Self::new)
                    .ok_or(PartOutOfRange {
                        field: $field,
                        value,
                        max: u64::from(Self::MAX),
                    })
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

snowflake_part!(
    /// Logical worker slot (0-31) of the process that minted an ID.
    WorkerId,
    "worker_id",
    5
);

snowflake_part!(
    /// Process slot (0-31) within a worker.
    ProcessId,
    "process_id",
    5
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_values_up_to_max() {
        assert_eq!(WorkerId::new(0).map(WorkerId::get), Some(0));
        assert_eq!(WorkerId::new(31).map(WorkerId::get), Some(31));
        assert_eq!(ProcessId::new(31).map(ProcessId::get), Some(31));
    }

    #[test]
    fn rejects_values_past_max() {
        assert_eq!(WorkerId::new(32), None);
        let err = ProcessId::try_from(200_u64).unwrap_err();
        assert_eq!(err.field, "process_id");
        assert_eq!(err.value, 200);
        assert_eq!(err.max, 31);
        assert_eq!(err.to_string(), "process_id 200 is out of range (max = 31)");
    }

    #[test]
    fn rejects_values_wider_than_u8() {
        let err = WorkerId::try_from(1_000_u64).unwrap_err();
        assert_eq!(err.value, 1_000);
    }
}
