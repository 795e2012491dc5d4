use core::{fmt, str::FromStr};

use crate::{Id, Kind, KindTag, ParseSnowflakeError, RawSnowflake, UnknownKind};

/// An identifier whose kind is only known at runtime.
///
/// Used where the static kind is lost: command-line input, logs, generic
/// admin tooling. The text form is `<kind>:<decimal>`, e.g. `user:1234`.
///
/// ```
/// use plume::{AnyId, KindTag, PostMarker, UserMarker};
///
/// let any: AnyId = "user:1234".parse().unwrap();
/// assert_eq!(any.kind(), KindTag::User);
/// assert_eq!(any.downcast::<UserMarker>().unwrap().to_u64(), 1234);
/// assert!(any.downcast::<PostMarker>().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnyId {
    kind: KindTag,
    raw: RawSnowflake,
}

impl AnyId {
    pub const fn new(kind: KindTag, raw: RawSnowflake) -> Self {
        Self { kind, raw }
    }

    pub const fn kind(self) -> KindTag {
        self.kind
    }

    pub const fn raw(self) -> RawSnowflake {
        self.raw
    }

    /// Recovers the static kind.
    ///
    /// # Errors
    /// [`InvalidKindAssertion`] if the runtime tag is not `K`'s.
    pub fn downcast<K: Kind>(self) -> Result<Id<K>, InvalidKindAssertion> {
        if self.kind == K::TAG {
            Ok(Id::from_raw(self.raw))
        } else {
            Err(InvalidKindAssertion {
                expected: K::TAG,
                found: self.kind,
            })
        }
    }
}

impl<K: Kind> From<Id<K>> for AnyId {
    fn from(id: Id<K>) -> Self {
        id.erase()
    }
}

impl<K: Kind> TryFrom<AnyId> for Id<K> {
    type Error = InvalidKindAssertion;

    fn try_from(any: AnyId) -> Result<Self, Self::Error> {
        any.downcast()
    }
}

impl fmt::Display for AnyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.raw)
    }
}

impl FromStr for AnyId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, raw) = s
            .split_once(':')
            .ok_or_else(|| ParseIdError::MissingKind(s.to_owned()))?;
        Ok(Self::new(kind.parse()?, raw.parse()?))
    }
}

/// An [`AnyId`] was asserted to be of a kind it does not carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} id, found a {found} id")]
pub struct InvalidKindAssertion {
    pub expected: KindTag,
    pub found: KindTag,
}

/// Text that is not a valid identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    #[error("expected <kind>:<decimal>, got {0:?}")]
    MissingKind(String),
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),
    #[error(transparent)]
    InvalidSnowflake(#[from] ParseSnowflakeError),
}

#[cfg(feature = "serde")]
impl serde::Serialize for AnyId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        s.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AnyId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
