use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use crate::{AnyId, Kind, ParseIdError, RawSnowflake, Result, SnowflakeGenerator, TimeSource};

/// A [`RawSnowflake`] minted for entities of kind `K`.
///
/// `Id<K>` has the same size and layout as a `u64`. The kind only exists at
/// compile time: comparing or passing an `Id<UserMarker>` where an
/// `Id<PostMarker>` is expected is a type error. The marker is held as
/// `PhantomData<fn() -> K>`, so the common traits hold for every `K` without
/// requiring the marker to implement them.
///
/// Ordering follows the underlying value, which is mint order.
#[repr(transparent)]
pub struct Id<K> {
    raw: RawSnowflake,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Id<K> {
    /// Wraps a value at a trust boundary (storage, a peer service). The
    /// caller vouches that it was minted for `K`.
    pub fn from_raw(raw: impl Into<RawSnowflake>) -> Self {
        Self {
            raw: raw.into(),
            _kind: PhantomData,
        }
    }

    pub const fn raw(self) -> RawSnowflake {
        self.raw
    }

    pub const fn to_u64(self) -> u64 {
        self.raw.to_raw()
    }

    /// Reinterprets the bits as an `i64`, the shape of a `bigint` column.
    pub const fn to_i64(self) -> i64 {
        self.raw.to_raw() as i64
    }

    /// Inverse of [`Self::to_i64`].
    pub fn from_i64(value: i64) -> Self {
        Self::from_raw(value as u64)
    }
}

impl<K: Kind> Id<K> {
    /// Mints a new identifier from `generator`.
    ///
    /// # Errors
    /// See [`SnowflakeGenerator::generate`].
    pub fn mint<T: TimeSource>(generator: &SnowflakeGenerator<T>) -> Result<Self> {
        generator.mint()
    }

    /// Forgets the static kind, keeping it as a runtime tag.
    pub fn erase(self) -> AnyId {
        AnyId::new(K::TAG, self.raw)
    }
}

impl<K> Clone for Id<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Id<K> {}

impl<K> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for Id<K> {}

impl<K> PartialOrd for Id<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Id<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<K> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K: Kind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id<{}>({})", K::TAG, self.raw)
    }
}

/// The decimal form of the underlying value.
impl<K> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl<K> FromStr for Id<K> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Self::from_raw(s.parse::<RawSnowflake>()?))
    }
}

impl<K> From<Id<K>> for RawSnowflake {
    fn from(id: Id<K>) -> Self {
        id.raw
    }
}

impl<K> From<Id<K>> for u64 {
    fn from(id: Id<K>) -> Self {
        id.to_u64()
    }
}

#[cfg(feature = "serde")]
impl<K> serde::Serialize for Id<K> {
    fn serialize<S>(&self, s: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.raw, s)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for Id<K> {
    fn deserialize<D>(d: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <RawSnowflake as serde::Deserialize>::deserialize(d).map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        AuthTokenId, Id, KindTag, PostId, PostMarker, RawSnowflake, UserId, UserMarker,
    };
    use std::collections::HashSet;

    #[test]
    fn is_u64_sized() {
        assert_eq!(size_of::<UserId>(), size_of::<u64>());
        assert_eq!(size_of::<Option<PostId>>(), size_of::<Option<u64>>());
    }

    #[test]
    fn equality_and_hash_follow_value() {
        let a = UserId::from_raw(10u64);
        let b = UserId::from_raw(RawSnowflake::from_raw(10));
        let c = UserId::from_raw(11u64);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);

        let set: HashSet<UserId> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn decimal_text_round_trip() {
        let id = PostId::from_raw(1_234_567_890_123u64);
        assert_eq!(id.to_string(), "1234567890123");
        assert_eq!("1234567890123".parse::<PostId>(), Ok(id));
        assert!("user:1".parse::<UserId>().is_err());
        assert!("-1".parse::<UserId>().is_err());
    }

    #[test]
    fn i64_conversion_preserves_bits() {
        let id = UserId::from_raw(u64::MAX);
        assert_eq!(id.to_i64(), -1);
        assert_eq!(UserId::from_i64(-1), id);

        let small = UserId::from_raw(42u64);
        assert_eq!(small.to_i64(), 42);
        assert_eq!(UserId::from_i64(42), small);
    }

    #[test]
    fn erase_keeps_kind_as_tag() {
        let id = AuthTokenId::from_raw(5u64);
        let any = id.erase();
        assert_eq!(any.kind(), KindTag::AuthToken);
        assert_eq!(any.raw(), id.raw());
    }

    #[test]
    fn debug_names_the_kind() {
        let id = Id::<UserMarker>::from_raw(3u64);
        assert_eq!(format!("{id:?}"), "Id<user>(3)");
        assert_eq!(format!("{:?}", Id::<PostMarker>::from_raw(3u64)), "Id<post>(3)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_decimal_string() {
        use serde_json::json;

        let id = UserId::from_raw(u64::MAX);
        assert_eq!(
            serde_json::to_value(id).unwrap(),
            json!("18446744073709551615")
        );
        assert_eq!(serde_json::from_value::<UserId>(json!("7")).unwrap(), UserId::from_raw(7u64));
        assert_eq!(serde_json::from_value::<UserId>(json!(7)).unwrap(), UserId::from_raw(7u64));
    }
}
