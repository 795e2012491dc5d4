use core::{fmt, str::FromStr};

use crate::Id;

/// A compile-time entity kind for [`Id<K>`].
///
/// Kinds are zero-sized marker types. Adding an entity means declaring a
/// marker, giving it a [`KindTag`] and (usually) an alias:
///
/// ```
/// use plume::{Id, Kind, KindTag, UserMarker};
///
/// fn owner_of(id: Id<UserMarker>) -> u64 {
///     id.to_u64()
/// }
///
/// assert_eq!(UserMarker::TAG, KindTag::User);
/// assert_eq!(owner_of(Id::from_raw(7u64)), 7);
/// ```
///
/// Passing an `Id<PostMarker>` where an `Id<UserMarker>` is expected does
/// not compile:
///
/// ```compile_fail
/// use plume::{Id, PostMarker, UserMarker};
///
/// fn owner_of(id: Id<UserMarker>) {}
/// owner_of(Id::<PostMarker>::from_raw(7u64));
/// ```
pub trait Kind: 'static {
    /// The runtime tag carried by an erased [`AnyId`] of this kind.
    ///
    /// [`AnyId`]: crate::AnyId
    const TAG: KindTag;
}

/// Runtime counterpart of [`Kind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[non_exhaustive]
pub enum KindTag {
    User,
    Post,
    AuthToken,
}

impl KindTag {
    /// Every known tag.
    pub const ALL: [Self; 3] = [Self::User, Self::Post, Self::AuthToken];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Post => "post",
            Self::AuthToken => "auth-token",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text that names no known [`KindTag`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for KindTag {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

/// Marker for user identifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UserMarker {}

/// Marker for post identifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PostMarker {}

/// Marker for auth token record identifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AuthTokenMarker {}

impl Kind for UserMarker {
    const TAG: KindTag = KindTag::User;
}

impl Kind for PostMarker {
    const TAG: KindTag = KindTag::Post;
}

impl Kind for AuthTokenMarker {
    const TAG: KindTag = KindTag::AuthToken;
}

pub type UserId = Id<UserMarker>;
pub type PostId = Id<PostMarker>;
pub type AuthTokenId = Id<AuthTokenMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_text() {
        for tag in KindTag::ALL {
            assert_eq!(tag.to_string().parse::<KindTag>(), Ok(tag));
        }
        assert_eq!("auth-token".parse::<KindTag>(), Ok(KindTag::AuthToken));
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert_eq!(
            "User".parse::<KindTag>(),
            Err(UnknownKind("User".to_owned()))
        );
        assert!("".parse::<KindTag>().is_err());
        assert!("auth_token".parse::<KindTag>().is_err());
    }

    #[test]
    fn markers_carry_their_tags() {
        assert_eq!(UserMarker::TAG, KindTag::User);
        assert_eq!(PostMarker::TAG, KindTag::Post);
        assert_eq!(AuthTokenMarker::TAG, KindTag::AuthToken);
    }
}
