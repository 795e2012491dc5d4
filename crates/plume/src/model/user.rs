use core::{fmt, str::FromStr};

use crate::{ModelError, Result, SnowflakeGenerator, TimeSource, UserId};

/// A user's public handle.
///
/// At most [`UserHandle::MAX_CHARS`] characters (Unicode scalar values), not
/// empty, no whitespace. Global uniqueness is enforced by storage.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct UserHandle(String);

impl UserHandle {
    pub const MAX_CHARS: usize = 50;

    /// # Errors
    /// [`ModelError::InvalidHandle`] if `handle` breaks any of the rules above.
    pub fn new(handle: impl Into<String>) -> Result<Self, ModelError> {
        let handle = handle.into();
        let reason = if handle.is_empty() {
            Some("must not be empty")
        } else if handle.chars().count() > Self::MAX_CHARS {
            Some("longer than 50 characters")
        } else if handle.chars().any(char::is_whitespace) {
            Some("must not contain whitespace")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ModelError::InvalidHandle { handle, reason }),
            None => Ok(Self(handle)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserHandle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserHandle {
    type Error = ModelError;

    fn try_from(handle: String) -> Result<Self, Self::Error> {
        Self::new(handle)
    }
}

impl From<UserHandle> for String {
    fn from(handle: UserHandle) -> Self {
        handle.0
    }
}

/// A registered user. The id never changes; the handle may.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub handle: UserHandle,
}

impl User {
    /// Replaces the handle, returning the old one.
    pub fn rename(&mut self, handle: UserHandle) -> UserHandle {
        core::mem::replace(&mut self.handle, handle)
    }
}

/// A user that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateUser {
    pub handle: UserHandle,
}

impl CreateUser {
    pub const fn new(handle: UserHandle) -> Self {
        Self { handle }
    }

    /// Mints the user's id.
    ///
    /// # Errors
    /// See [`SnowflakeGenerator::generate`].
    pub fn into_user<T: TimeSource>(self, generator: &SnowflakeGenerator<T>) -> Result<User> {
        Ok(User {
            id: generator.mint()?,
            handle: self.handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratorConfig, SystemClock};

    #[test]
    fn accepts_up_to_fifty_characters() {
        let max = "a".repeat(50);
        assert_eq!(UserHandle::new(max.clone()).unwrap().as_str(), max);
        // Counted in characters, not bytes.
        let wide = "é".repeat(50);
        assert!(UserHandle::new(wide).is_ok());
    }

    #[test]
    fn rejects_invalid_handles() {
        assert!(matches!(
            UserHandle::new("a".repeat(51)),
            Err(ModelError::InvalidHandle { reason, .. }) if reason.contains("50")
        ));
        assert!(UserHandle::new("").is_err());
        assert!(UserHandle::new("two words").is_err());
        assert!(UserHandle::new("tab\there").is_err());
    }

    #[test]
    fn create_user_mints_an_id() {
        let generator =
            SnowflakeGenerator::new(&GeneratorConfig::default(), SystemClock::default());
        let alice = CreateUser::new("alice".parse().unwrap())
            .into_user(&generator)
            .unwrap();
        let bob = CreateUser::new("bob".parse().unwrap())
            .into_user(&generator)
            .unwrap();
        assert_eq!(alice.handle.as_str(), "alice");
        assert!(alice.id < bob.id);
    }

    #[test]
    fn rename_keeps_id() {
        let mut user = User {
            id: UserId::from_raw(1u64),
            handle: "old".parse().unwrap(),
        };
        let previous = user.rename("new".parse().unwrap());
        assert_eq!(previous.as_str(), "old");
        assert_eq!(user.handle.as_str(), "new");
        assert_eq!(user.id, UserId::from_raw(1u64));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn handle_is_validated_on_deserialize() {
        let user: User = serde_json::from_str(r#"{ "id": "7", "handle": "carol" }"#).unwrap();
        assert_eq!(user.id, UserId::from_raw(7u64));
        assert!(serde_json::from_str::<User>(r#"{ "id": "7", "handle": "c d" }"#).is_err());
    }
}
