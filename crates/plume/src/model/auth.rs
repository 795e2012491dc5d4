use chrono::{DateTime, TimeDelta, Utc};
use core::fmt;
use rand::distr::{Alphanumeric, SampleString};

use crate::{ModelError, UserId};

/// A bearer token: exactly [`TokenString::LEN`] ASCII alphanumeric
/// characters.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct TokenString(String);

impl TokenString {
    pub const LEN: usize = 30;

    /// Draws a fresh token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self(Alphanumeric.sample_string(&mut rand::rng(), Self::LEN))
    }

    /// # Errors
    /// [`ModelError::InvalidToken`] unless `token` is exactly 30 ASCII
    /// alphanumeric characters.
    pub fn new(token: impl Into<String>) -> Result<Self, ModelError> {
        let token = token.into();
        if token.len() != Self::LEN {
            return Err(ModelError::InvalidToken {
                reason: "must be exactly 30 characters",
            });
        }
        if !token.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ModelError::InvalidToken {
                reason: "must be ASCII alphanumeric",
            });
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TokenString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenString(<redacted>)")
    }
}

impl TryFrom<String> for TokenString {
    type Error = ModelError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::new(token)
    }
}

impl From<TokenString> for String {
    fn from(token: TokenString) -> Self {
        token.0
    }
}

/// Outcome of checking a token.
///
/// `NotFound` is produced by a [`TokenStore`] lookup, never by
/// [`AuthToken::validate`].
///
/// [`TokenStore`]: crate::TokenStore
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TokenStatus {
    Valid,
    Expired,
    NotFound,
}

impl TokenStatus {
    /// Status at `now` of a token created at `created_at` that expires after
    /// `expires_after_seconds` (never, if `None`).
    pub fn of_window(
        created_at: DateTime<Utc>,
        expires_after_seconds: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        match expiry(created_at, expires_after_seconds) {
            Some(expires_at) if now > expires_at => Self::Expired,
            _ => Self::Valid,
        }
    }
}

fn expiry(created_at: DateTime<Utc>, expires_after_seconds: Option<u64>) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(expires_after_seconds?).ok()?;
    created_at.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
            Self::NotFound => "not-found",
        })
    }
}

/// An issued auth token bound to a user.
///
/// Records are immutable once issued. A token without
/// `expires_after_seconds` never expires; otherwise it is valid up to and
/// including `created_at + expires_after_seconds`.
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use plume::{AuthToken, TokenStatus, UserId};
///
/// let token = AuthToken::issue(UserId::from_raw(1u64), Some(3600));
/// let later = token.created_at() + TimeDelta::seconds(3601);
/// assert_eq!(token.validate(later), TokenStatus::Expired);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthToken {
    token: TokenString,
    user: UserId,
    created_at: DateTime<Utc>,
    expires_after_seconds: Option<u64>,
}

impl AuthToken {
    /// Issues a token for `user` with a fresh random value, created now.
    pub fn issue(user: UserId, expires_after_seconds: Option<u64>) -> Self {
        Self::issue_at(user, expires_after_seconds, Utc::now())
    }

    /// Issues a token for `user` with a fresh random value, created at
    /// `created_at`.
    pub fn issue_at(
        user: UserId,
        expires_after_seconds: Option<u64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(TokenString::generate(), user, created_at, expires_after_seconds)
    }

    /// Rebuilds a record from stored fields.
    pub const fn new(
        token: TokenString,
        user: UserId,
        created_at: DateTime<Utc>,
        expires_after_seconds: Option<u64>,
    ) -> Self {
        Self {
            token,
            user,
            created_at,
            expires_after_seconds,
        }
    }

    pub const fn token(&self) -> &TokenString {
        &self.token
    }

    pub const fn user(&self) -> UserId {
        self.user
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn expires_after_seconds(&self) -> Option<u64> {
        self.expires_after_seconds
    }

    /// The last instant the token is valid at.
    ///
    /// `None` if the token never expires, or if the expiry lies beyond the
    /// range `chrono` can represent (it is then unreachable).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        expiry(self.created_at, self.expires_after_seconds)
    }

    /// Checks the token against `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> TokenStatus {
        TokenStatus::of_window(self.created_at, self.expires_after_seconds, now)
    }
}
