use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{AuthToken, TokenStatus, TokenString, UserHandle, UserId};

/// Errors reported by a storage collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A token with the same value already exists.
    #[error("token already exists")]
    TokenConflict,

    /// Another user already has this handle.
    #[error("handle {0} is taken")]
    HandleNotUnique(UserHandle),

    /// The referenced user does not exist.
    #[error("user {0} does not exist")]
    ForeignKeyViolation(UserId),
}

/// Persistence seam for auth tokens.
///
/// The token value is the primary key. Implementations must reject an
/// insert whose value already exists with [`StoreError::TokenConflict`]
/// rather than overwrite it.
pub trait TokenStore {
    /// # Errors
    /// [`StoreError::TokenConflict`] if the token value is taken.
    fn insert(&self, token: AuthToken) -> Result<(), StoreError>;

    /// # Errors
    /// Backend failures only; a missing token is `Ok(None)`.
    fn find(&self, token: &TokenString) -> Result<Option<AuthToken>, StoreError>;

    /// Deletes the token. Returns whether it existed.
    ///
    /// # Errors
    /// Backend failures only.
    fn revoke(&self, token: &TokenString) -> Result<bool, StoreError>;

    /// Deletes every token expired at `now`. Returns how many were removed.
    ///
    /// # Errors
    /// Backend failures only.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// An in-process [`TokenStore`].
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<TokenString, AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn insert(&self, token: AuthToken) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write();
        if tokens.contains_key(token.token()) {
            return Err(StoreError::TokenConflict);
        }
        tokens.insert(token.token().clone(), token);
        Ok(())
    }

    fn find(&self, token: &TokenString) -> Result<Option<AuthToken>, StoreError> {
        Ok(self.tokens.read().get(token).cloned())
    }

    fn revoke(&self, token: &TokenString) -> Result<bool, StoreError> {
        Ok(self.tokens.write().remove(token).is_some())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, token| token.validate(now) == TokenStatus::Valid);
        Ok(before - tokens.len())
    }
}

/// Issues tokens into a [`TokenStore`], retrying with a fresh value when the
/// random token collides with an existing one.
///
/// ```
/// use plume::{MemoryTokenStore, TokenIssuer, TokenStatus, UserId};
///
/// let store = MemoryTokenStore::new();
/// let issuer = TokenIssuer::new();
/// let token = issuer.issue(&store, UserId::from_raw(1u64), Some(3600)).unwrap();
///
/// let status = issuer.authenticate(&store, token.token(), chrono::Utc::now()).unwrap();
/// assert_eq!(status, TokenStatus::Valid);
/// ```
pub struct TokenIssuer<F = fn() -> TokenString> {
    max_attempts: u32,
    token_source: F,
}

impl TokenIssuer {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            token_source: TokenString::generate,
        }
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> TokenIssuer<F>
where
    F: Fn() -> TokenString,
{
    /// Replaces the random token source.
    pub fn with_token_source<G>(self, token_source: G) -> TokenIssuer<G>
    where
        G: Fn() -> TokenString,
    {
        TokenIssuer {
            max_attempts: self.max_attempts,
            token_source,
        }
    }

    /// Sets how many values are tried before a conflict is reported. At
    /// least one attempt is always made.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Issues and stores a token for `user`, created now.
    ///
    /// # Errors
    /// [`StoreError::TokenConflict`] if every attempt collided, or any other
    /// store error.
    pub fn issue<S>(
        &self,
        store: &S,
        user: UserId,
        expires_after_seconds: Option<u64>,
    ) -> Result<AuthToken, StoreError>
    where
        S: TokenStore + ?Sized,
    {
        self.issue_at(store, user, expires_after_seconds, Utc::now())
    }

    /// Issues and stores a token for `user`, created at `created_at`.
    ///
    /// # Errors
    /// See [`Self::issue`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, store)))]
    pub fn issue_at<S>(
        &self,
        store: &S,
        user: UserId,
        expires_after_seconds: Option<u64>,
        created_at: DateTime<Utc>,
    ) -> Result<AuthToken, StoreError>
    where
        S: TokenStore + ?Sized,
    {
        let mut attempt = 1;
        loop {
            let token = AuthToken::new(
                (self.token_source)(),
                user,
                created_at,
                expires_after_seconds,
            );
            match store.insert(token.clone()) {
                Ok(()) => return Ok(token),
                Err(StoreError::TokenConflict) if attempt < self.max_attempts => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, "token collided, retrying with a fresh value");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Looks `token` up and validates it against `now`.
    ///
    /// # Errors
    /// Store errors only; an unknown token is [`TokenStatus::NotFound`].
    pub fn authenticate<S>(
        &self,
        store: &S,
        token: &TokenString,
        now: DateTime<Utc>,
    ) -> Result<TokenStatus, StoreError>
    where
        S: TokenStore + ?Sized,
    {
        Ok(store
            .find(token)?
            .map_or(TokenStatus::NotFound, |record| record.validate(now)))
    }
}
