/// A value failed validation before it reached storage.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid handle {handle:?}: {reason}")]
    InvalidHandle { handle: String, reason: &'static str },

    /// Carries no input: the rejected text may be a bearer secret.
    #[error("invalid token: {reason}")]
    InvalidToken { reason: &'static str },
}
