//! Entities addressed by plume identifiers, and the auth token lifecycle.

mod auth;
mod error;
mod post;
mod store;
mod user;

pub use auth::*;
pub use error::*;
pub use post::*;
pub use store::*;
pub use user::*;
