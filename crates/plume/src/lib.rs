//! Typed, time-sortable identifiers for the plume feed backend.
//!
//! Every domain entity (users, posts, auth tokens) is addressed by a 64-bit
//! Snowflake that encodes the millisecond it was minted, the worker/process
//! slot that minted it, and an intra-millisecond sequence. Identifiers are
//! wrapped in [`Id<K>`] so that a user identifier can never be passed where a
//! post identifier is expected.
//!
//! ```
//! use plume::{GeneratorConfig, Id, SnowflakeGenerator, SystemClock, UserMarker};
//!
//! let generator = SnowflakeGenerator::new(&GeneratorConfig::default(), SystemClock::default());
//! let user: Id<UserMarker> = generator.mint().unwrap();
//! assert_eq!(user.to_string(), user.raw().to_raw().to_string());
//! ```
//!
//! The auth token lifecycle lives in [`AuthToken`], [`TokenIssuer`] and the
//! [`TokenStore`] seam.

mod config;
mod generator;
mod id;
mod model;
mod snowflake;
mod time;

pub use crate::config::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::model::*;
pub use crate::snowflake::*;
pub use crate::time::*;
