mod parts;
mod raw;
#[cfg(feature = "serde")]
mod serde;

pub use parts::*;
pub use raw::*;
