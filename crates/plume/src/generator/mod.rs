mod error;
mod sequence;
mod snowflake;
mod status;
#[cfg(feature = "async-tokio")]
mod tokio;

pub use error::*;
pub use sequence::*;
pub use snowflake::*;
pub use status::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub use self::tokio::*;
