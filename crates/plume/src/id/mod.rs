mod any;
mod kind;
mod typed;

pub use any::*;
pub use kind::*;
pub use typed::*;
