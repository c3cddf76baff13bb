//! CLI command implementations.

mod start;
mod stop;

pub use start::{start, StartArgs};
pub use stop::stop;
