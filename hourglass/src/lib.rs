//! The hourglass pose network running on libtorch.

mod common;
pub mod loss;
pub mod model;

pub use loss::*;
pub use model::*;
