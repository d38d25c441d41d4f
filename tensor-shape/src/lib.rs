//! Partially known tensor shapes used for static shape inference.

mod common;
mod dim;
mod shape;

pub use dim::*;
pub use shape::*;
