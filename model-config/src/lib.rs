//! Declarative configuration of the hourglass pose network.

mod common;
pub mod hourglass;
pub mod module;

pub use hourglass::*;
pub use module::*;
pub use tch_act::Activation;
