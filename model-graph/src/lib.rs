//! Computation graph of the hourglass pose network with static shape inference.

mod builder;
mod common;
mod graph;
mod graphviz;
mod hourglass;

pub use builder::GraphBuilder;
pub use graph::{Graph, InputKeys, Node, NodeKey};
pub use hourglass::{build_network, HourglassBuilder};
