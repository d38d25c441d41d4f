//! libtorch modules of the hourglass pose network.

mod batch_norm_2d;
mod common;
mod conv_bn_2d;
mod input;
mod inverted_bottleneck_2d;
mod l2_loss;
mod max_pool_2d;
mod module;
mod separable_conv_2d;
mod sum_2d;
mod up_sample_2d;

pub use batch_norm_2d::*;
pub use conv_bn_2d::*;
pub use input::*;
pub use inverted_bottleneck_2d::*;
pub use l2_loss::*;
pub use max_pool_2d::*;
pub use module::*;
pub use separable_conv_2d::*;
pub use sum_2d::*;
pub use up_sample_2d::*;
