mod bn;
mod conv_bn_2d;
mod input;
mod inverted_bottleneck_2d;
mod max_pool_2d;
mod module;
mod module_name;
mod module_path;
mod separable_conv_2d;
mod shape_input;
mod sum_2d;
mod up_sample_2d;

pub use bn::*;
pub use conv_bn_2d::*;
pub use input::*;
pub use inverted_bottleneck_2d::*;
pub use max_pool_2d::*;
pub use module::*;
pub use module_name::*;
pub use module_path::*;
pub use separable_conv_2d::*;
pub use shape_input::*;
pub use sum_2d::*;
pub use up_sample_2d::*;
