pub use anyhow::{bail, ensure, format_err, Context, Error, Result};
pub use itertools::Itertools;
pub use log::warn;
pub use noisy_float::prelude::*;
pub use std::{borrow::Borrow, iter};
pub use strum::AsRefStr;
pub use tch::{
    nn::{self, Module as _, ModuleT as _},
    Device, Kind, Reduction, Tensor,
};
pub use tch_act::{Activation, TensorActivationExt as _};
pub use tensor_shape::Shape;

/// Stop gradients on a parameter of a frozen module.
pub(crate) fn freeze(tensor: &Tensor) {
    let _ = tensor.set_requires_grad(false);
}
