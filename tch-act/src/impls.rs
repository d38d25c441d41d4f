use crate::Activation;
use tch::{nn, Tensor};

impl nn::Module for Activation {
    fn forward(&self, xs: &Tensor) -> Tensor {
        use Activation::*;

        match *self {
            Linear => xs.shallow_clone(),
            Relu => xs.relu(),
            Relu6 => relu6(xs),
            HardSwish => hard_swish(xs),
            Swish => swish(xs),
            Mish => xs.mish(),
            Logistic => xs.sigmoid(),
            Tanh => xs.tanh(),
        }
    }
}

pub fn relu6(xs: &Tensor) -> Tensor {
    xs.clamp(0.0, 6.0)
}

pub fn hard_swish(xs: &Tensor) -> Tensor {
    xs * relu6(&(xs + 3.0)) / 6.0
}

pub fn swish(xs: &Tensor) -> Tensor {
    xs * xs.sigmoid()
}
