use crate::{impls, Activation};
use tch::{nn::Module, Tensor};

pub trait TensorActivationExt {
    fn activation(&self, act: Activation) -> Tensor;

    /// ReLU clipped at 6, the activation of mobile inverted bottlenecks.
    fn relu6(&self) -> Tensor;

    fn hard_swish(&self) -> Tensor;

    fn swish(&self) -> Tensor;
}

impl TensorActivationExt for Tensor {
    fn activation(&self, act: Activation) -> Tensor {
        act.forward(self)
    }

    fn relu6(&self) -> Tensor {
        impls::relu6(self)
    }

    fn hard_swish(&self) -> Tensor {
        impls::hard_swish(self)
    }

    fn swish(&self) -> Tensor {
        impls::swish(self)
    }
}
