#[cfg(feature = "tch")]
pub use impls::*;
#[cfg(feature = "tch")]
mod impls;

#[cfg(feature = "tch")]
pub use r#trait::*;
#[cfg(feature = "tch")]
mod r#trait;

/// Element-wise activation applied after a convolution block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Activation {
    Linear,
    Relu,
    Relu6,
    HardSwish,
    Swish,
    Mish,
    Logistic,
    Tanh,
}

impl Activation {
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }
}

impl Default for Activation {
    fn default() -> Self {
        Self::Relu6
    }
}
