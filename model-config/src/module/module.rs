use super::*;
use crate::common::*;

pub trait ModuleEx {
    /// Infer the output shape, or `None` if the input does not fit.
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape>;

    /// Count learnable parameters given the input shape.
    fn num_parameters(&self, input_shape: ShapeInput<'_>) -> Option<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Module {
    Input(Input),
    ConvBn2D(ConvBn2D),
    SeparableConv2D(SeparableConv2D),
    InvertedBottleneck2D(InvertedBottleneck2D),
    MaxPool2D(MaxPool2D),
    UpSample2D(UpSample2D),
    Sum2D(Sum2D),
}

impl Module {
    pub fn is_sum_2d(&self) -> bool {
        matches!(self, Self::Sum2D(_))
    }

    pub fn is_max_pool_2d(&self) -> bool {
        matches!(self, Self::MaxPool2D(_))
    }
}

impl From<Input> for Module {
    fn from(v: Input) -> Self {
        Module::Input(v)
    }
}

impl From<ConvBn2D> for Module {
    fn from(v: ConvBn2D) -> Self {
        Module::ConvBn2D(v)
    }
}

impl From<SeparableConv2D> for Module {
    fn from(v: SeparableConv2D) -> Self {
        Module::SeparableConv2D(v)
    }
}

impl From<InvertedBottleneck2D> for Module {
    fn from(v: InvertedBottleneck2D) -> Self {
        Module::InvertedBottleneck2D(v)
    }
}

impl From<MaxPool2D> for Module {
    fn from(v: MaxPool2D) -> Self {
        Module::MaxPool2D(v)
    }
}

impl From<UpSample2D> for Module {
    fn from(v: UpSample2D) -> Self {
        Module::UpSample2D(v)
    }
}

impl From<Sum2D> for Module {
    fn from(v: Sum2D) -> Self {
        Module::Sum2D(v)
    }
}

impl ModuleEx for Module {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        match self {
            Module::Input(layer) => layer.output_shape(input_shape),
            Module::ConvBn2D(layer) => layer.output_shape(input_shape),
            Module::SeparableConv2D(layer) => layer.output_shape(input_shape),
            Module::InvertedBottleneck2D(layer) => layer.output_shape(input_shape),
            Module::MaxPool2D(layer) => layer.output_shape(input_shape),
            Module::UpSample2D(layer) => layer.output_shape(input_shape),
            Module::Sum2D(layer) => layer.output_shape(input_shape),
        }
    }

    fn num_parameters(&self, input_shape: ShapeInput<'_>) -> Option<usize> {
        match self {
            Module::Input(layer) => layer.num_parameters(input_shape),
            Module::ConvBn2D(layer) => layer.num_parameters(input_shape),
            Module::SeparableConv2D(layer) => layer.num_parameters(input_shape),
            Module::InvertedBottleneck2D(layer) => layer.num_parameters(input_shape),
            Module::MaxPool2D(layer) => layer.num_parameters(input_shape),
            Module::UpSample2D(layer) => layer.num_parameters(input_shape),
            Module::Sum2D(layer) => layer.num_parameters(input_shape),
        }
    }
}
