use crate::{
    batch_norm_2d::BatchNorm2DInit,
    common::*,
    conv_bn_2d::{ConvBn2D, ConvBn2DInit},
};

/// Depthwise k×k convolution followed by a pointwise 1×1 convolution.
#[derive(Debug, Clone)]
pub struct SeparableConv2DInit {
    pub in_c: usize,
    pub out_c: usize,
    pub k: usize,
    pub s: usize,
    pub activation: Activation,
    pub batch_norm: Option<BatchNorm2DInit>,
    pub trainable: bool,
}

impl SeparableConv2DInit {
    pub fn new(in_c: usize, out_c: usize, k: usize) -> Self {
        Self {
            in_c,
            out_c,
            k,
            s: 1,
            activation: Activation::Relu6,
            batch_norm: Some(Default::default()),
            trainable: true,
        }
    }

    pub fn build<'p, P>(self, path: P) -> SeparableConv2D
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            in_c,
            out_c,
            k,
            s,
            activation,
            batch_norm,
            trainable,
        } = self;
        let bias = batch_norm.is_none();

        let depthwise = ConvBn2DInit {
            s,
            g: in_c,
            bias,
            activation,
            batch_norm: batch_norm.clone(),
            trainable,
            ..ConvBn2DInit::new(in_c, in_c, k)
        }
        .build(path / "depthwise");

        let pointwise = ConvBn2DInit {
            bias,
            activation,
            batch_norm,
            trainable,
            ..ConvBn2DInit::new(in_c, out_c, 1)
        }
        .build(path / "pointwise");

        SeparableConv2D {
            depthwise,
            pointwise,
        }
    }
}

#[derive(Debug)]
pub struct SeparableConv2D {
    depthwise: ConvBn2D,
    pointwise: ConvBn2D,
}

impl nn::ModuleT for SeparableConv2D {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        xs.apply_t(&self.depthwise, train)
            .apply_t(&self.pointwise, train)
    }
}
