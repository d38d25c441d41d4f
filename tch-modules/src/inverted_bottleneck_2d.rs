use crate::{
    batch_norm_2d::BatchNorm2DInit,
    common::*,
    conv_bn_2d::{ConvBn2D, ConvBn2DInit},
};

#[derive(Debug, Clone)]
pub struct InvertedBottleneck2DInit {
    pub in_c: usize,
    pub out_c: usize,
    /// Expansion ratio of the hidden channels.
    pub t: usize,
    pub k: usize,
    pub s: usize,
    pub activation: Activation,
    pub batch_norm: Option<BatchNorm2DInit>,
    pub trainable: bool,
}

impl InvertedBottleneck2DInit {
    pub fn new(in_c: usize, out_c: usize, t: usize) -> Self {
        Self {
            in_c,
            out_c,
            t,
            k: 3,
            s: 1,
            activation: Activation::Relu6,
            batch_norm: Some(Default::default()),
            trainable: true,
        }
    }

    pub fn build<'p, P>(self, path: P) -> InvertedBottleneck2D
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            in_c,
            out_c,
            t,
            k,
            s,
            activation,
            batch_norm,
            trainable,
        } = self;
        let hidden_c = in_c * t;
        let bias = batch_norm.is_none();

        let expand = ConvBn2DInit {
            bias,
            activation,
            batch_norm: batch_norm.clone(),
            trainable,
            ..ConvBn2DInit::new(in_c, hidden_c, 1)
        }
        .build(path / "expand");

        let depthwise = ConvBn2DInit {
            s,
            g: hidden_c,
            bias,
            activation,
            batch_norm: batch_norm.clone(),
            trainable,
            ..ConvBn2DInit::new(hidden_c, hidden_c, k)
        }
        .build(path / "depthwise");

        let project = ConvBn2DInit {
            bias,
            activation: Activation::Linear,
            batch_norm,
            trainable,
            ..ConvBn2DInit::new(hidden_c, out_c, 1)
        }
        .build(path / "project");

        InvertedBottleneck2D {
            expand,
            depthwise,
            project,
            residual: in_c == out_c,
        }
    }
}

/// Expand, filter depthwise, project linearly, and add the input back when
/// the channel counts agree.
#[derive(Debug)]
pub struct InvertedBottleneck2D {
    expand: ConvBn2D,
    depthwise: ConvBn2D,
    project: ConvBn2D,
    residual: bool,
}

impl nn::ModuleT for InvertedBottleneck2D {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let Self {
            ref expand,
            ref depthwise,
            ref project,
            residual,
        } = *self;

        let ys = xs
            .apply_t(expand, train)
            .apply_t(depthwise, train)
            .apply_t(project, train);

        if residual {
            ys + xs
        } else {
            ys
        }
    }
}

impl InvertedBottleneck2D {
    pub fn has_residual(&self) -> bool {
        self.residual
    }
}
