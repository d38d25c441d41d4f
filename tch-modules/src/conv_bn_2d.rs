use crate::{
    batch_norm_2d::{BatchNorm2D, BatchNorm2DInit},
    common::*,
};

#[derive(Debug, Clone)]
pub struct ConvBn2DInit {
    pub in_c: usize,
    pub out_c: usize,
    pub k: usize,
    pub s: usize,
    pub p: usize,
    pub d: usize,
    pub g: usize,
    pub bias: bool,
    pub activation: Activation,
    pub batch_norm: Option<BatchNorm2DInit>,
    pub trainable: bool,
}

impl ConvBn2DInit {
    pub fn new(in_c: usize, out_c: usize, k: usize) -> Self {
        Self {
            in_c,
            out_c,
            k,
            s: 1,
            p: k / 2,
            d: 1,
            g: 1,
            bias: false,
            activation: Activation::Relu6,
            batch_norm: Some(Default::default()),
            trainable: true,
        }
    }

    pub fn build<'p, P>(self, path: P) -> ConvBn2D
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();

        let Self {
            in_c,
            out_c,
            k,
            s,
            p,
            d,
            g,
            bias,
            activation,
            batch_norm,
            trainable,
        } = self;

        let conv = nn::conv2d(
            path / "conv",
            in_c as i64,
            out_c as i64,
            k as i64,
            nn::ConvConfig {
                stride: s as i64,
                padding: p as i64,
                dilation: d as i64,
                groups: g as i64,
                bias,
                ..Default::default()
            },
        );
        if !trainable {
            freeze(&conv.ws);
            conv.bs.iter().for_each(freeze);
        }

        let bn = batch_norm.map(|init| {
            BatchNorm2DInit { trainable, ..init }.build(path / "bn", out_c as i64)
        });

        ConvBn2D {
            conv,
            bn,
            activation,
        }
    }
}

/// Convolution, then batch normalization, then the activation.
#[derive(Debug)]
pub struct ConvBn2D {
    conv: nn::Conv2D,
    bn: Option<BatchNorm2D>,
    activation: Activation,
}

impl nn::ModuleT for ConvBn2D {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let Self {
            ref conv,
            ref bn,
            activation,
        } = *self;

        let xs = xs.apply(conv);
        let xs = match bn {
            Some(bn) => bn.forward_t(&xs, train),
            None => xs,
        };
        xs.activation(activation)
    }
}

impl ConvBn2D {
    pub fn batch_norm(&self) -> Option<&BatchNorm2D> {
        self.bn.as_ref()
    }
}
