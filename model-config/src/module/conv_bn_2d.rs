use super::*;
use crate::common::*;

/// Convolution followed by batch normalization and an activation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawConvBn2D", into = "RawConvBn2D")]
pub struct ConvBn2D {
    pub c: usize,
    pub k: usize,
    pub s: usize,
    pub p: usize,
    pub d: usize,
    pub g: usize,
    pub bias: bool,
    pub act: Activation,
    pub bn: BatchNorm,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct RawConvBn2D {
    pub c: usize,
    pub k: usize,
    #[serde(default = "default_stride")]
    pub s: usize,
    pub p: Option<usize>,
    #[serde(default = "default_dilation")]
    pub d: usize,
    #[serde(default = "default_group")]
    pub g: usize,
    pub bias: Option<bool>,
    #[serde(default)]
    pub act: Activation,
    #[serde(default)]
    pub bn: BatchNorm,
}

impl From<RawConvBn2D> for ConvBn2D {
    fn from(raw: RawConvBn2D) -> Self {
        let RawConvBn2D {
            c,
            k,
            s,
            p,
            d,
            g,
            bias,
            act,
            bn,
        } = raw;

        let p = p.unwrap_or(k / 2);
        let bias = bias.unwrap_or(!bn.enabled);

        Self {
            c,
            k,
            s,
            p,
            d,
            g,
            bias,
            act,
            bn,
        }
    }
}

impl From<ConvBn2D> for RawConvBn2D {
    fn from(orig: ConvBn2D) -> Self {
        let ConvBn2D {
            c,
            k,
            s,
            p,
            d,
            g,
            bias,
            act,
            bn,
        } = orig;

        Self {
            c,
            k,
            s,
            p: Some(p),
            d,
            g,
            bias: Some(bias),
            act,
            bn,
        }
    }
}

impl ConvBn2D {
    pub fn new(c: usize, k: usize) -> Self {
        let bn = BatchNorm::default();

        Self {
            c,
            k,
            s: default_stride(),
            p: k / 2,
            d: default_dilation(),
            g: default_group(),
            bias: !bn.enabled,
            act: Activation::default(),
            bn,
        }
    }
}

impl ModuleEx for ConvBn2D {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        let Self {
            c: out_c,
            k,
            s,
            p,
            d,
            g,
            ..
        } = *self;

        let [in_b, in_c, in_h, in_w] = input_shape.single_nchw()?;

        if out_c == 0 || g == 0 || out_c % g != 0 {
            return None;
        }
        if let Some(in_c) = in_c.size() {
            if in_c % g != 0 {
                return None;
            }
        }

        let out_h = in_h.window(k, s, p, d)?;
        let out_w = in_w.window(k, s, p, d)?;
        Some([in_b, out_c.into(), out_h, out_w].into())
    }

    fn num_parameters(&self, input_shape: ShapeInput<'_>) -> Option<usize> {
        let Self {
            c: out_c,
            k,
            g,
            bias,
            ref bn,
            ..
        } = *self;
        let in_c = input_shape.in_channels()?;
        if g == 0 {
            return None;
        }

        let weights = k
            .checked_mul(k)?
            .checked_mul(in_c / g)?
            .checked_mul(out_c)?;
        let bias = if bias { out_c } else { 0 };
        weights
            .checked_add(bias)?
            .checked_add(bn.num_parameters(out_c)?)
    }
}

fn default_stride() -> usize {
    1
}

fn default_dilation() -> usize {
    1
}

fn default_group() -> usize {
    1
}
