use super::*;
use crate::common::*;

/// Depthwise k×k convolution followed by a pointwise 1×1 convolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeparableConv2D {
    pub c: usize,
    pub k: usize,
    #[serde(default = "default_stride")]
    pub s: usize,
    #[serde(default)]
    pub act: Activation,
    #[serde(default)]
    pub bn: BatchNorm,
}

impl ModuleEx for SeparableConv2D {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        let Self { c, k, s, .. } = *self;
        let [b, _c, h, w] = input_shape.single_nchw()?;

        if c == 0 {
            return None;
        }

        let out_h = h.window(k, s, k / 2, 1)?;
        let out_w = w.window(k, s, k / 2, 1)?;
        Some([b, c.into(), out_h, out_w].into())
    }

    fn num_parameters(&self, input_shape: ShapeInput<'_>) -> Option<usize> {
        let Self { c, k, ref bn, .. } = *self;
        let in_c = input_shape.in_channels()?;

        let depthwise = k
            .checked_mul(k)?
            .checked_mul(in_c)?
            .checked_add(bn.num_parameters(in_c)?)?;
        let pointwise = in_c.checked_mul(c)?.checked_add(bn.num_parameters(c)?)?;
        depthwise.checked_add(pointwise)
    }
}

fn default_stride() -> usize {
    1
}
