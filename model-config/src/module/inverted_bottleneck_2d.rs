use super::*;
use crate::common::*;

/// Mobile inverted bottleneck.
///
/// The block expands the input channels by `t` with a 1×1 convolution,
/// filters them with a depthwise k×k convolution of stride `s`, and projects
/// them linearly to `c` channels. The input is added back when the input
/// and output channel counts agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvertedBottleneck2D {
    pub t: usize,
    pub c: usize,
    #[serde(default = "default_stride")]
    pub s: usize,
    #[serde(default = "default_kernel")]
    pub k: usize,
    #[serde(default)]
    pub act: Activation,
    #[serde(default)]
    pub bn: BatchNorm,
}

impl InvertedBottleneck2D {
    pub fn new(t: usize, c: usize, s: usize, k: usize) -> Self {
        Self {
            t,
            c,
            s,
            k,
            act: Activation::default(),
            bn: BatchNorm::default(),
        }
    }

    /// Channels after the expansion, or `None` on overflow.
    pub fn hidden_channels(&self, in_c: usize) -> Option<usize> {
        in_c.checked_mul(self.t)
    }

    /// Whether the input is added to the projected output.
    ///
    /// Only the channel counts are compared, so a strided block with equal
    /// channel counts fails shape inference.
    pub fn has_residual(&self, in_c: usize) -> bool {
        in_c == self.c
    }
}

impl ModuleEx for InvertedBottleneck2D {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        let Self { t, c, s, k, .. } = *self;
        let [b, in_c, h, w] = input_shape.single_nchw()?;

        if t == 0 || c == 0 {
            return None;
        }
        if let Some(in_c) = in_c.size() {
            self.hidden_channels(in_c)?;
        }

        let out_h = h.window(k, s, k / 2, 1)?;
        let out_w = w.window(k, s, k / 2, 1)?;

        // the residual sum needs equal extents
        let residual = in_c.size().map(|in_c| self.has_residual(in_c)).unwrap_or(false);
        if residual && (!out_h.is_compatible_with(&h) || !out_w.is_compatible_with(&w)) {
            return None;
        }

        Some([b, c.into(), out_h, out_w].into())
    }

    fn num_parameters(&self, input_shape: ShapeInput<'_>) -> Option<usize> {
        let Self { c, k, ref bn, .. } = *self;
        let in_c = input_shape.in_channels()?;
        let hidden = self.hidden_channels(in_c)?;

        let expand = in_c
            .checked_mul(hidden)?
            .checked_add(bn.num_parameters(hidden)?)?;
        let depthwise = k
            .checked_mul(k)?
            .checked_mul(hidden)?
            .checked_add(bn.num_parameters(hidden)?)?;
        let project = hidden
            .checked_mul(c)?
            .checked_add(bn.num_parameters(c)?)?;
        expand.checked_add(depthwise)?.checked_add(project)
    }
}

fn default_stride() -> usize {
    1
}

fn default_kernel() -> usize {
    3
}
