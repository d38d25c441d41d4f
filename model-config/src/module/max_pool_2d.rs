use super::*;
use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaxPool2D {
    pub k: usize,
    pub s: usize,
    #[serde(default)]
    pub p: usize,
}

impl MaxPool2D {
    /// Non-overlapping pooling that shrinks the extent by `factor`.
    pub fn down_sample(factor: usize) -> Self {
        Self {
            k: factor,
            s: factor,
            p: 0,
        }
    }
}

impl ModuleEx for MaxPool2D {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        let Self { k, s, p } = *self;
        let [b, c, h, w] = input_shape.single_nchw()?;

        // padding beyond half of the window is rejected by libtorch
        if p > k / 2 {
            return None;
        }

        let out_h = h.window(k, s, p, 1)?;
        let out_w = w.window(k, s, p, 1)?;
        Some([b, c, out_h, out_w].into())
    }

    fn num_parameters(&self, _input_shape: ShapeInput<'_>) -> Option<usize> {
        Some(0)
    }
}
