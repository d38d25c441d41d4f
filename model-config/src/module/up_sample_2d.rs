use super::*;
use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpSample2D {
    pub scale: usize,
    #[serde(default)]
    pub mode: UpSampleMode,
}

/// Interpolation used to enlarge feature maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpSampleMode {
    Nearest,
    Bilinear,
}

impl Default for UpSampleMode {
    fn default() -> Self {
        Self::Bilinear
    }
}

impl ModuleEx for UpSample2D {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        if self.scale == 0 {
            return None;
        }

        let [b, c, h, w] = input_shape.single_nchw()?;
        Some([b, c, h.scale_up(self.scale)?, w.scale_up(self.scale)?].into())
    }

    fn num_parameters(&self, _input_shape: ShapeInput<'_>) -> Option<usize> {
        Some(0)
    }
}
