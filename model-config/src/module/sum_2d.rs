use super::*;
use crate::common::*;

/// Element-wise sum of equally shaped feature maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sum2D {}

impl ModuleEx for Sum2D {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        let input_shapes = input_shape.indexed_tensors()?;
        let (first, rest) = input_shapes.split_first()?;
        first.size4()?;
        rest.iter()
            .try_fold((*first).clone(), |acc, shape| acc.equalize(shape))
    }

    fn num_parameters(&self, _input_shape: ShapeInput<'_>) -> Option<usize> {
        Some(0)
    }
}
