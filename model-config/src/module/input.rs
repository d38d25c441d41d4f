use super::*;
use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Input {
    pub shape: Shape,
}

impl ModuleEx for Input {
    fn output_shape(&self, input_shape: ShapeInput<'_>) -> Option<Shape> {
        match input_shape {
            ShapeInput::PlaceHolder => Some(self.shape.clone()),
            ShapeInput::SingleTensor(input_shape) => input_shape.equalize(&self.shape),
            ShapeInput::IndexedTensors(_) => None,
        }
    }

    fn num_parameters(&self, _input_shape: ShapeInput<'_>) -> Option<usize> {
        Some(0)
    }
}
