use crate::common::*;

/// The inferred shapes flowing into a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeInput<'a> {
    PlaceHolder,
    SingleTensor(&'a Shape),
    IndexedTensors(Vec<&'a Shape>),
}

impl<'a> ShapeInput<'a> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::PlaceHolder)
    }

    pub fn single_tensor(&self) -> Option<&'a Shape> {
        match *self {
            Self::SingleTensor(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn indexed_tensors(&self) -> Option<&[&'a Shape]> {
        match self {
            Self::IndexedTensors(shapes) => Some(shapes),
            _ => None,
        }
    }

    /// The `[b, c, h, w]` dimensions of a single image input.
    pub fn single_nchw(&self) -> Option<[Dim; 4]> {
        self.single_tensor()?.size4()
    }

    /// The known channel count of a single image input.
    pub fn in_channels(&self) -> Option<usize> {
        self.single_tensor()?.channels()?.size()
    }
}

impl<'a> From<&'a Shape> for ShapeInput<'a> {
    fn from(from: &'a Shape) -> Self {
        Self::SingleTensor(from)
    }
}

impl<'a, 'b> From<&'b [&'a Shape]> for ShapeInput<'a> {
    fn from(from: &'b [&'a Shape]) -> Self {
        Self::IndexedTensors(from.into())
    }
}
