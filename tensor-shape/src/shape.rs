use crate::{common::*, dim::Dim};

/// A tensor shape whose dimensions may be partially unknown.
///
/// Image tensors follow the `[batch, channel, height, width]` layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<Dim>);

impl Shape {
    /// Build an image shape with an inferred batch dimension.
    pub fn nchw_infer_batch(c: usize, h: usize, w: usize) -> Self {
        Self(vec![Dim::Infer, c.into(), h.into(), w.into()])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn size4(&self) -> Option<[Dim; 4]> {
        match self.as_ref() {
            &[b, c, h, w] => Some([b, c, h, w]),
            _ => None,
        }
    }

    /// The channel dimension of an image shape.
    pub fn channels(&self) -> Option<Dim> {
        let [_b, c, _h, _w] = self.size4()?;
        Some(c)
    }

    /// The `[height, width]` dimensions of an image shape.
    pub fn spatial(&self) -> Option<[Dim; 2]> {
        let [_b, _c, h, w] = self.size4()?;
        Some([h, w])
    }

    pub fn is_compatible_with(&self, other: &Shape) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(lhs, rhs)| lhs.is_compatible_with(rhs))
    }

    pub fn equalize(&self, other: &Shape) -> Option<Shape> {
        if self.0.len() != other.0.len() {
            return None;
        }

        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(lhs, rhs)| lhs.equalize(rhs))
            .collect::<Option<Vec<_>>>()
            .map(Shape)
    }
}

impl<const SIZE: usize> From<[Dim; SIZE]> for Shape {
    fn from(from: [Dim; SIZE]) -> Self {
        Self(from.into())
    }
}

impl<const SIZE: usize> From<[usize; SIZE]> for Shape {
    fn from(from: [usize; SIZE]) -> Self {
        from.into_iter().collect()
    }
}

impl From<Vec<Dim>> for Shape {
    fn from(vec: Vec<Dim>) -> Self {
        Self(vec)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(vec: Vec<usize>) -> Self {
        vec.into_iter().collect()
    }
}

impl From<&[usize]> for Shape {
    fn from(slice: &[usize]) -> Self {
        slice.iter().cloned().collect()
    }
}

impl From<Vec<Option<usize>>> for Shape {
    fn from(vec: Vec<Option<usize>>) -> Self {
        Self(vec.into_iter().map(Dim::from).collect())
    }
}

impl From<&Shape> for Vec<Option<usize>> {
    fn from(shape: &Shape) -> Self {
        shape.0.iter().cloned().map(Into::into).collect()
    }
}

impl<const SIZE: usize> TryFrom<&Shape> for [usize; SIZE] {
    type Error = &'static str;

    fn try_from(shape: &Shape) -> Result<Self, Self::Error> {
        let sizes = Vec::<usize>::try_from(shape)?;
        Self::try_from(sizes).map_err(|_| "shape mismatch")
    }
}

impl TryFrom<&Shape> for Vec<usize> {
    type Error = &'static str;

    fn try_from(shape: &Shape) -> Result<Self, Self::Error> {
        shape
            .0
            .iter()
            .map(Dim::size)
            .collect::<Option<Vec<_>>>()
            .ok_or("shape cannot be fully determined")
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = usize>,
    {
        Self(iter.into_iter().map(Dim::from).collect())
    }
}

impl FromIterator<Dim> for Shape {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Dim>,
    {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[Dim]> for Shape {
    fn as_ref(&self) -> &[Dim] {
        &self.0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, dim) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(dim, f)?;
        }
        f.write_str("]")
    }
}
