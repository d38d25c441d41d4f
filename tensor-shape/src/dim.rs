use crate::common::*;

/// A single dimension that is either known or left to be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Size(usize),
    Infer,
}

impl Dim {
    pub fn size(&self) -> Option<usize> {
        Option::<usize>::from(*self)
    }

    pub fn is_infer(&self) -> bool {
        matches!(self, Self::Infer)
    }

    pub fn is_compatible_with(&self, other: &Dim) -> bool {
        match (self, other) {
            (Self::Size(lhs), Self::Size(rhs)) => lhs == rhs,
            _ => true,
        }
    }

    /// Merge two dimensions, failing if both are known and differ.
    pub fn equalize(&self, other: &Dim) -> Option<Self> {
        match (*self, *other) {
            (Self::Size(lhs), Self::Size(rhs)) => (lhs == rhs).then(|| Self::Size(lhs)),
            (Self::Size(size), Self::Infer) | (Self::Infer, Self::Size(size)) => {
                Some(Self::Size(size))
            }
            (Self::Infer, Self::Infer) => Some(Self::Infer),
        }
    }

    /// Output extent of a sliding window (convolution or pooling).
    ///
    /// Returns `None` when the window does not fit into the padded input
    /// or when the stride is zero.
    pub fn window(
        &self,
        kernel: usize,
        stride: usize,
        padding: usize,
        dilation: usize,
    ) -> Option<Self> {
        if stride == 0 || kernel == 0 || dilation == 0 {
            return None;
        }

        match *self {
            Self::Size(size) => {
                let span = dilation.checked_mul(kernel - 1)?.checked_add(1)?;
                let padded = padding.checked_mul(2)?.checked_add(size)?;
                let remaining = padded.checked_sub(span)?;
                Some(Self::Size(remaining / stride + 1))
            }
            Self::Infer => Some(Self::Infer),
        }
    }

    /// Multiply by an integer up-sampling factor, or `None` on overflow.
    pub fn scale_up(&self, factor: usize) -> Option<Self> {
        match *self {
            Self::Size(size) => size.checked_mul(factor).map(Self::Size),
            Self::Infer => Some(Self::Infer),
        }
    }

    /// Integer ratio `self / other` if both are known and `other` divides `self`.
    pub fn ratio(&self, other: &Dim) -> Option<usize> {
        let (lhs, rhs) = (self.size()?, other.size()?);
        (rhs != 0 && lhs % rhs == 0).then(|| lhs / rhs)
    }
}

impl From<usize> for Dim {
    fn from(from: usize) -> Self {
        Self::Size(from)
    }
}

impl From<Option<usize>> for Dim {
    fn from(from: Option<usize>) -> Self {
        match from {
            Some(size) => Self::Size(size),
            None => Self::Infer,
        }
    }
}

impl From<Dim> for Option<usize> {
    fn from(from: Dim) -> Self {
        match from {
            Dim::Size(size) => Some(size),
            Dim::Infer => None,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(size) => fmt::Display::fmt(size, f),
            Self::Infer => f.write_str("_"),
        }
    }
}

impl Serialize for Dim {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Size(value) => value.serialize(serializer),
            Self::Infer => "_".serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Dim {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde_json::Value;

        match Value::deserialize(deserializer)? {
            Value::String(text) if text == "_" => Ok(Self::Infer),
            Value::Number(value) => value
                .as_u64()
                .map(|value| Self::Size(value as usize))
                .ok_or_else(|| D::Error::custom(format!("'{}' is not a dimension", value))),
            value => Err(D::Error::custom(format!("'{}' is not a dimension", value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_extent() {
        // 3x3 conv, stride 2, padding 1
        assert_eq!(Dim::Size(256).window(3, 2, 1, 1), Some(Dim::Size(128)));
        // 2x2 pooling, stride 2
        assert_eq!(Dim::Size(64).window(2, 2, 0, 1), Some(Dim::Size(32)));
        // 1x1 conv keeps the extent
        assert_eq!(Dim::Size(7).window(1, 1, 0, 1), Some(Dim::Size(7)));
        assert_eq!(Dim::Infer.window(3, 2, 1, 1), Some(Dim::Infer));
        assert_eq!(Dim::Size(1).window(5, 1, 0, 1), None);
        assert_eq!(Dim::Size(8).window(3, 0, 1, 1), None);
    }

    #[test]
    fn overflowing_extents_are_rejected() {
        assert_eq!(Dim::Size(usize::MAX).scale_up(2), None);
        assert_eq!(Dim::Size(8).window(3, 1, usize::MAX / 2 + 1, 1), None);
        assert_eq!(Dim::Size(8).window(3, 1, 1, usize::MAX), None);
    }

    #[test]
    fn equalize_and_ratio() {
        assert_eq!(Dim::Size(4).equalize(&Dim::Infer), Some(Dim::Size(4)));
        assert_eq!(Dim::Size(4).equalize(&Dim::Size(5)), None);
        assert_eq!(Dim::Size(64).ratio(&Dim::Size(8)), Some(8));
        assert_eq!(Dim::Size(64).ratio(&Dim::Size(6)), None);
        assert_eq!(Dim::Infer.ratio(&Dim::Size(2)), None);
        assert_eq!(Dim::Size(8).scale_up(4), Some(Dim::Size(32)));
        assert_eq!(Dim::Infer.scale_up(4), Some(Dim::Infer));
    }

    #[test]
    fn serde_dim() {
        let dims: Vec<Dim> = serde_json::from_str(r#"["_", 3, 256]"#).unwrap();
        assert_eq!(dims, vec![Dim::Infer, Dim::Size(3), Dim::Size(256)]);
        assert!(serde_json::from_str::<Dim>(r#""x""#).is_err());
    }
}
