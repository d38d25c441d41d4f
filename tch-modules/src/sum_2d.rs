use crate::common::*;

#[derive(Debug)]
pub struct Sum2D {
    _private: [u8; 0],
}

impl Sum2D {
    pub fn new() -> Self {
        Self { _private: [] }
    }

    pub fn forward(
        &self,
        tensors: impl IntoIterator<Item = impl Borrow<Tensor>>,
    ) -> Result<Tensor> {
        let tensors: Vec<_> = tensors.into_iter().collect();
        let (first, rest) = tensors
            .split_first()
            .ok_or_else(|| format_err!("empty input is not allowed"))?;
        let first = first.borrow();
        let shape = first.size4()?;

        let output = rest
            .iter()
            .try_fold(first.shallow_clone(), |acc, tensor| -> Result<_> {
                let tensor = tensor.borrow();
                ensure!(
                    tensor.size4()? == shape,
                    "cannot sum tensors of shapes {:?} and {:?}",
                    shape,
                    tensor.size()
                );
                Ok(acc.f_add(tensor)?)
            })?;
        Ok(output)
    }
}

impl Default for Sum2D {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn sum_requires_equal_shapes() -> Result<()> {
        let sum = Sum2D::new();
        let lhs = Tensor::ones(&[2, 3, 4, 4], FLOAT_CPU);
        let rhs = Tensor::ones(&[2, 3, 4, 4], FLOAT_CPU) * 2.0;

        let output = sum.forward([&lhs, &rhs])?;
        assert_eq!(f64::from(output.mean(Kind::Float)), 3.0);

        let other = Tensor::ones(&[2, 3, 8, 8], FLOAT_CPU);
        assert!(sum.forward([&lhs, &other]).is_err());
        assert!(sum.forward(Vec::<Tensor>::new()).is_err());
        Ok(())
    }
}
