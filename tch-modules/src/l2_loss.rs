use crate::common::*;

/// Squared error between a prediction and its target.
#[derive(Debug)]
pub struct L2Loss {
    reduction: Reduction,
}

impl L2Loss {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }

    pub fn forward(&self, input: &Tensor, target: &Tensor) -> Result<Tensor> {
        ensure!(
            input.size() == target.size(),
            "input shape {:?} does not match target shape {:?}",
            input.size(),
            target.size()
        );

        // return zero tensor if (1) input is empty and (2) using mean reduction
        if input.numel() == 0 && self.reduction == Reduction::Mean {
            return Ok(Tensor::zeros(&[], (Kind::Float, input.device())).set_requires_grad(false));
        }

        let loss = (input - target).square();

        let loss = match self.reduction {
            Reduction::None => loss,
            Reduction::Sum => loss.sum(Kind::Float),
            Reduction::Mean => loss.mean(Kind::Float),
            Reduction::Other(_) => bail!("unsupported reduction {:?}", self.reduction),
        };
        Ok(loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn l2_loss_reductions() -> Result<()> {
        let input = Tensor::of_slice(&[1.0f32, 2.0, 3.0]);
        let target = Tensor::of_slice(&[1.0f32, 0.0, 0.0]);

        let sum = L2Loss::new(Reduction::Sum).forward(&input, &target)?;
        assert_abs_diff_eq!(f64::from(sum), 13.0, epsilon = 1e-6);

        let mean = L2Loss::new(Reduction::Mean).forward(&input, &target)?;
        assert_abs_diff_eq!(f64::from(mean), 13.0 / 3.0, epsilon = 1e-6);

        let empty = Tensor::zeros(&[0], FLOAT_CPU);
        let zero = L2Loss::new(Reduction::Mean).forward(&empty, &empty)?;
        assert_eq!(f64::from(zero), 0.0);

        assert!(L2Loss::new(Reduction::Sum)
            .forward(&input, &Tensor::zeros(&[2], FLOAT_CPU))
            .is_err());
        Ok(())
    }
}
