use crate::common::*;

/// Interpolation used by [UpSample2D].
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum UpSampleMode {
    Nearest,
    Bilinear,
}

#[derive(Debug, Clone)]
pub struct UpSample2D {
    scale: i64,
    mode: UpSampleMode,
}

impl UpSample2D {
    pub fn new(scale: usize, mode: UpSampleMode) -> Result<Self> {
        ensure!(scale > 0, "invalid scale value {}", scale);
        Ok(Self {
            scale: scale as i64,
            mode,
        })
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let Self { scale, mode } = *self;
        let (_b, _c, in_h, in_w) = input.size4()?;
        let out_size = [in_h * scale, in_w * scale];

        let output = match mode {
            UpSampleMode::Nearest => input.f_upsample_nearest2d(&out_size, None, None)?,
            UpSampleMode::Bilinear => {
                input.f_upsample_bilinear2d(&out_size, false, None, None)?
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn up_sample_by_scale() -> Result<()> {
        let input = Tensor::rand(&[1, 2, 4, 3], FLOAT_CPU);

        for mode in [UpSampleMode::Nearest, UpSampleMode::Bilinear] {
            let output = UpSample2D::new(4, mode)?.forward(&input)?;
            assert_eq!(output.size(), vec![1, 2, 16, 12]);
        }

        // a constant map stays constant
        let ones = Tensor::ones(&[1, 1, 2, 2], FLOAT_CPU);
        let output = UpSample2D::new(2, UpSampleMode::Bilinear)?.forward(&ones)?;
        assert_abs_diff_eq!(f64::from(output.min()), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f64::from(output.max()), 1.0, epsilon = 1e-6);

        assert!(UpSample2D::new(0, UpSampleMode::Nearest).is_err());
        Ok(())
    }
}
