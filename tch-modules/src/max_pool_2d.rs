use crate::common::*;

#[derive(Debug, Clone)]
pub struct MaxPool2D {
    k: i64,
    s: i64,
    p: i64,
}

impl MaxPool2D {
    pub fn new(k: usize, s: usize, p: usize) -> Result<Self> {
        ensure!(k > 0 && s > 0, "kernel size and stride must be positive");
        ensure!(p <= k / 2, "padding must not exceed half of the kernel size");
        Ok(Self {
            k: k as i64,
            s: s as i64,
            p: p as i64,
        })
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let Self { k, s, p } = *self;
        input.size4()?;
        let output = input.f_max_pool2d(&[k, k], &[s, s], &[p, p], &[1, 1], false)?;
        Ok(output)
    }
}
