use crate::common::*;

#[cfg(debug_assertions)]
static SMALL_VAR_WARN: std::sync::Once = std::sync::Once::new();

#[derive(Debug, Clone)]
pub struct BatchNorm2DInit {
    pub cudnn_enabled: bool,
    pub eps: R64,
    pub momentum: R64,
    /// Learn a per-channel scale and shift.
    pub affine: bool,
    /// Update the running statistics in training mode.
    pub trainable: bool,
}

#[derive(Debug)]
pub struct BatchNorm2D {
    running_mean: Tensor,
    running_var: Tensor,
    ws: Option<Tensor>,
    bs: Option<Tensor>,
    cudnn_enabled: bool,
    eps: f64,
    momentum: f64,
    trainable: bool,
}

impl Default for BatchNorm2DInit {
    fn default() -> Self {
        Self {
            cudnn_enabled: true,
            eps: r64(1e-3),
            momentum: r64(1e-3),
            affine: true,
            trainable: true,
        }
    }
}

impl BatchNorm2DInit {
    pub fn build<'a>(self, path: impl Borrow<nn::Path<'a>>, out_dim: i64) -> BatchNorm2D {
        let path = path.borrow();
        let Self {
            cudnn_enabled,
            eps,
            momentum,
            affine,
            trainable,
        } = self;

        let (ws, bs) = if affine {
            let ws = path.var("weight", &[out_dim], nn::Init::Const(1.0));
            let bs = path.var("bias", &[out_dim], nn::Init::Const(0.0));
            if !trainable {
                freeze(&ws);
                freeze(&bs);
            }
            (Some(ws), Some(bs))
        } else {
            (None, None)
        };

        BatchNorm2D {
            running_mean: path.zeros_no_train("running_mean", &[out_dim]),
            running_var: path.ones_no_train("running_var", &[out_dim]),
            ws,
            bs,
            cudnn_enabled,
            eps: eps.raw(),
            momentum: momentum.raw(),
            trainable,
        }
    }
}

impl nn::ModuleT for BatchNorm2D {
    fn forward_t(&self, input: &Tensor, train: bool) -> Tensor {
        let Self {
            ref running_mean,
            ref running_var,
            ref ws,
            ref bs,
            momentum,
            eps,
            cudnn_enabled,
            trainable,
        } = *self;

        // frozen layers always normalize with the running statistics
        let output = Tensor::batch_norm(
            input,
            ws.as_ref(),
            bs.as_ref(),
            Some(running_mean),
            Some(running_var),
            train && trainable,
            momentum,
            eps,
            cudnn_enabled,
        );

        #[cfg(debug_assertions)]
        {
            if bool::from(running_var.abs().le(1e-15).any()) {
                SMALL_VAR_WARN.call_once(|| {
                    warn!(
                        "running variance {} is too small",
                        f64::from(running_var.abs().min())
                    );
                });
            }
        }

        output
    }
}

impl BatchNorm2D {
    pub fn running_mean(&self) -> &Tensor {
        &self.running_mean
    }

    pub fn running_var(&self) -> &Tensor {
        &self.running_var
    }

    pub fn has_nan(&self) -> bool {
        let Self {
            ws,
            bs,
            running_mean,
            running_var,
            ..
        } = self;

        let has_nan = |tensor: &Tensor| bool::from(tensor.isnan().any());
        ws.as_ref().map(has_nan).unwrap_or(false)
            || bs.as_ref().map(has_nan).unwrap_or(false)
            || has_nan(running_mean)
            || has_nan(running_var)
    }
}
