use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchNorm {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_affine")]
    pub affine: bool,
    #[serde(default = "default_eps")]
    pub eps: R64,
    #[serde(default = "default_momentum")]
    pub momentum: R64,
}

impl BatchNorm {
    /// Number of learnable parameters on `channels` features.
    pub fn num_parameters(&self, channels: usize) -> Option<usize> {
        if self.enabled && self.affine {
            channels.checked_mul(2)
        } else {
            Some(0)
        }
    }
}

impl Default for BatchNorm {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            affine: default_affine(),
            eps: default_eps(),
            momentum: default_momentum(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_affine() -> bool {
    true
}

fn default_eps() -> R64 {
    r64(1e-3)
}

// equals to a moving average decay of 0.999
fn default_momentum() -> R64 {
    r64(1e-3)
}
