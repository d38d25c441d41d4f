//! Hyper-parameters of the recursive hourglass network.

use crate::{common::*, module::*};

/// The network configuration, loadable from a JSON5 file.
///
/// Every field falls back to the reference architecture: a 256×256 RGB
/// input, 14 keypoints and 4 recursive hourglass stages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HourglassConfig {
    pub input: InputSize,
    pub num_keypoints: usize,
    pub num_stages: usize,
    /// Whether parameters receive gradients and batch norms update their statistics.
    pub trainable: bool,
    /// Multiplier on every channel count except the keypoint heads.
    pub width_multiplier: R64,
    /// Multiplier on every bottleneck expansion ratio.
    pub expansion_multiplier: R64,
    pub stem: StemConfig,
    pub backbone: Vec<BottleneckSpec>,
    pub hourglass: HourglassStageConfig,
    pub up_sample: UpSampleMode,
    pub activation: Activation,
    pub bn: BatchNorm,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputSize {
    pub h: usize,
    pub w: usize,
    pub c: usize,
}

impl InputSize {
    pub fn shape(&self) -> Shape {
        Shape::nchw_infer_batch(self.c, self.h, self.w)
    }
}

impl Default for InputSize {
    fn default() -> Self {
        Self {
            h: 256,
            w: 256,
            c: 3,
        }
    }
}

/// The leading strided convolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StemConfig {
    pub c: usize,
    pub k: usize,
    pub s: usize,
}

impl Default for StemConfig {
    fn default() -> Self {
        Self { c: 16, k: 3, s: 2 }
    }
}

/// One inverted bottleneck of the backbone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BottleneckSpec {
    pub t: usize,
    pub c: usize,
    #[serde(default = "default_stride")]
    pub s: usize,
    #[serde(default = "default_kernel")]
    pub k: usize,
}

impl BottleneckSpec {
    pub fn new(t: usize, c: usize, s: usize, k: usize) -> Self {
        Self { t, c, s, k }
    }
}

/// The blocks repeated in every hourglass stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HourglassStageConfig {
    pub t: usize,
    pub c: usize,
    pub k: usize,
    /// Bottlenecks applied after the down-sampling max pool.
    pub front_depth: usize,
    /// Bottlenecks of the full resolution jump branch.
    pub jump_depth: usize,
}

impl Default for HourglassStageConfig {
    fn default() -> Self {
        Self {
            t: 6,
            c: 24,
            k: 3,
            front_depth: 5,
            jump_depth: 5,
        }
    }
}

impl Default for HourglassConfig {
    fn default() -> Self {
        Self {
            input: InputSize::default(),
            num_keypoints: 14,
            num_stages: 4,
            trainable: true,
            width_multiplier: r64(1.0),
            expansion_multiplier: r64(1.0),
            stem: StemConfig::default(),
            backbone: vec![
                BottleneckSpec::new(1, 16, 1, 3),
                BottleneckSpec::new(1, 16, 1, 3),
                BottleneckSpec::new(6, 24, 2, 3),
                BottleneckSpec::new(6, 24, 1, 3),
                BottleneckSpec::new(6, 24, 1, 3),
                BottleneckSpec::new(6, 24, 1, 3),
                BottleneckSpec::new(6, 24, 1, 3),
            ],
            hourglass: HourglassStageConfig::default(),
            up_sample: UpSampleMode::default(),
            activation: Activation::default(),
            bn: BatchNorm::default(),
        }
    }
}

impl HourglassConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = Self::from_json5_str(&text)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        debug!("loaded config file '{}'", path.display());
        Ok(config)
    }

    pub fn from_json5_str(text: &str) -> Result<Self> {
        let config: Self = json5::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Scale a channel count by the width multiplier, truncating.
    pub fn out_channels(&self, c: usize) -> usize {
        (self.width_multiplier * c as f64).raw() as usize
    }

    /// Scale an expansion ratio by the expansion multiplier, truncating.
    pub fn expansion(&self, t: usize) -> usize {
        (self.expansion_multiplier * t as f64).raw() as usize
    }

    /// Total stride from the input to the innermost hourglass stage, or
    /// `None` if it overflows.
    pub fn down_sample_factor(&self) -> Option<usize> {
        let stages = 2usize.checked_pow(self.num_stages.try_into().ok()?)?;
        self.backbone
            .iter()
            .try_fold(self.stem.s, |factor, spec| factor.checked_mul(spec.s))?
            .checked_mul(stages)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            ref input,
            num_keypoints,
            num_stages,
            width_multiplier,
            expansion_multiplier,
            ref stem,
            ref backbone,
            ref hourglass,
            ..
        } = *self;

        ensure!(
            input.h > 0 && input.w > 0 && input.c > 0,
            "input size must be positive"
        );
        ensure!(num_keypoints > 0, "num_keypoints must be positive");
        ensure!(
            width_multiplier > 0.0 && expansion_multiplier > 0.0,
            "multipliers must be positive"
        );
        ensure!(
            stem.k > 0 && stem.s > 0 && self.out_channels(stem.c) > 0,
            "invalid stem {:?}",
            stem
        );

        backbone.iter().enumerate().try_for_each(|(index, spec)| {
            ensure!(
                spec.s > 0 && spec.k % 2 == 1,
                "backbone block {} must have a positive stride and an odd kernel size",
                index
            );
            ensure!(
                self.out_channels(spec.c) > 0 && self.expansion(spec.t) > 0,
                "backbone block {} is scaled to zero channels",
                index
            );
            Ok(())
        })?;

        ensure!(
            hourglass.k % 2 == 1,
            "hourglass kernel size must be odd"
        );
        ensure!(
            self.out_channels(hourglass.c) > 0 && self.expansion(hourglass.t) > 0,
            "hourglass blocks are scaled to zero channels"
        );
        ensure!(
            hourglass.jump_depth > 0,
            "jump_depth must be positive to reach the keypoint channels"
        );

        let factor = self.down_sample_factor().ok_or_else(|| {
            format_err!(
                "the down-sampling factor of {} stages overflows",
                num_stages
            )
        })?;
        ensure!(
            input.h % factor == 0 && input.w % factor == 0,
            "input size {}x{} must be divisible by the down-sampling factor {}",
            input.h,
            input.w,
            factor
        );

        Ok(())
    }
}

fn default_stride() -> usize {
    1
}

fn default_kernel() -> usize {
    3
}
