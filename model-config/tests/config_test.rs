use anyhow::Result;
use model_config::{
    Activation, HourglassConfig, InvertedBottleneck2D, ModuleEx, ShapeInput, UpSampleMode,
};
use noisy_float::prelude::*;
use std::path::{Path, PathBuf};
use tensor_shape::Shape;

lazy_static::lazy_static! {
    static ref CONFIG_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cfg");
    static ref INVALID_CONFIG_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("invalid-cfg");
}

fn list_configs(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.json5");
    let paths: Vec<_> = glob::glob(&pattern.to_string_lossy())?.collect::<Result<_, _>>()?;
    anyhow::ensure!(!paths.is_empty(), "no config files found in '{}'", dir.display());
    Ok(paths)
}

#[test]
fn load_valid_configs() -> Result<()> {
    list_configs(&CONFIG_DIR)?.iter().try_for_each(|path| -> Result<_> {
        let config = HourglassConfig::load(path)?;
        config.validate()?;
        Ok(())
    })?;
    Ok(())
}

#[test]
fn reject_invalid_configs() -> Result<()> {
    for path in list_configs(&INVALID_CONFIG_DIR)? {
        assert!(
            HourglassConfig::load(&path).is_err(),
            "'{}' should be rejected",
            path.display()
        );
    }
    Ok(())
}

#[test]
fn empty_config_takes_defaults() -> Result<()> {
    let config = HourglassConfig::load(CONFIG_DIR.join("hourglass-default.json5"))?;
    assert_eq!(config, HourglassConfig::default());
    assert_eq!(config.input.shape(), Shape::nchw_infer_batch(3, 256, 256));
    assert_eq!(config.num_keypoints, 14);
    assert_eq!(config.num_stages, 4);
    assert_eq!(config.backbone.len(), 7);
    assert_eq!(config.down_sample_factor(), Some(64));
    assert!(config.trainable);
    Ok(())
}

#[test]
fn partial_config_overrides() -> Result<()> {
    let config = HourglassConfig::load(CONFIG_DIR.join("hourglass-2-stages.json5"))?;
    assert_eq!(config.num_stages, 2);
    assert_eq!(config.num_keypoints, 17);
    assert_eq!(config.input.shape(), Shape::nchw_infer_batch(3, 192, 128));
    assert_eq!(config.up_sample, UpSampleMode::Nearest);
    assert_eq!(config.hourglass.front_depth, 5);

    let config = HourglassConfig::load(CONFIG_DIR.join("hourglass-no-stages.json5"))?;
    assert_eq!(config.num_stages, 0);
    assert_eq!(config.activation, Activation::HardSwish);
    assert_eq!(config.down_sample_factor(), Some(4));
    Ok(())
}

#[test]
fn multipliers_truncate() -> Result<()> {
    let config = HourglassConfig::load(CONFIG_DIR.join("hourglass-half-width.json5"))?;
    assert!(!config.trainable);
    assert_eq!(config.out_channels(16), 8);
    assert_eq!(config.out_channels(25), 12);
    assert_eq!(config.expansion(1), 1);
    assert_eq!(config.expansion(6), 9);
    assert_eq!(config.bn.momentum, r64(0.1));
    Ok(())
}

#[test]
fn overflowing_sizes_are_rejected() -> Result<()> {
    for stages in [62, 63, 64, 1000] {
        let text = format!("{{num_stages: {}}}", stages);
        assert!(HourglassConfig::from_json5_str(&text).is_err());
    }

    let config = HourglassConfig {
        num_stages: 63,
        ..Default::default()
    };
    assert_eq!(config.down_sample_factor(), None);
    assert!(config.validate().is_err());

    let text = format!("{{stem: {{c: 16, k: 3, s: {}}}}}", 1u64 << 62);
    assert!(HourglassConfig::from_json5_str(&text).is_err());
    Ok(())
}

#[test]
fn overflowing_parameter_counts_are_unknown() -> Result<()> {
    let input = Shape::nchw_infer_batch(usize::MAX / 2, 8, 8);
    let block = InvertedBottleneck2D::new(6, 24, 1, 3);
    assert!(block.output_shape(ShapeInput::from(&input)).is_none());
    assert!(block.num_parameters(ShapeInput::from(&input)).is_none());

    let input = Shape::nchw_infer_batch(24, 8, 8);
    // expand 24 -> 144, depthwise 3x3, project 144 -> 24, each with a batch norm
    assert_eq!(block.num_parameters(ShapeInput::from(&input)), Some(8832));
    Ok(())
}
