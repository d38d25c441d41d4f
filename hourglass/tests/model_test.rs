use anyhow::Result;
use approx::assert_abs_diff_eq;
use hourglass::{HourglassModel, MultiStageLoss};
use model_config::HourglassConfig;
use model_graph::Graph;
use std::collections::BTreeMap;
use tch::{kind::FLOAT_CPU, nn, Device, Kind, Tensor};

lazy_static::lazy_static! {
    static ref SMALL_CONFIG: HourglassConfig = HourglassConfig {
        input: model_config::InputSize { h: 64, w: 64, c: 3 },
        num_stages: 2,
        ..Default::default()
    };
}

fn variable_sums(vs: &nn::VarStore) -> BTreeMap<String, f64> {
    vs.variables()
        .into_iter()
        .map(|(name, var)| (name, f64::from(var.sum(Kind::Float))))
        .collect()
}

#[test]
fn default_model_forward() -> Result<()> {
    let vs = nn::VarStore::new(Device::Cpu);
    let model = HourglassModel::new(&vs.root(), &HourglassConfig::default())?;
    assert_eq!(model.num_stages(), 4);
    assert_eq!(model.output_shape().to_string(), "[_, 14, 64, 64]");

    let input = Tensor::rand(&[2, 3, 256, 256], FLOAT_CPU);
    let output = tch::no_grad(|| model.forward_t(&input, false))?;

    assert_eq!(output.output.size(), vec![2, 14, 64, 64]);
    assert_eq!(output.auxiliary.len(), 4);
    for aux in &output.auxiliary {
        assert_eq!(aux.size(), vec![2, 14, 64, 64]);
    }
    Ok(())
}

#[test]
fn variables_follow_module_paths() -> Result<()> {
    let vs = nn::VarStore::new(Device::Cpu);
    let _model = HourglassModel::new(&vs.root(), &SMALL_CONFIG)?;
    let variables = vs.variables();

    assert!(variables.contains_key("Conv2d_0.conv.weight"));
    assert!(variables.contains_key("hourglass_2.front_0.expand.conv.weight"));
    assert!(variables.contains_key("hourglass_0.mid.project.bn.running_var"));
    Ok(())
}

#[test]
fn reject_mismatched_input() -> Result<()> {
    let vs = nn::VarStore::new(Device::Cpu);
    let model = HourglassModel::new(&vs.root(), &SMALL_CONFIG)?;

    let input = Tensor::rand(&[1, 3, 32, 64], FLOAT_CPU);
    assert!(model.forward_t(&input, false).is_err());
    Ok(())
}

#[test]
fn models_do_not_share_outputs() -> Result<()> {
    let vs = nn::VarStore::new(Device::Cpu);
    let large = HourglassModel::new(&vs.root() / "large", &SMALL_CONFIG)?;
    let small = HourglassModel::new(
        &vs.root() / "small",
        &HourglassConfig {
            num_stages: 1,
            ..SMALL_CONFIG.clone()
        },
    )?;

    let input = Tensor::rand(&[1, 3, 64, 64], FLOAT_CPU);
    let large_output = large.forward_t(&input, true)?;
    let small_output = small.forward_t(&input, true)?;
    let large_again = large.forward_t(&input, true)?;

    assert_eq!(large_output.auxiliary.len(), 2);
    assert_eq!(small_output.auxiliary.len(), 1);
    assert_eq!(large_again.auxiliary.len(), 2);
    Ok(())
}

#[test]
fn frozen_model_has_no_gradients() -> Result<()> {
    let vs = nn::VarStore::new(Device::Cpu);
    let graph = model_graph::build_network(&SMALL_CONFIG, false)?;
    let model = HourglassModel::from_graph(&vs.root(), &graph)?;
    assert!(!model.trainable());
    assert!(vs.variables().values().all(|var| !var.requires_grad()));

    // running statistics stay untouched in training mode
    let before = variable_sums(&vs);
    let input = Tensor::rand(&[2, 3, 64, 64], FLOAT_CPU);
    let _ = model.forward_t(&input, true)?;
    assert_eq!(before, variable_sums(&vs));
    Ok(())
}

#[test]
fn multi_stage_loss() -> Result<()> {
    let vs = nn::VarStore::new(Device::Cpu);
    let model = HourglassModel::new(&vs.root(), &SMALL_CONFIG)?;
    let loss_fn = MultiStageLoss::new();

    let input = Tensor::rand(&[3, 3, 64, 64], FLOAT_CPU);
    let output = model.forward_t(&input, true)?;
    let target = Tensor::zeros(&[3, 14, 16, 16], FLOAT_CPU);
    let loss = loss_fn.forward(&output, &target)?;

    assert_eq!(loss.stages.len(), 2);
    let expected: f64 = output
        .auxiliary
        .iter()
        .map(|aux| f64::from(aux.square().sum(Kind::Float)) / 3.0)
        .sum();
    assert_abs_diff_eq!(f64::from(&loss.total), expected, epsilon = 1e-3 * expected.max(1.0));

    // gradients reach the stem
    loss.total.backward();
    let variables = vs.variables();
    let stem = &variables["Conv2d_0.conv.weight"];
    assert!(f64::from(stem.grad().abs().sum(Kind::Float)) > 0.0);

    let wrong_target = Tensor::zeros(&[3, 14, 8, 8], FLOAT_CPU);
    assert!(loss_fn.forward(&output, &wrong_target).is_err());
    Ok(())
}

#[test]
fn graph_and_model_agree() -> Result<()> {
    let graph = Graph::hourglass(&SMALL_CONFIG)?;
    let vs = nn::VarStore::new(Device::Cpu);
    let model = HourglassModel::from_graph(&vs.root(), &graph)?;

    assert_eq!(model.layers().len(), graph.num_nodes());
    let num_params: usize = vs.trainable_variables().iter().map(|var| var.numel()).sum();
    assert_eq!(num_params, graph.num_parameters()?);
    Ok(())
}
