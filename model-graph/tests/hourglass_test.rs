use anyhow::Result;
use model_config::{HourglassConfig, Module, ModulePath};
use model_graph::{build_network, Graph, HourglassBuilder, InputKeys};
use std::path::{Path, PathBuf};
use tensor_shape::Shape;

lazy_static::lazy_static! {
    static ref CONFIG_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("model-config")
        .join("tests")
        .join("cfg");
}

fn count_pools(graph: &Graph) -> usize {
    graph.count_modules(Module::is_max_pool_2d)
}

fn count_sums(graph: &Graph) -> usize {
    graph.count_modules(Module::is_sum_2d)
}

#[test]
fn build_all_configs() -> Result<()> {
    for path in glob::glob(&format!("{}/*.json5", CONFIG_DIR.display()))? {
        let config = HourglassConfig::load(path?)?;
        let graph = Graph::hourglass(&config)?;
        assert_eq!(graph.auxiliary_keys().len(), config.num_stages);
        assert!(graph.num_parameters()? > 0);
    }
    Ok(())
}

#[test]
fn default_network_shapes() -> Result<()> {
    let config = HourglassConfig::default();
    let graph = Graph::hourglass(&config)?;

    assert_eq!(graph.output_shape(), &Shape::nchw_infer_batch(14, 64, 64));
    assert_eq!(graph.auxiliary_keys().len(), 4);
    for shape in graph.auxiliary_shapes() {
        assert_eq!(shape, &Shape::nchw_infer_batch(14, 64, 64));
    }

    assert_eq!(count_pools(&graph), 4);
    assert_eq!(count_sums(&graph), 4);
    assert!(graph.find_by_path(&"hourglass_0.mid".parse()?).is_some());
    assert!(graph.find_by_path(&"Conv2d_0".parse()?).is_some());
    assert_eq!(graph.input_keys().count(), 1);
    assert!(graph.trainable());
    Ok(())
}

#[test]
fn auxiliary_outputs_innermost_first() -> Result<()> {
    let graph = Graph::hourglass(&HourglassConfig::default())?;
    let aux = graph.auxiliary_keys();

    // the three inner stages are up-sampled, the outermost one is the output itself
    let expected = [("hourglass_1.out", 8), ("hourglass_2.out", 16), ("hourglass_3.out", 32)];
    for (index, (src_path, src_h)) in expected.into_iter().enumerate() {
        let node = graph.node(aux[index])?;
        assert_eq!(
            node.path,
            format!("upsample_for_loss_{}", index).parse::<ModulePath>()?
        );

        let src_key = node.input_keys.single().unwrap();
        let src = graph.node(src_key)?;
        assert_eq!(src.path, src_path.parse::<ModulePath>()?);
        assert_eq!(src.output_shape, Shape::nchw_infer_batch(14, src_h, src_h));

        match &node.config {
            Module::UpSample2D(up) => assert_eq!(up.scale, 64 / src_h),
            _ => panic!("expect an up-sampling node"),
        }
    }

    assert_eq!(aux[3], graph.output_key());
    assert_eq!(
        graph.node(aux[3])?.path,
        "hourglass_4.out".parse::<ModulePath>()?
    );
    Ok(())
}

#[test]
fn recursion_depth_matches_stage() -> Result<()> {
    let config = HourglassConfig::default();

    for stage in 0..=4 {
        let mut builder = HourglassBuilder::new(&config);
        let input = builder.input()?;
        let features = builder.backbone(input)?;

        let mut aux = vec![];
        let output = builder.hourglass_module(features, stage, &mut aux)?;
        assert_eq!(aux.len(), stage);

        let graph = builder.into_inner().build(output, aux, true)?;
        assert_eq!(count_pools(&graph), stage);
        assert_eq!(count_sums(&graph), stage);
        assert!(graph.find_by_path(&"hourglass_0.mid".parse()?).is_some());

        let jumps = graph
            .nodes()
            .values()
            .filter(|node| {
                node.path
                    .last()
                    .map(|name| name.as_str().starts_with("jump_"))
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(jumps, stage * config.hourglass.jump_depth);
    }

    Ok(())
}

#[test]
fn base_case_is_a_single_block() -> Result<()> {
    let config = HourglassConfig::default();
    let mut builder = HourglassBuilder::new(&config);
    let input = builder.input()?;
    let features = builder.backbone(input)?;
    let num_nodes = builder.graph().len();

    let mut aux = vec![];
    let output = builder.hourglass_module(features, 0, &mut aux)?;
    assert!(aux.is_empty());
    assert_eq!(builder.graph().len(), num_nodes + 1);

    let node = builder.graph().node(output)?;
    assert_eq!(node.input_keys, InputKeys::Single(features));
    assert_eq!(node.output_shape, Shape::nchw_infer_batch(24, 64, 64));
    Ok(())
}

#[test]
fn zero_stages_has_no_hourglass() -> Result<()> {
    let config = HourglassConfig {
        num_stages: 0,
        ..Default::default()
    };
    let graph = Graph::hourglass(&config)?;

    assert!(graph.auxiliary_keys().is_empty());
    assert_eq!(count_pools(&graph), 0);
    assert_eq!(count_sums(&graph), 0);
    assert_eq!(graph.output_shape(), &Shape::nchw_infer_batch(24, 64, 64));
    Ok(())
}

#[test]
fn builds_do_not_share_auxiliary_outputs() -> Result<()> {
    let large = HourglassConfig::default();
    let small = HourglassConfig {
        num_stages: 2,
        ..Default::default()
    };

    let first = Graph::hourglass(&large)?;
    let second = Graph::hourglass(&small)?;
    let third = Graph::hourglass(&large)?;

    assert_eq!(first.auxiliary_keys().len(), 4);
    assert_eq!(second.auxiliary_keys().len(), 2);
    assert_eq!(third.auxiliary_keys().len(), 4);
    assert_eq!(first, third);
    Ok(())
}

#[test]
fn trainable_flag_is_stored() -> Result<()> {
    let config = HourglassConfig::default();
    let graph = build_network(&config, false)?;
    assert!(!graph.trainable());
    Ok(())
}

#[test]
fn width_multiplier_shrinks_parameters() -> Result<()> {
    let full = Graph::hourglass(&HourglassConfig::default())?;
    let half = Graph::hourglass(&HourglassConfig::load(
        CONFIG_DIR.join("hourglass-half-width.json5"),
    )?)?;

    // keypoint channels are not scaled
    assert_eq!(half.output_shape(), full.output_shape());
    assert!(half.num_parameters()? < full.num_parameters()?);
    Ok(())
}

#[test]
fn reject_indivisible_input() {
    let mut config = HourglassConfig::default();
    config.input.h = 250;
    assert!(Graph::hourglass(&config).is_err());
}

#[cfg(feature = "dot")]
#[test]
fn render_dot_file() -> Result<()> {
    let graph = Graph::hourglass(&HourglassConfig {
        num_stages: 1,
        ..Default::default()
    })?;

    let mut buf = vec![];
    graph.render_dot(&mut buf)?;
    let text = String::from_utf8(buf)?;
    assert!(text.starts_with("digraph hourglass"));
    assert!(text.contains("hourglass_1.out"));
    Ok(())
}
