use crate::common::*;
use model_config::{self as config, HourglassConfig, ModulePath};
use model_graph as graph;
use tch_modules as modules;

/// The hourglass network instantiated on libtorch.
#[derive(Debug, getset::Getters, getset::CopyGetters)]
pub struct HourglassModel {
    #[getset(get = "pub")]
    pub(crate) layers: IndexMap<graph::NodeKey, Layer>,
    pub(crate) output_key: graph::NodeKey,
    pub(crate) auxiliary_keys: Vec<graph::NodeKey>,
    #[getset(get = "pub")]
    pub(crate) output_shape: Shape,
    #[getset(get_copy = "pub")]
    pub(crate) trainable: bool,
}

/// The heatmaps of one forward pass.
#[derive(Debug)]
pub struct HourglassOutput {
    /// The heatmap of the outermost stage.
    pub output: Tensor,
    /// One heatmap per stage at the output resolution, innermost stage first.
    pub auxiliary: Vec<Tensor>,
}

impl HourglassModel {
    /// Declare the network from the config and instantiate it under `path`.
    pub fn new<'p>(path: impl Borrow<nn::Path<'p>>, config: &HourglassConfig) -> Result<Self> {
        let graph = graph::Graph::hourglass(config)?;
        Self::from_graph(path, &graph)
    }

    /// Build a model from a computation graph.
    pub fn from_graph<'p>(
        path: impl Borrow<nn::Path<'p>>,
        orig_graph: &graph::Graph,
    ) -> Result<Self> {
        let path = path.borrow();
        let trainable = orig_graph.trainable();

        let layers: IndexMap<_, _> = orig_graph
            .nodes()
            .iter()
            .map(|(&key, node)| -> Result<_> {
                let graph::Node {
                    input_keys,
                    config,
                    path: node_path,
                    ..
                } = node;
                let module_path = sub_path(path, node_path)?;

                // channels of the single input
                let in_c = || -> Result<usize> {
                    let src_key = input_keys.single().ok_or_else(|| {
                        format_err!("the node '{}' expects a single input", node_path)
                    })?;
                    orig_graph
                        .node(src_key)?
                        .output_shape
                        .channels()
                        .and_then(|c| c.size())
                        .ok_or_else(|| {
                            format_err!("the input channels of '{}' are not known", node_path)
                        })
                };

                let module: modules::Module = match *config {
                    config::Module::Input(config::Input { ref shape }) => {
                        modules::Input::new(shape).into()
                    }
                    config::Module::ConvBn2D(config::ConvBn2D {
                        c,
                        k,
                        s,
                        p,
                        d,
                        g,
                        bias,
                        act,
                        ref bn,
                    }) => modules::ConvBn2DInit {
                        in_c: in_c()?,
                        out_c: c,
                        k,
                        s,
                        p,
                        d,
                        g,
                        bias,
                        activation: act,
                        batch_norm: batch_norm_init(bn),
                        trainable,
                    }
                    .build(module_path)
                    .into(),
                    config::Module::SeparableConv2D(config::SeparableConv2D {
                        c,
                        k,
                        s,
                        act,
                        ref bn,
                    }) => modules::SeparableConv2DInit {
                        in_c: in_c()?,
                        out_c: c,
                        k,
                        s,
                        activation: act,
                        batch_norm: batch_norm_init(bn),
                        trainable,
                    }
                    .build(module_path)
                    .into(),
                    config::Module::InvertedBottleneck2D(config::InvertedBottleneck2D {
                        t,
                        c,
                        s,
                        k,
                        act,
                        ref bn,
                    }) => modules::InvertedBottleneck2DInit {
                        in_c: in_c()?,
                        out_c: c,
                        t,
                        k,
                        s,
                        activation: act,
                        batch_norm: batch_norm_init(bn),
                        trainable,
                    }
                    .build(module_path)
                    .into(),
                    config::Module::MaxPool2D(config::MaxPool2D { k, s, p }) => {
                        modules::MaxPool2D::new(k, s, p)?.into()
                    }
                    config::Module::UpSample2D(config::UpSample2D { scale, mode }) => {
                        let mode = match mode {
                            config::UpSampleMode::Nearest => modules::UpSampleMode::Nearest,
                            config::UpSampleMode::Bilinear => modules::UpSampleMode::Bilinear,
                        };
                        modules::UpSample2D::new(scale, mode)?.into()
                    }
                    config::Module::Sum2D(_) => modules::Sum2D::new().into(),
                };

                let layer = Layer {
                    key,
                    path: node_path.clone(),
                    input_keys: input_keys.to_owned(),
                    module,
                };

                Ok((key, layer))
            })
            .try_collect()?;

        let output_key = orig_graph.output_key();
        let auxiliary_keys = orig_graph.auxiliary_keys().to_owned();
        let output_shape = orig_graph.output_shape().clone();

        info!(
            "instantiated hourglass model with {} layers, {} auxiliary outputs, trainable={}",
            layers.len(),
            auxiliary_keys.len(),
            trainable
        );

        Ok(Self {
            layers,
            output_key,
            auxiliary_keys,
            output_shape,
            trainable,
        })
    }

    /// Run forward pass.
    pub fn forward_t(&self, input: &Tensor, train: bool) -> Result<HourglassOutput> {
        let Self {
            ref layers,
            output_key,
            ref auxiliary_keys,
            ..
        } = *self;
        let mut module_outputs: HashMap<graph::NodeKey, Tensor> = HashMap::new();
        let mut input = Some(input); // it makes sure the input is consumed at most once

        // run the network
        layers.values().try_for_each(|layer| -> Result<_> {
            let Layer {
                key,
                ref path,
                ref module,
                ref input_keys,
            } = *layer;

            let module_input: modules::ModuleInput = match input_keys {
                graph::InputKeys::None => modules::ModuleInput::None,
                graph::InputKeys::PlaceHolder => input
                    .take()
                    .ok_or_else(|| format_err!("the model has more than one input node"))?
                    .into(),
                graph::InputKeys::Single(src_key) => (&module_outputs[src_key]).into(),
                graph::InputKeys::Indexed(src_keys) => src_keys
                    .iter()
                    .map(|src_key| &module_outputs[src_key])
                    .collect::<Vec<_>>()
                    .into(),
            };

            let module_output = module
                .forward_t(module_input, train)
                .with_context(|| format!("forward error at node {} '{}'", key, path))?;
            module_outputs.insert(key, module_output);
            Ok(())
        })?;
        debug_assert!(input.is_none());

        // extract outputs
        let auxiliary: Vec<_> = auxiliary_keys
            .iter()
            .map(|key| module_outputs[key].shallow_clone())
            .collect();
        let output = module_outputs
            .remove(&output_key)
            .ok_or_else(|| format_err!("the output node {} was not evaluated", output_key))?;
        debug!(
            "forward pass: output {:?}, {} auxiliary outputs",
            output.size(),
            auxiliary.len()
        );

        Ok(HourglassOutput { output, auxiliary })
    }

    pub fn num_stages(&self) -> usize {
        self.auxiliary_keys.len()
    }
}

#[derive(Debug)]
pub struct Layer {
    pub(crate) key: graph::NodeKey,
    pub(crate) path: ModulePath,
    pub(crate) module: modules::Module,
    pub(crate) input_keys: graph::InputKeys,
}

/// Nest the variables of a node under its dot-separated module path.
fn sub_path<'p>(root: &nn::Path<'p>, module_path: &ModulePath) -> Result<nn::Path<'p>> {
    let (first, rest) = module_path
        .as_ref()
        .split_first()
        .ok_or_else(|| format_err!("a node has an empty module path"))?;
    let path = rest
        .iter()
        .fold(root / first.as_str(), |path, name| &path / name.as_str());
    Ok(path)
}

fn batch_norm_init(bn: &config::BatchNorm) -> Option<modules::BatchNorm2DInit> {
    let config::BatchNorm {
        enabled,
        affine,
        eps,
        momentum,
    } = *bn;

    enabled.then(|| modules::BatchNorm2DInit {
        eps,
        momentum,
        affine,
        ..Default::default()
    })
}
