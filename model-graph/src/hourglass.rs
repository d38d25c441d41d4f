//! Construction of the recursive hourglass network.

use crate::{builder::GraphBuilder, common::*, graph::*};
use model_config::{
    BottleneckSpec, ConvBn2D, HourglassConfig, Input, InvertedBottleneck2D, MaxPool2D,
    ModulePath, Sum2D, UpSample2D,
};

impl Graph {
    /// Declare the hourglass network described by the config.
    pub fn hourglass(config: &HourglassConfig) -> Result<Self> {
        build_network(config, config.trainable)
    }
}

/// Build the full network: stem, backbone, nested hourglass stages and the
/// up-sampling of auxiliary outputs to the main resolution.
pub fn build_network(config: &HourglassConfig, trainable: bool) -> Result<Graph> {
    config.validate()?;

    let mut builder = HourglassBuilder::new(config);
    let input = builder.input()?;
    let features = builder.backbone(input)?;

    // the list is owned by this build only
    let mut auxiliary_keys = vec![];
    let output = builder.hourglass_module(features, config.num_stages, &mut auxiliary_keys)?;
    let auxiliary_keys = builder.resize_auxiliary(output, auxiliary_keys)?;

    let graph = builder.into_inner().build(output, auxiliary_keys, trainable)?;
    info!(
        "declared hourglass network with {} nodes, output shape {} and {} auxiliary outputs",
        graph.num_nodes(),
        graph.output_shape(),
        graph.auxiliary_keys().len()
    );

    Ok(graph)
}

/// Declares the layers of a hourglass network on top of a [GraphBuilder].
#[derive(Debug, Clone)]
pub struct HourglassBuilder<'a> {
    config: &'a HourglassConfig,
    graph: GraphBuilder,
}

impl<'a> HourglassBuilder<'a> {
    pub fn new(config: &'a HourglassConfig) -> Self {
        Self {
            config,
            graph: GraphBuilder::new(),
        }
    }

    pub fn graph(&self) -> &GraphBuilder {
        &self.graph
    }

    pub fn into_inner(self) -> GraphBuilder {
        self.graph
    }

    pub fn input(&mut self) -> Result<NodeKey> {
        let shape = self.config.input.shape();
        self.graph
            .add_node("input".parse()?, InputKeys::PlaceHolder, Input { shape })
    }

    /// The strided stem convolution followed by the backbone bottlenecks.
    pub fn backbone(&mut self, input: NodeKey) -> Result<NodeKey> {
        let config = self.config;
        let stem = {
            let c = config.out_channels(config.stem.c);
            ConvBn2D {
                s: config.stem.s,
                bias: !config.bn.enabled,
                act: config.activation,
                bn: config.bn.clone(),
                ..ConvBn2D::new(c, config.stem.k)
            }
        };
        let stem = self.graph.add_node("Conv2d_0".parse()?, input, stem)?;

        config
            .backbone
            .iter()
            .enumerate()
            .try_fold(stem, |prev, (index, spec)| -> Result<_> {
                let BottleneckSpec { t, c, s, k } = *spec;
                let path = ModulePath::empty().join_str(format!("bottleneck_{}", index))?;
                self.inverted_bottleneck(path, prev, t, config.out_channels(c), s, k)
            })
    }

    /// Declare `stage` nested hourglass levels on `input`.
    ///
    /// Each level appends its merged output to `auxiliary_keys` after the
    /// levels nested in it, so the innermost level comes first. Level 0 is a
    /// single bottleneck and appends nothing.
    pub fn hourglass_module(
        &mut self,
        input: NodeKey,
        stage: usize,
        auxiliary_keys: &mut Vec<NodeKey>,
    ) -> Result<NodeKey> {
        let config = self.config;
        let hg = &config.hourglass;
        let prefix = ModulePath::empty().join_str(format!("hourglass_{}", stage))?;
        let c = config.out_channels(hg.c);
        let keypoints = config.num_keypoints;

        if stage == 0 {
            return self.inverted_bottleneck(prefix.join_str("mid")?, input, hg.t, c, 1, hg.k);
        }

        // down-sample then the front tower
        let down = self
            .graph
            .add_node(prefix.join_str("downsample")?, input, MaxPool2D::down_sample(2))?;
        let front = (0..hg.front_depth).try_fold(down, |prev, index| -> Result<_> {
            let path = prefix.join_str(format!("front_{}", index))?;
            self.inverted_bottleneck(path, prev, hg.t, c, 1, hg.k)
        })?;

        let inner = self.hourglass_module(front, stage - 1, auxiliary_keys)?;

        // back to the keypoint channels and the outer resolution
        let back =
            self.inverted_bottleneck(prefix.join_str("back")?, inner, hg.t, keypoints, 1, hg.k)?;
        let up = self.graph.add_node(
            prefix.join_str("upsample")?,
            back,
            UpSample2D {
                scale: 2,
                mode: config.up_sample,
            },
        )?;

        // jump branch on the level input, the last block emits keypoint channels
        let jump = (0..hg.jump_depth).try_fold(input, |prev, index| -> Result<_> {
            let path = prefix.join_str(format!("jump_{}", index))?;
            let out_c = if index + 1 == hg.jump_depth { keypoints } else { c };
            self.inverted_bottleneck(path, prev, hg.t, out_c, 1, hg.k)
        })?;

        let sum = self
            .graph
            .add_node(prefix.join_str("out")?, vec![up, jump], Sum2D::default())?;
        auxiliary_keys.push(sum);

        Ok(sum)
    }

    /// Up-sample every auxiliary output whose height differs from the main output.
    pub fn resize_auxiliary(
        &mut self,
        output: NodeKey,
        auxiliary_keys: Vec<NodeKey>,
    ) -> Result<Vec<NodeKey>> {
        let [out_h, _out_w] = self.spatial(output)?;

        auxiliary_keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| -> Result<_> {
                let [aux_h, _aux_w] = self.spatial(key)?;
                if aux_h == out_h {
                    return Ok(key);
                }

                let scale = out_h.ratio(&aux_h).ok_or_else(|| {
                    format_err!(
                        "the auxiliary output height {} does not divide the output height {}",
                        aux_h,
                        out_h
                    )
                })?;
                self.graph.add_node(
                    ModulePath::empty().join_str(format!("upsample_for_loss_{}", index))?,
                    key,
                    UpSample2D {
                        scale,
                        mode: self.config.up_sample,
                    },
                )
            })
            .try_collect()
    }

    fn inverted_bottleneck(
        &mut self,
        path: ModulePath,
        input: NodeKey,
        t: usize,
        c: usize,
        s: usize,
        k: usize,
    ) -> Result<NodeKey> {
        let config = self.config;
        let block = InvertedBottleneck2D {
            act: config.activation,
            bn: config.bn.clone(),
            ..InvertedBottleneck2D::new(config.expansion(t), c, s, k)
        };
        self.graph.add_node(path, input, block)
    }

    fn spatial(&self, key: NodeKey) -> Result<[Dim; 2]> {
        let shape = self.graph.output_shape(key)?;
        shape
            .spatial()
            .ok_or_else(|| format_err!("the node {} has a non-image shape {}", key, shape))
    }
}
