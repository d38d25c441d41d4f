use crate::{common::*, graph::*};
use model_config::{Module, ModuleEx, ModulePath, ShapeInput};

/// Declares nodes one by one, inferring each output shape on insertion.
///
/// Nodes can only consume nodes declared before them, so the insertion order
/// is a valid evaluation order.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: IndexMap<NodeKey, Node>,
    paths: IndexSet<ModulePath>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, key: NodeKey) -> Result<&Node> {
        self.nodes
            .get(&key)
            .ok_or_else(|| format_err!("the node {} does not exist", key))
    }

    pub fn output_shape(&self, key: NodeKey) -> Result<&Shape> {
        Ok(&self.node(key)?.output_shape)
    }

    /// Declare a node and return its key.
    pub fn add_node(
        &mut self,
        path: ModulePath,
        input_keys: impl Into<InputKeys>,
        config: impl Into<Module>,
    ) -> Result<NodeKey> {
        let input_keys = input_keys.into();
        let config = config.into();

        ensure!(
            !self.paths.contains(&path),
            "the module path '{}' is declared twice",
            path
        );

        let output_shape = {
            let input_shape = match &input_keys {
                InputKeys::None | InputKeys::PlaceHolder => ShapeInput::PlaceHolder,
                InputKeys::Single(src_key) => ShapeInput::SingleTensor(self.output_shape(*src_key)?),
                InputKeys::Indexed(src_keys) => {
                    ensure!(!src_keys.is_empty(), "the node '{}' has no inputs", path);
                    let shapes: Vec<_> = src_keys
                        .iter()
                        .map(|&src_key| self.output_shape(src_key))
                        .try_collect()?;
                    ShapeInput::IndexedTensors(shapes)
                }
            };

            config.output_shape(input_shape.clone()).ok_or_else(|| {
                format_err!(
                    "cannot infer the output shape of '{}' ({}) from the input {:?}",
                    path,
                    config.as_ref(),
                    input_shape
                )
            })?
        };

        let key = NodeKey(self.nodes.len());
        debug!(
            "node {} '{}' {} -> {}",
            key,
            path,
            config.as_ref(),
            output_shape
        );

        self.paths.insert(path.clone());
        self.nodes.insert(
            key,
            Node {
                input_keys,
                output_shape,
                path,
                config,
            },
        );

        Ok(key)
    }

    /// Finish the graph with its main output and auxiliary outputs.
    pub fn build(
        self,
        output_key: NodeKey,
        auxiliary_keys: Vec<NodeKey>,
        trainable: bool,
    ) -> Result<Graph> {
        let Self { nodes, .. } = self;

        iter::once(&output_key)
            .chain(auxiliary_keys.iter())
            .try_for_each(|key| {
                ensure!(nodes.contains_key(key), "the output node {} does not exist", key);
                Ok(())
            })?;

        Ok(Graph {
            nodes,
            output_key,
            auxiliary_keys,
            trainable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_config::{Input, MaxPool2D, Sum2D};

    #[test]
    fn shape_inference_on_insertion() -> Result<()> {
        let mut builder = GraphBuilder::new();
        let input = builder.add_node(
            "input".parse()?,
            InputKeys::PlaceHolder,
            Input {
                shape: Shape::nchw_infer_batch(3, 16, 16),
            },
        )?;
        let pool = builder.add_node("pool".parse()?, input, MaxPool2D::down_sample(2))?;
        assert_eq!(
            builder.output_shape(pool)?,
            &Shape::nchw_infer_batch(3, 8, 8)
        );

        // mismatched extents cannot be summed
        let result = builder.add_node("sum".parse()?, vec![input, pool], Sum2D::default());
        assert!(result.is_err());

        // paths are unique
        let result = builder.add_node("pool".parse()?, input, MaxPool2D::down_sample(2));
        assert!(result.is_err());

        let graph = builder.build(pool, vec![], true)?;
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.input_keys().collect::<Vec<_>>(), vec![input]);
        Ok(())
    }
}
