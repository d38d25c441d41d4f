use crate::common::*;
use model_config::{Module, ModuleEx, ModulePath, ShapeInput};

pub use graph::*;
pub use input_keys::*;
pub use node_key::*;

mod graph {
    use super::*;

    /// A declared network: nodes in topological order plus the keys of its outputs.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, getset::Getters, getset::CopyGetters)]
    pub struct Graph {
        #[getset(get = "pub")]
        pub(crate) nodes: IndexMap<NodeKey, Node>,
        #[getset(get_copy = "pub")]
        pub(crate) output_key: NodeKey,
        /// Intermediate supervision outputs, innermost stage first.
        #[getset(get = "pub")]
        pub(crate) auxiliary_keys: Vec<NodeKey>,
        #[getset(get_copy = "pub")]
        pub(crate) trainable: bool,
    }

    impl Graph {
        pub fn node(&self, key: NodeKey) -> Result<&Node> {
            self.nodes
                .get(&key)
                .ok_or_else(|| format_err!("the node {} does not exist", key))
        }

        pub fn output_shape(&self) -> &Shape {
            &self.nodes[&self.output_key].output_shape
        }

        pub fn auxiliary_shapes(&self) -> impl Iterator<Item = &Shape> {
            self.auxiliary_keys
                .iter()
                .map(move |key| &self.nodes[key].output_shape)
        }

        /// The keys of placeholder nodes fed by the caller.
        pub fn input_keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
            self.nodes
                .iter()
                .filter(|(_, node)| matches!(node.input_keys, InputKeys::PlaceHolder))
                .map(|(&key, _)| key)
        }

        pub fn num_nodes(&self) -> usize {
            self.nodes.len()
        }

        /// Count nodes whose module satisfies the predicate.
        pub fn count_modules(&self, predicate: impl Fn(&Module) -> bool) -> usize {
            self.nodes
                .values()
                .filter(|node| predicate(&node.config))
                .count()
        }

        pub fn find_by_path(&self, path: &ModulePath) -> Option<NodeKey> {
            self.nodes
                .iter()
                .find(|(_, node)| &node.path == path)
                .map(|(&key, _)| key)
        }

        /// The shapes flowing into the node, as seen by shape inference.
        pub fn input_shape(&self, key: NodeKey) -> Result<ShapeInput<'_>> {
            let node = self.node(key)?;
            let input_shape = match &node.input_keys {
                InputKeys::None | InputKeys::PlaceHolder => ShapeInput::PlaceHolder,
                InputKeys::Single(src_key) => {
                    ShapeInput::SingleTensor(&self.node(*src_key)?.output_shape)
                }
                InputKeys::Indexed(src_keys) => {
                    let shapes: Vec<_> = src_keys
                        .iter()
                        .map(|src_key| Ok(&self.node(*src_key)?.output_shape))
                        .collect::<Result<_>>()?;
                    ShapeInput::IndexedTensors(shapes)
                }
            };
            Ok(input_shape)
        }

        /// Number of learnable parameters in the whole network.
        pub fn num_parameters(&self) -> Result<usize> {
            self.nodes.keys().try_fold(0, |total, &key| -> Result<_> {
                let node = &self.nodes[&key];
                let count = node
                    .config
                    .num_parameters(self.input_shape(key)?)
                    .ok_or_else(|| {
                        format_err!("cannot count parameters of node {} '{}'", key, node.path)
                    })?;
                usize::checked_add(total, count)
                    .ok_or_else(|| format_err!("the parameter count overflows"))
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Node {
        pub input_keys: InputKeys,
        pub output_shape: Shape,
        pub path: ModulePath,
        pub config: Module,
    }
}

mod input_keys {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum InputKeys {
        None,
        PlaceHolder,
        Single(NodeKey),
        Indexed(Vec<NodeKey>),
    }

    impl InputKeys {
        pub fn iter(&self) -> impl Iterator<Item = NodeKey> {
            let iter: Box<dyn Iterator<Item = NodeKey>> = match *self {
                Self::None => Box::new(iter::empty()),
                Self::PlaceHolder => Box::new(iter::empty()),
                Self::Single(key) => Box::new(iter::once(key)),
                Self::Indexed(ref keys) => Box::new(keys.clone().into_iter()),
            };
            iter
        }

        pub fn single(&self) -> Option<NodeKey> {
            match *self {
                Self::Single(key) => Some(key),
                _ => None,
            }
        }
    }

    impl From<NodeKey> for InputKeys {
        fn from(key: NodeKey) -> Self {
            Self::Single(key)
        }
    }

    impl From<Vec<NodeKey>> for InputKeys {
        fn from(keys: Vec<NodeKey>) -> Self {
            Self::Indexed(keys)
        }
    }
}

mod node_key {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct NodeKey(pub usize);

    impl Display for NodeKey {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            Display::fmt(&self.0, f)
        }
    }
}
