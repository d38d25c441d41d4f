#![cfg(feature = "dot")]

use crate::{common::*, graph::*};
use dot::{Arrow, Edges, GraphWalk, Id, LabelText, Labeller, Nodes, Style};
use model_config::{self as config, Module};

impl Graph {
    /// Write the graph in Graphviz DOT format.
    pub fn render_dot(&self, writer: &mut impl Write) -> Result<()> {
        dot::render(self, writer)?;
        Ok(())
    }
}

impl<'a> GraphWalk<'a, NodeKey, (NodeKey, NodeKey)> for Graph {
    fn nodes(&'a self) -> Nodes<'a, NodeKey> {
        let keys: Vec<_> = self.nodes().keys().cloned().collect();
        keys.into()
    }

    fn edges(&'a self) -> Edges<'a, (NodeKey, NodeKey)> {
        let edges: Vec<_> = self
            .nodes()
            .iter()
            .flat_map(|(&dst_key, node)| {
                node.input_keys
                    .iter()
                    .map(move |src_key| (src_key, dst_key))
            })
            .collect();
        edges.into()
    }

    fn source(&'a self, edge: &(NodeKey, NodeKey)) -> NodeKey {
        let (src, _dst) = *edge;
        src
    }

    fn target(&'a self, edge: &(NodeKey, NodeKey)) -> NodeKey {
        let (_src, dst) = *edge;
        dst
    }
}

impl<'a> Labeller<'a, NodeKey, (NodeKey, NodeKey)> for Graph {
    fn graph_id(&'a self) -> Id<'a> {
        Id::new("hourglass").expect("the graph id is a valid identifier")
    }

    fn node_id(&'a self, key: &NodeKey) -> Id<'a> {
        Id::new(format!("node_{}", key)).expect("node ids are valid identifiers")
    }

    fn node_shape(&'a self, key: &NodeKey) -> Option<LabelText<'a>> {
        if self.auxiliary_keys().contains(key) || *key == self.output_key() {
            return Some(LabelText::label("doubleoctagon"));
        }

        match self.nodes()[key].config {
            Module::Input(_) => Some(LabelText::label("box")),
            Module::Sum2D(_) => Some(LabelText::label("invtrapezium")),
            _ => None,
        }
    }

    fn node_label(&'a self, key: &NodeKey) -> LabelText<'a> {
        let Node {
            config,
            output_shape,
            path,
            ..
        } = &self.nodes()[key];

        let header = format!(
            "({}) {}\n{}\npath={}\n",
            key,
            config.as_ref(),
            dot::escape_html(&output_shape.to_string()),
            path
        );

        let details = match config {
            Module::ConvBn2D(conv) => {
                let config::ConvBn2D {
                    k, s, p, d, ref bn, ..
                } = *conv;
                format!(
                    "k={} s={} p={} d={}\nbatch_norm={}",
                    k,
                    s,
                    p,
                    d,
                    if bn.enabled { "yes" } else { "no" }
                )
            }
            Module::InvertedBottleneck2D(block) => {
                let config::InvertedBottleneck2D { t, c, s, k, .. } = *block;
                format!("t={} c={} s={} k={}", t, c, s, k)
            }
            Module::SeparableConv2D(conv) => {
                let config::SeparableConv2D { c, k, s, .. } = *conv;
                format!("c={} k={} s={}", c, k, s)
            }
            Module::MaxPool2D(pool) => {
                let config::MaxPool2D { k, s, p } = *pool;
                format!("k={} s={} p={}", k, s, p)
            }
            Module::UpSample2D(up) => {
                format!("scale={} mode={}", up.scale, up.mode.as_ref())
            }
            Module::Input(_) | Module::Sum2D(_) => String::new(),
        };

        LabelText::escaped(format!("{}{}", header, details))
    }

    fn node_style(&'a self, _node: &NodeKey) -> Style {
        Style::None
    }

    fn node_color(&'a self, key: &NodeKey) -> Option<LabelText<'a>> {
        match self.nodes()[key].config {
            Module::Input(_) => Some(LabelText::label("black")),
            Module::ConvBn2D(_) | Module::SeparableConv2D(_) => Some(LabelText::label("blue")),
            Module::InvertedBottleneck2D(_) => Some(LabelText::label("darkgreen")),
            Module::MaxPool2D(_) | Module::UpSample2D(_) => Some(LabelText::label("orange")),
            Module::Sum2D(_) => Some(LabelText::label("brown")),
        }
    }

    fn edge_label(&'a self, edge: &(NodeKey, NodeKey)) -> LabelText<'a> {
        let (src_key, dst_key) = *edge;
        let shape = &self.nodes()[&src_key].output_shape;

        LabelText::escaped(format!(
            r"{} -> {}\n{}",
            src_key,
            dst_key,
            dot::escape_html(&shape.to_string())
        ))
    }

    fn edge_start_arrow(&'a self, _edge: &(NodeKey, NodeKey)) -> Arrow {
        Arrow::none()
    }

    fn edge_end_arrow(&'a self, _edge: &(NodeKey, NodeKey)) -> Arrow {
        Arrow::normal()
    }

    fn edge_style(&'a self, _node: &(NodeKey, NodeKey)) -> Style {
        Style::None
    }

    fn edge_color(&'a self, _node: &(NodeKey, NodeKey)) -> Option<LabelText<'a>> {
        None
    }

    fn kind(&self) -> dot::Kind {
        dot::Kind::Digraph
    }
}
