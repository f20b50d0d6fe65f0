use rustc_hash::FxHashSet;

use crate::{
    node::{Node, NodeArena, NodeId},
    value::{Value, ValueArena, ValueId},
};

#[derive(Default, Clone)]
pub struct Graph {
    pub nodes: NodeArena,
    pub values: ValueArena,
    pub inits: FxHashSet<ValueId>,
    pub inputs: Vec<ValueId>,
    pub outputs: Vec<ValueId>,
}

impl Graph {
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.alloc(node)
    }

    /// Nodes in the order they were added.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(_, node)| node)
    }

    pub fn input_values(&self) -> impl Iterator<Item = &Value> {
        self.inputs.iter().map(|&id| &self.values[id])
    }

    pub fn output_values(&self) -> impl Iterator<Item = &Value> {
        self.outputs.iter().map(|&id| &self.values[id])
    }
}
