use std::collections::BTreeMap;

use crate::model::Model;

/// Number of nodes per operator type, plus the serialized size of the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpHistogram {
    /// Keyed by operator type; iterates in lexicographic order.
    pub counts: BTreeMap<String, usize>,
    pub model_size: usize,
}

impl OpHistogram {
    pub fn build(model: &Model) -> Self {
        let mut counts = BTreeMap::new();
        for node in model.graph.iter_nodes() {
            *counts.entry(node.op.clone()).or_insert(0) += 1;
        }
        Self {
            counts,
            model_size: model.byte_size,
        }
    }

    pub fn total_ops(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn model_with_ops(ops: &[&str]) -> Model {
        let mut model = Model {
            byte_size: 4321,
            ..Model::default()
        };
        for op in ops {
            model.graph.add_node(Node::new(*op));
        }
        model
    }

    #[test]
    fn count_conv_relu() {
        let hist = OpHistogram::build(&model_with_ops(&["Conv", "Conv", "Relu"]));
        insta::assert_debug_snapshot!(hist.counts, @r###"
        {
            "Conv": 2,
            "Relu": 1,
        }
        "###);
        assert_eq!(hist.model_size, 4321);
        assert_eq!(hist.total_ops(), 3);
        assert!(!hist.counts.contains_key("MatMul"));
    }

    #[test]
    fn sorted_regardless_of_order() {
        let ops = ["Relu", "Add", "MatMul", "Add", "Softmax", "MatMul", "Add"];
        let hist = OpHistogram::build(&model_with_ops(&ops));
        let keys = hist.counts.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, vec!["Add", "MatMul", "Relu", "Softmax"]);
        assert_eq!(hist.total_ops(), ops.len());
        assert!(hist.counts.values().all(|&c| c >= 1));
    }

    #[test]
    fn empty_graph() {
        let hist = OpHistogram::build(&Model::default());
        assert!(hist.counts.is_empty());
        assert_eq!(hist.total_ops(), 0);
        assert_eq!(hist.model_size, 0);
    }
}
