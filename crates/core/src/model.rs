use crate::graph::Graph;

#[derive(Default, Clone)]
pub struct Model {
    pub graph: Graph,
    /// Size in bytes of the serialized `ModelProto`.
    pub byte_size: usize,
}
