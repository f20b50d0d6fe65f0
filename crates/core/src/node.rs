use id_arena::{Arena, Id};

pub type NodeId = Id<Node>;
pub type NodeArena = Arena<Node>;

/// One computation step. `op` is the ONNX operator type, kept verbatim so that
/// custom-domain operators are counted like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub op: String,
}

impl Node {
    pub fn new(op: impl Into<String>) -> Self {
        Self { op: op.into() }
    }
}
