pub mod dim;
pub mod dtype;
pub mod graph;
pub mod model;
pub mod node;
pub mod onnx;
pub mod op_stats;
pub mod value;
