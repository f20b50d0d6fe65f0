use prost::{DecodeError, Message};
use rustc_hash::FxHashMap;
use std::{collections::hash_map::Entry, fs, io, path::Path};
use thiserror::Error;

use crate::{
    dim::{Dimension, Dimensions},
    dtype::ElemTag,
    model::Model,
    node::Node,
    value::ValueId,
};

use super::proto::{
    tensor_shape_proto::dimension::Value::{DimParam, DimValue},
    type_proto::Value::TensorType,
    ModelProto, ValueInfoProto,
};

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Model does not contain any graph")]
    NoGraph,

    #[error("Model is invalid: {0}")]
    InvalidModel(#[from] DecodeError),
}

pub fn load_onnx(path: impl AsRef<Path>) -> Result<Model, ModelLoadError> {
    let path = path.as_ref();
    log::debug!("Loading {}", path.display());
    load_onnx_from_buffer(&fs::read(path)?)
}

pub fn load_onnx_from_buffer(buf: &[u8]) -> Result<Model, ModelLoadError> {
    let model_proto = ModelProto::decode(buf)?;
    load_model(model_proto, buf.len())
}

/// Builds a model from an already decoded proto. The recorded size is the
/// re-encoded length, which leaves out any field the decoder skipped.
pub fn load_onnx_from_model_proto(model_proto: ModelProto) -> Result<Model, ModelLoadError> {
    let byte_size = model_proto.encoded_len();
    load_model(model_proto, byte_size)
}

fn load_model(model_proto: ModelProto, byte_size: usize) -> Result<Model, ModelLoadError> {
    let graph = model_proto.graph.ok_or(ModelLoadError::NoGraph)?;
    let mut model = Model {
        byte_size,
        ..Model::default()
    };
    let mut name_to_val: FxHashMap<&str, ValueId> = FxHashMap::default();

    // Load initializers.
    for init in graph.initializer.iter() {
        let val = *name_to_val
            .entry(init.name())
            .or_insert_with(|| model.graph.values.new_val_named(init.name()));
        model.graph.inits.insert(val);
    }

    // Load inputs and outputs.
    for (vals, vec) in [
        (&graph.input, &mut model.graph.inputs),
        (&graph.output, &mut model.graph.outputs),
    ] {
        for x in vals {
            let (elem_ty, dims) = declared_type(x);
            let val = match name_to_val.entry(x.name()) {
                Entry::Occupied(o) => {
                    let val = *o.get();
                    model.graph.values[val].elem_ty = Some(elem_ty);
                    model.graph.values[val].dims = dims;
                    val
                }
                Entry::Vacant(v) => *v.insert(
                    model
                        .graph
                        .values
                        .new_val_named_and_typed(x.name(), elem_ty, dims),
                ),
            };
            vec.push(val);
        }
    }

    // Remove initializers from inputs if needed.
    let num_declared = model.graph.inputs.len();
    model
        .graph
        .inputs
        .retain(|x| !model.graph.inits.contains(x));
    if model.graph.inputs.len() != num_declared {
        log::debug!(
            "Dropped {} initializer(s) listed as graph inputs",
            num_declared - model.graph.inputs.len()
        );
    }

    for node in graph.node.iter() {
        model.graph.add_node(Node::new(node.op_type()));
    }

    log::debug!(
        "Loaded model: {} nodes, {} inputs, {} outputs, {} bytes",
        model.graph.nodes.len(),
        model.graph.inputs.len(),
        model.graph.outputs.len(),
        model.byte_size
    );

    Ok(model)
}

/// Element type and static shape of a graph input or output. Values that are
/// not plain tensors get an undefined element type, which fails to resolve
/// later on.
fn declared_type(x: &ValueInfoProto) -> (ElemTag, Option<Dimensions>) {
    let Some(TensorType(tensor)) = x.r#type.as_ref().and_then(|ty| ty.value.as_ref()) else {
        return (ElemTag::UNDEFINED, None);
    };

    let dims = tensor.shape.as_ref().map(|shape| {
        shape
            .dim
            .iter()
            .map(|d| match d.value.as_ref() {
                Some(DimValue(i)) if *i >= 0 => Dimension::Fixed(*i as usize),
                Some(DimParam(s)) => Dimension::Dynamic(s.clone()),
                // Some exporters write -1 for an unknown extent.
                Some(DimValue(_)) | None => Dimension::Dynamic(String::new()),
            })
            .collect::<Vec<_>>()
            .into()
    });

    (ElemTag(tensor.elem_type()), dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dtype::DType,
        onnx::proto::{
            tensor_proto::DataType, tensor_shape_proto, type_proto, GraphProto, NodeProto,
            OperatorSetIdProto, StringStringEntryProto, TensorProto, TensorShapeProto, TypeProto,
        },
    };

    fn tensor_value(name: &str, ty: DataType, dims: &[i64]) -> ValueInfoProto {
        ValueInfoProto {
            name: Some(name.into()),
            r#type: Some(TypeProto {
                value: Some(TensorType(type_proto::Tensor {
                    elem_type: Some(ty as i32),
                    shape: Some(TensorShapeProto {
                        dim: dims
                            .iter()
                            .map(|&d| tensor_shape_proto::Dimension {
                                value: Some(if d < 0 {
                                    DimParam("N".into())
                                } else {
                                    DimValue(d)
                                }),
                                ..Default::default()
                            })
                            .collect(),
                    }),
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn node(op: &str, ins: &[&str], outs: &[&str]) -> NodeProto {
        NodeProto {
            op_type: Some(op.into()),
            input: ins.iter().map(|s| s.to_string()).collect(),
            output: outs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn conv_relu() -> ModelProto {
        ModelProto {
            ir_version: Some(3),
            producer_name: Some("test".into()),
            opset_import: vec![OperatorSetIdProto {
                domain: Some("".into()),
                version: Some(8),
            }],
            graph: Some(GraphProto {
                node: vec![
                    node("Conv", &["x", "w"], &["a"]),
                    node("Conv", &["a", "w"], &["b"]),
                    node("Relu", &["b"], &["y"]),
                ],
                initializer: vec![TensorProto {
                    name: Some("w".into()),
                    dims: vec![1, 1, 1, 1],
                    data_type: Some(DataType::Float as i32),
                    float_data: vec![1.0],
                    ..Default::default()
                }],
                input: vec![
                    tensor_value("x", DataType::Float, &[-1, 1, 8, 8]),
                    tensor_value("w", DataType::Float, &[1, 1, 1, 1]),
                ],
                output: vec![tensor_value("y", DataType::Float, &[-1, 1, 8, 8])],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn load_conv_relu() {
        let proto = conv_relu();
        let expected_size = proto.encoded_len();
        let model = load_onnx_from_model_proto(proto).unwrap();

        assert_eq!(model.byte_size, expected_size);
        assert_eq!(
            model.graph.iter_nodes().map(|n| n.op.as_str()).collect::<Vec<_>>(),
            vec!["Conv", "Conv", "Relu"]
        );

        // `w` is an initializer and must not be reported as an input.
        let inputs = model.graph.input_values().collect::<Vec<_>>();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name.as_deref(), Some("x"));
        assert_eq!(inputs[0].elem_ty.unwrap().resolve(), Ok(DType::F32));
        assert_eq!(
            inputs[0].dims.as_ref().unwrap().to_string(),
            "[N, 1, 8, 8]"
        );
    }

    #[test]
    fn load_from_buffer() {
        let buf = conv_relu().encode_to_vec();
        let model = load_onnx_from_buffer(&buf).unwrap();
        assert_eq!(model.byte_size, buf.len());
        assert_eq!(model.graph.outputs.len(), 1);
    }

    #[test]
    fn size_includes_unknown_fields() {
        let mut buf = conv_relu().encode_to_vec();
        // Field 1000, length-delimited, "abc".
        buf.extend_from_slice(&[0xc2, 0x3e, 3, b'a', b'b', b'c']);
        let model = load_onnx_from_buffer(&buf).unwrap();
        assert_eq!(model.byte_size, buf.len());
        assert_eq!(model.graph.nodes.len(), 3);
    }

    #[test]
    fn size_includes_node_metadata() {
        let mut proto = conv_relu();
        let graph = proto.graph.as_mut().unwrap();
        for node in graph.node.iter_mut() {
            node.metadata_props = vec![StringStringEntryProto {
                key: Some("pkg.torch.onnx.stack_trace".into()),
                value: Some("File \"model.py\", line 42, in forward".into()),
            }];
        }
        let buf = proto.encode_to_vec();
        let model = load_onnx_from_buffer(&buf).unwrap();
        assert_eq!(model.byte_size, buf.len());
        assert_eq!(
            load_onnx_from_model_proto(proto).unwrap().byte_size,
            buf.len()
        );
    }

    #[test]
    fn size_of_file_is_its_length() {
        let mut buf = conv_relu().encode_to_vec();
        buf.extend_from_slice(&[0xc2, 0x3e, 1, 0]);
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), &buf).unwrap();
        let model = load_onnx(file.path()).unwrap();
        assert_eq!(model.byte_size, buf.len());
    }

    #[test]
    fn negative_dim_is_dynamic() {
        let mut proto = conv_relu();
        let graph = proto.graph.as_mut().unwrap();
        graph.input[0] = tensor_value("x", DataType::Float, &[1, 1, 8, 8]);
        if let Some(TensorType(tensor)) = graph.input[0]
            .r#type
            .as_mut()
            .and_then(|ty| ty.value.as_mut())
        {
            tensor.shape.as_mut().unwrap().dim[0].value = Some(DimValue(-1));
        }
        let model = load_onnx_from_model_proto(proto).unwrap();
        let x = model.graph.input_values().next().unwrap();
        assert_eq!(x.dims.as_ref().unwrap().to_string(), "[?, 1, 8, 8]");
    }

    #[test]
    fn non_tensor_input_is_undefined() {
        let mut proto = conv_relu();
        let graph = proto.graph.as_mut().unwrap();
        graph.input[0].r#type = None;
        let model = load_onnx_from_model_proto(proto).unwrap();
        let x = model.graph.input_values().next().unwrap();
        assert_eq!(x.elem_ty, Some(ElemTag::UNDEFINED));
        assert!(x.elem_ty.unwrap().resolve().is_err());
    }

    #[test]
    fn no_graph() {
        let proto = ModelProto::default();
        assert!(matches!(
            load_onnx_from_model_proto(proto),
            Err(ModelLoadError::NoGraph)
        ));
    }

    #[test]
    fn invalid_buffer() {
        assert!(matches!(
            load_onnx_from_buffer(&[0xff, 0xff, 0xff]),
            Err(ModelLoadError::InvalidModel(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_onnx("/nonexistent/model.onnx"),
            Err(ModelLoadError::Io(_))
        ));
    }
}
