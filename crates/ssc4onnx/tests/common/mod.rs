#![allow(dead_code)]

use std::{fs, path::Path};

use prost::Message;
use ssc4onnx_core::onnx::proto::{
    tensor_proto::DataType,
    tensor_shape_proto::{
        dimension::{self, Value::DimValue},
        Dimension,
    },
    type_proto::{self, Value::TensorType},
    GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorShapeProto, TypeProto,
    ValueInfoProto,
};

pub fn value(name: &str, ty: DataType, dims: &[i64]) -> ValueInfoProto {
    value_with_dims(name, ty, dims.iter().map(|&d| DimValue(d)).collect())
}

pub fn value_with_dims(name: &str, ty: DataType, dims: Vec<dimension::Value>) -> ValueInfoProto {
    ValueInfoProto {
        name: Some(name.into()),
        r#type: Some(TypeProto {
            value: Some(TensorType(type_proto::Tensor {
                elem_type: Some(ty as i32),
                shape: Some(TensorShapeProto {
                    dim: dims
                        .into_iter()
                        .map(|d| Dimension {
                            value: Some(d),
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

/// `y = ((x @ x) @ (x @ x)) @ x` over a 4x4 float matrix.
pub fn matmul_chain() -> ModelProto {
    let matmul = |a: &str, b: &str, out: &str| NodeProto {
        op_type: Some("MatMul".into()),
        input: vec![a.into(), b.into()],
        output: vec![out.into()],
        ..Default::default()
    };
    ModelProto {
        ir_version: Some(7),
        producer_name: Some("ssc4onnx-tests".into()),
        opset_import: vec![OperatorSetIdProto {
            domain: Some("".into()),
            version: Some(13),
        }],
        graph: Some(GraphProto {
            name: Some("matmul_chain".into()),
            node: vec![
                matmul("x", "x", "a"),
                matmul("a", "a", "b"),
                matmul("b", "x", "y"),
            ],
            input: vec![value("x", DataType::Float, &[4, 4])],
            output: vec![value("y", DataType::Float, &[4, 4])],
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// `y = Relu(x)` with `x` declared as `[batch, 4]`.
pub fn batched_relu() -> ModelProto {
    let batched = |name: &str| {
        value_with_dims(
            name,
            DataType::Float,
            vec![dimension::Value::DimParam("batch".into()), DimValue(4)],
        )
    };
    ModelProto {
        ir_version: Some(7),
        producer_name: Some("ssc4onnx-tests".into()),
        opset_import: vec![OperatorSetIdProto {
            domain: Some("".into()),
            version: Some(13),
        }],
        graph: Some(GraphProto {
            name: Some("batched_relu".into()),
            node: vec![NodeProto {
                op_type: Some("Relu".into()),
                input: vec!["x".into()],
                output: vec!["y".into()],
                ..Default::default()
            }],
            input: vec![batched("x")],
            output: vec![batched("y")],
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn export(model: &ModelProto, path: &Path) {
    fs::write(path, model.encode_to_vec()).unwrap();
}
