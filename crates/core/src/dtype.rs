use std::fmt;

use thiserror::Error;

use crate::onnx::proto::tensor_proto::DataType;

/// Raw ONNX element type as found in `TypeProto.Tensor.elem_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElemTag(pub i32);

/// Concrete numeric representation of a tensor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    Bool,
    F16,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unsupported tensor element type: {tag}")]
pub struct UnsupportedDtype {
    pub tag: i32,
}

impl ElemTag {
    pub const UNDEFINED: ElemTag = ElemTag(DataType::Undefined as i32);

    pub fn data_type(self) -> Option<DataType> {
        DataType::from_i32(self.0)
    }

    /// Maps the tag to a dtype. Tags without a numeric counterpart are an
    /// error; they are never replaced by a default.
    pub fn resolve(self) -> Result<DType, UnsupportedDtype> {
        let unsupported = UnsupportedDtype { tag: self.0 };
        let ty = self.data_type().ok_or(unsupported)?;
        DType::try_from(ty).map_err(|_| unsupported)
    }
}

impl From<DataType> for ElemTag {
    fn from(ty: DataType) -> Self {
        ElemTag(ty as i32)
    }
}

impl TryFrom<DataType> for DType {
    type Error = UnsupportedDtype;

    // No wildcard arm: a new `DataType` variant must be classified here.
    fn try_from(ty: DataType) -> Result<Self, Self::Error> {
        match ty {
            DataType::Float => Ok(DType::F32),
            DataType::Double => Ok(DType::F64),
            DataType::Float16 => Ok(DType::F16),
            DataType::Int8 => Ok(DType::I8),
            DataType::Int16 => Ok(DType::I16),
            DataType::Int32 => Ok(DType::I32),
            DataType::Int64 => Ok(DType::I64),
            DataType::Uint8 => Ok(DType::U8),
            DataType::Uint16 => Ok(DType::U16),
            DataType::Uint32 => Ok(DType::U32),
            DataType::Uint64 => Ok(DType::U64),
            DataType::Bool => Ok(DType::Bool),
            DataType::Undefined
            | DataType::String
            | DataType::Complex64
            | DataType::Complex128
            | DataType::Bfloat16
            | DataType::Float8e4m3fn
            | DataType::Float8e4m3fnuz
            | DataType::Float8e5m2
            | DataType::Float8e5m2fnuz
            | DataType::Uint4
            | DataType::Int4
            | DataType::Float4e2m1 => Err(UnsupportedDtype { tag: ty as i32 }),
        }
    }
}

impl DType {
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::F16 => "float16",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
