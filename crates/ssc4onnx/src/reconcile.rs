//! Merges the two views of a model's signature.
//!
//! Element types come from the graph declarations; names and shapes come from
//! the execution session, with unnamed dynamic dimensions labelled by the
//! declared symbol. Entries are paired by position. When the two sides
//! disagree on the number of entries the shorter side wins and the difference
//! is recorded as a [`Discrepancy`].

use std::fmt;

use ssc4onnx_core::{
    dim::{Dimension, Dimensions},
    dtype::{DType, ElemTag, UnsupportedDtype},
    model::Model,
    value::Value,
};
use ssc4onnx_session::{RuntimeDim, RuntimeShape, SignatureEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoKind {
    Input,
    Output,
}

/// A graph input or output as declared in the model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredIo {
    pub name: String,
    pub elem_ty: ElemTag,
    pub dims: Option<Dimensions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoReport {
    /// 1-based position.
    pub index: usize,
    pub name: String,
    pub shape: RuntimeShape,
    pub dtype: DType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    LengthMismatch {
        kind: IoKind,
        declared: usize,
        runtime: usize,
    },
    NameMismatch {
        kind: IoKind,
        index: usize,
        declared: String,
        runtime: String,
    },
    /// Only raised for a differing rank or for a dimension fixed to
    /// different values on both sides.
    ShapeMismatch {
        kind: IoKind,
        index: usize,
        declared: Dimensions,
        runtime: RuntimeShape,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub inputs: Vec<IoReport>,
    pub outputs: Vec<IoReport>,
    pub discrepancies: Vec<Discrepancy>,
}

impl DeclaredIo {
    pub fn new(name: impl Into<String>, elem_ty: impl Into<ElemTag>) -> Self {
        Self {
            name: name.into(),
            elem_ty: elem_ty.into(),
            dims: None,
        }
    }

    pub fn with_dims(mut self, dims: impl Into<Dimensions>) -> Self {
        self.dims = Some(dims.into());
        self
    }

    fn from_value(value: &Value) -> Self {
        Self {
            name: value.name.clone().unwrap_or_default(),
            elem_ty: value.elem_ty.unwrap_or(ElemTag::UNDEFINED),
            dims: value.dims.clone(),
        }
    }
}

/// Declared inputs and outputs of `model`, in graph order.
pub fn declared_signature(model: &Model) -> (Vec<DeclaredIo>, Vec<DeclaredIo>) {
    let inputs = model.graph.input_values().map(DeclaredIo::from_value).collect();
    let outputs = model.graph.output_values().map(DeclaredIo::from_value).collect();
    (inputs, outputs)
}

pub fn reconcile(
    declared_inputs: &[DeclaredIo],
    declared_outputs: &[DeclaredIo],
    runtime_inputs: &[SignatureEntry],
    runtime_outputs: &[SignatureEntry],
) -> Result<Reconciliation, UnsupportedDtype> {
    let mut discrepancies = Vec::new();
    let inputs = reconcile_side(
        IoKind::Input,
        declared_inputs,
        runtime_inputs,
        &mut discrepancies,
    )?;
    let outputs = reconcile_side(
        IoKind::Output,
        declared_outputs,
        runtime_outputs,
        &mut discrepancies,
    )?;

    for d in &discrepancies {
        log::warn!("{d}");
    }

    Ok(Reconciliation {
        inputs,
        outputs,
        discrepancies,
    })
}

fn reconcile_side(
    kind: IoKind,
    declared: &[DeclaredIo],
    runtime: &[SignatureEntry],
    discrepancies: &mut Vec<Discrepancy>,
) -> Result<Vec<IoReport>, UnsupportedDtype> {
    if declared.len() != runtime.len() {
        discrepancies.push(Discrepancy::LengthMismatch {
            kind,
            declared: declared.len(),
            runtime: runtime.len(),
        });
    }

    declared
        .iter()
        .zip(runtime)
        .enumerate()
        .map(|(i, (decl, rt))| {
            let index = i + 1;
            if decl.name != rt.name {
                discrepancies.push(Discrepancy::NameMismatch {
                    kind,
                    index,
                    declared: decl.name.clone(),
                    runtime: rt.name.clone(),
                });
            }
            if let Some(dims) = decl.dims.as_ref().filter(|d| !shapes_agree(d, &rt.shape)) {
                discrepancies.push(Discrepancy::ShapeMismatch {
                    kind,
                    index,
                    declared: dims.clone(),
                    runtime: rt.shape.clone(),
                });
            }
            Ok(IoReport {
                index,
                name: rt.name.clone(),
                shape: with_declared_symbols(&rt.shape, decl.dims.as_ref()),
                dtype: decl.elem_ty.resolve()?,
            })
        })
        .collect()
}

fn shapes_agree(declared: &Dimensions, runtime: &RuntimeShape) -> bool {
    declared.len() == runtime.len()
        && declared
            .as_slice()
            .iter()
            .zip(runtime.as_slice())
            .all(|dims| match dims {
                (Dimension::Fixed(a), RuntimeDim::Fixed(b)) => a == b,
                _ => true,
            })
}

/// Names the runtime's unnamed dynamic dimensions after the declared symbol
/// at the same position. Ranks must match.
fn with_declared_symbols(runtime: &RuntimeShape, declared: Option<&Dimensions>) -> RuntimeShape {
    let Some(declared) = declared.filter(|d| d.len() == runtime.len()) else {
        return runtime.clone();
    };
    runtime
        .as_slice()
        .iter()
        .zip(declared.as_slice())
        .map(|dims| match dims {
            (RuntimeDim::Dynamic(None), Dimension::Dynamic(sym)) if !sym.is_empty() => {
                RuntimeDim::Dynamic(Some(sym.clone()))
            }
            (rt, _) => rt.clone(),
        })
        .collect::<Vec<_>>()
        .into()
}

impl IoKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IoKind::Input => "input",
            IoKind::Output => "output",
        }
    }
}

impl fmt::Display for IoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::LengthMismatch {
                kind,
                declared,
                runtime,
            } => write!(
                f,
                "graph declares {declared} {kind}(s) but the session reports {runtime}; \
                 only the first {} are listed",
                declared.min(runtime)
            ),
            Discrepancy::NameMismatch {
                kind,
                index,
                declared,
                runtime,
            } => write!(
                f,
                "{kind} {index} is named '{declared}' in the graph but '{runtime}' in the session"
            ),
            Discrepancy::ShapeMismatch {
                kind,
                index,
                declared,
                runtime,
            } => write!(
                f,
                "{kind} {index} has shape {declared} in the graph but {runtime} in the session"
            ),
        }
    }
}
