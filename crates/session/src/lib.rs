pub mod onnxruntime;

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("ONNX Runtime: {0}")]
    Ort(#[from] ::ort::OrtError),
}

/// A dimension as resolved by an execution session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeDim {
    Fixed(usize),
    /// Unknown until inference time. Carries the symbolic name when the
    /// runtime exposes one.
    Dynamic(Option<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RuntimeShape(pub Vec<RuntimeDim>);

/// Name and shape of one session input or output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureEntry {
    pub name: String,
    pub shape: RuntimeShape,
}

/// Introspection interface of an execution session: the names and shapes of
/// its inputs and outputs, in the order the runtime reports them.
pub trait Session {
    fn inputs(&self) -> &[SignatureEntry];
    fn outputs(&self) -> &[SignatureEntry];
}

impl RuntimeShape {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[RuntimeDim] {
        self.0.as_slice()
    }
}

impl From<Vec<RuntimeDim>> for RuntimeShape {
    fn from(v: Vec<RuntimeDim>) -> Self {
        RuntimeShape(v)
    }
}

impl From<Vec<usize>> for RuntimeShape {
    fn from(v: Vec<usize>) -> Self {
        RuntimeShape(v.into_iter().map(RuntimeDim::Fixed).collect())
    }
}

impl SignatureEntry {
    pub fn new(name: impl Into<String>, shape: impl Into<RuntimeShape>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
        }
    }
}

impl fmt::Display for RuntimeDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeDim::Fixed(n) => write!(f, "{n}"),
            RuntimeDim::Dynamic(Some(sym)) => write!(f, "{sym}"),
            RuntimeDim::Dynamic(None) => write!(f, "?"),
        }
    }
}

impl fmt::Display for RuntimeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

#[test]
fn display_shape() {
    let shape = RuntimeShape(vec![
        RuntimeDim::Dynamic(None),
        RuntimeDim::Fixed(3),
        RuntimeDim::Dynamic(Some("height".into())),
        RuntimeDim::Fixed(224),
    ]);
    assert_eq!(shape.to_string(), "[?, 3, height, 224]");
    assert_eq!(RuntimeShape::from(vec![1usize, 3, 224, 224]).to_string(), "[1, 3, 224, 224]");
    assert_eq!(RuntimeShape::default().to_string(), "[]");
}
