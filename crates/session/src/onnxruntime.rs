use std::path::Path;

use ort::{Environment, ExecutionProvider, SessionBuilder};

use crate::{RuntimeDim, RuntimeShape, Session, SessionError, SignatureEntry};

/// Signature of a model as seen by ONNX Runtime on the CPU execution provider.
pub struct OrtSession {
    inputs: Vec<SignatureEntry>,
    outputs: Vec<SignatureEntry>,
}

impl OrtSession {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        log::debug!("Creating ONNX Runtime session for {}", path.display());

        let env = Environment::builder()
            .with_name("ssc4onnx")
            .with_execution_providers(&[ExecutionProvider::CPU(Default::default())])
            .build()?
            .into_arc();
        let sess = SessionBuilder::new(&env)?.with_model_from_file(path)?;

        let inputs = sess
            .inputs
            .iter()
            .map(|input| SignatureEntry::new(input.name.clone(), runtime_shape(&input.dimensions)))
            .collect();
        let outputs = sess
            .outputs
            .iter()
            .map(|output| {
                SignatureEntry::new(output.name.clone(), runtime_shape(&output.dimensions))
            })
            .collect();

        Ok(Self { inputs, outputs })
    }
}

impl Session for OrtSession {
    fn inputs(&self) -> &[SignatureEntry] {
        &self.inputs
    }

    fn outputs(&self) -> &[SignatureEntry] {
        &self.outputs
    }
}

fn runtime_shape(dims: &[Option<u32>]) -> RuntimeShape {
    dims.iter()
        .map(|d| match d {
            Some(n) => RuntimeDim::Fixed(*n as usize),
            None => RuntimeDim::Dynamic(None),
        })
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn dynamic_dims() {
    assert_eq!(
        runtime_shape(&[None, Some(3), Some(224)]),
        RuntimeShape(vec![
            RuntimeDim::Dynamic(None),
            RuntimeDim::Fixed(3),
            RuntimeDim::Fixed(224)
        ])
    );
}
