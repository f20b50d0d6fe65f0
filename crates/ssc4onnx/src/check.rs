use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use ssc4onnx_core::{
    dtype::UnsupportedDtype,
    model::Model,
    onnx::{load_onnx, ModelLoadError},
    op_stats::OpHistogram,
};
use ssc4onnx_session::{onnxruntime::OrtSession, Session, SessionError};
use thiserror::Error;

use crate::{
    reconcile::{declared_signature, reconcile},
    report::{render, SourceLabel},
    style::Style,
};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("One of input_onnx_file_path or onnx_graph must be specified.")]
    MissingInput,

    #[error("input_onnx_file_path is required to create an inference session")]
    MissingSessionPath,

    #[error("Load: {0}")]
    Load(#[from] ModelLoadError),

    #[error("Session: {0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    UnsupportedDtype(#[from] UnsupportedDtype),

    #[error("Io: {0}")]
    Io(#[from] io::Error),
}

/// Checks the structure of one model and writes the report.
///
/// The structure is taken from the in-memory model when one is given, and
/// from the file otherwise. The execution session is always created from the
/// file, so a path is required in both cases.
#[derive(Default)]
pub struct StructureCheck {
    input_path: Option<PathBuf>,
    model: Option<Model>,
    style: Style,
}

impl StructureCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Runs the check against ONNX Runtime.
    pub fn run(self, out: &mut impl Write) -> Result<(), CheckError> {
        self.run_with(|path| OrtSession::from_file(path), out)
    }

    /// Runs the check with a caller-provided session constructor.
    pub fn run_with<S, F>(self, open_session: F, out: &mut impl Write) -> Result<(), CheckError>
    where
        S: Session,
        F: FnOnce(&Path) -> Result<S, SessionError>,
    {
        let report = self.report_with(open_session)?;
        out.write_all(report.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn report_with<S, F>(self, open_session: F) -> Result<String, CheckError>
    where
        S: Session,
        F: FnOnce(&Path) -> Result<S, SessionError>,
    {
        // An empty path counts as no path.
        let path = self.input_path.filter(|p| !p.as_os_str().is_empty());

        let (model, in_memory) = match (self.model, path.as_deref()) {
            (None, None) => return Err(CheckError::MissingInput),
            (Some(model), _) => (model, true),
            (None, Some(path)) => (load_onnx(path)?, false),
        };
        let path = path.ok_or(CheckError::MissingSessionPath)?;
        let session = open_session(&path)?;

        let hist = OpHistogram::build(&model);
        let (declared_inputs, declared_outputs) = declared_signature(&model);
        let rec = reconcile(
            &declared_inputs,
            &declared_outputs,
            session.inputs(),
            session.outputs(),
        )?;
        log::debug!(
            "{} ops, {} input(s), {} output(s), {} discrepancies",
            hist.total_ops(),
            rec.inputs.len(),
            rec.outputs.len(),
            rec.discrepancies.len()
        );

        let source = if in_memory {
            SourceLabel::InMemory(path)
        } else {
            SourceLabel::File(path)
        };
        Ok(render(&hist, &rec, &source, &self.style))
    }
}
