use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::generator::InvalidOptions;
use crate::record::{DependencyRecord, RecordError};

use super::depend::ReportError;

/// Errors that can occur while running the generator for one source.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("Slice compiler `{}' not found", path.display())]
  GeneratorNotFound { path: PathBuf },

  #[error("failed to launch {program}: {source}")]
  Launch {
    program: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{identity} failed with exit code {}{}", code.map_or_else(|| "none".to_string(), |c| c.to_string()), format_diagnostics(diagnostics))]
  GenerationFailed {
    identity: String,
    code: Option<i32>,
    diagnostics: String,
  },

  #[error(transparent)]
  InvalidOptions(#[from] InvalidOptions),

  #[error("failed to read dependency report {path}: {source}")]
  DependReport {
    path: PathBuf,
    #[source]
    source: ReportError,
  },

  #[error(transparent)]
  Record(#[from] RecordError),

  #[error("io error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl GenerateError {
  pub fn io(path: &Path, source: io::Error) -> Self {
    GenerateError::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

fn format_diagnostics(diagnostics: &str) -> String {
  if diagnostics.is_empty() {
    String::new()
  } else {
    format!(":\n{diagnostics}")
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
  Warning,
  Error,
  /// Text without a `warning:` or `error:` marker; reported at error level.
  Unclassified,
  /// The generator rejected its command line.
  Usage,
}

/// One classified line of generator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  pub kind: DiagnosticKind,
  /// Reported file, relative to the working directory when inside it.
  pub file: Option<PathBuf>,
  pub line: Option<u32>,
  pub message: String,
}

impl Diagnostic {
  pub fn is_error(&self) -> bool {
    self.kind != DiagnosticKind::Warning
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(file) = &self.file {
      write!(f, "{}", file.display())?;
      if let Some(line) = self.line {
        write!(f, ":{line}")?;
      }
      write!(f, ": ")?;
    }
    match self.kind {
      DiagnosticKind::Warning => write!(f, "warning: {}", self.message),
      DiagnosticKind::Error => write!(f, "error: {}", self.message),
      DiagnosticKind::Unclassified | DiagnosticKind::Usage => write!(f, "{}", self.message),
    }
  }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
  /// The record that was persisted for the source.
  pub record: DependencyRecord,
  /// Diagnostics reported by both generator passes.
  pub diagnostics: Vec<Diagnostic>,
}
