//! Source descriptors and build context.
//!
//! A [`SourceDescriptor`] is one input file plus its options. The
//! [`BuildContext`] carries what is shared by a whole pass: the working
//! directory, the generator, and where its executable lives.

mod types;

use std::path::{Path, PathBuf};

use crate::consts::RECORD_EXTENSION;
use crate::generator::{Generator, GeneratorKind, OptionMap, effective_options};
use crate::util::path::{display_relative, normalize};

pub use types::{BuildOptions, SourceDescriptor};

/// Settings shared by every source of one evaluation pass.
#[derive(Debug, Clone)]
pub struct BuildContext {
  /// Absolute directory that relative paths are resolved against and the generator runs in.
  pub working_dir: PathBuf,
  /// Directory containing the generator executable.
  pub tools_path: PathBuf,
  pub generator: GeneratorKind,
}

impl BuildContext {
  pub fn new(working_dir: impl Into<PathBuf>, tools_path: impl AsRef<Path>, generator: GeneratorKind) -> Self {
    let working_dir = working_dir.into();
    let tools_path = normalize(&working_dir, tools_path);
    Self {
      working_dir,
      tools_path,
      generator,
    }
  }

  pub fn generator(&self) -> &'static dyn Generator {
    self.generator.generator()
  }

  /// Absolute path of the generator executable.
  pub fn generator_path(&self) -> PathBuf {
    self.tools_path.join(self.generator().executable_name())
  }

  /// Resolves a caller-supplied path against the working directory.
  pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
    normalize(&self.working_dir, path)
  }

  /// Renders a path relative to the working directory for messages.
  pub fn display(&self, path: &Path) -> String {
    display_relative(&self.working_dir, path)
  }

  /// Absolute paths of the files generated from `source`.
  pub fn artifacts(&self, source: &SourceDescriptor) -> Vec<PathBuf> {
    self.generator().artifacts(&self.working_dir, source)
  }

  /// Options in effect for `source`, as recorded and compared between runs.
  pub fn effective_options(&self, source: &SourceDescriptor) -> OptionMap {
    effective_options(self.generator(), &source.options)
  }

  /// Location of the dependency record: `<outputDir>/<tool>.<stem>.d`.
  ///
  /// Two sources sharing a stem and an output directory share a record.
  pub fn record_path(&self, source: &SourceDescriptor) -> PathBuf {
    self.resolve(&source.options.output_dir).join(format!(
      "{}.{}.{}",
      self.generator().tool_name(),
      source.stem(),
      RECORD_EXTENSION
    ))
  }
}
