//! Slice generators.
//!
//! A [`Generator`] knows its executable, which files it produces for a
//! source, and which options and arguments it adds on top of
//! [`CommonOptions`]. Two generators exist: `slice2cpp` and `slice2cs`.

mod cpp;
mod csharp;
mod options;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generate::GenerateError;
use crate::source::{BuildContext, SourceDescriptor};

pub use cpp::Slice2Cpp;
pub use csharp::Slice2CSharp;
pub use options::{CommonOptions, InvalidOptions, OptionContributor, OptionMap, command_arguments, effective_options, keys};

pub trait Generator: OptionContributor + Send + Sync {
  /// Executable name without platform suffix; also the record file prefix.
  fn tool_name(&self) -> &'static str;

  /// File name of the executable on this platform.
  fn executable_name(&self) -> String {
    if cfg!(windows) {
      format!("{}.exe", self.tool_name())
    } else {
      self.tool_name().to_string()
    }
  }

  /// Absolute paths of the files generated from `source`, in a stable order.
  fn artifacts(&self, working_dir: &Path, source: &SourceDescriptor) -> Vec<PathBuf>;

  /// Runs after a successful generation, before dependencies are collected.
  fn finish(&self, _ctx: &BuildContext, _source: &SourceDescriptor) -> Result<(), GenerateError> {
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
  #[serde(rename = "cpp")]
  Cpp,
  #[serde(rename = "csharp")]
  CSharp,
}

static SLICE2CPP: Slice2Cpp = Slice2Cpp;
static SLICE2CS: Slice2CSharp = Slice2CSharp;

impl GeneratorKind {
  pub fn generator(self) -> &'static dyn Generator {
    match self {
      GeneratorKind::Cpp => &SLICE2CPP,
      GeneratorKind::CSharp => &SLICE2CS,
    }
  }
}

impl fmt::Display for GeneratorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GeneratorKind::Cpp => write!(f, "cpp"),
      GeneratorKind::CSharp => write!(f, "csharp"),
    }
  }
}

impl FromStr for GeneratorKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "cpp" | "c++" | "slice2cpp" => Ok(GeneratorKind::Cpp),
      "csharp" | "cs" | "c#" | "slice2cs" => Ok(GeneratorKind::CSharp),
      other => Err(format!("unknown generator `{other}` (expected `cpp` or `csharp`)")),
    }
  }
}

/// `<dir>/<stem>.<ext>`, with any leading dot on `ext` ignored.
pub(crate) fn generated_path(dir: &Path, source: &SourceDescriptor, ext: &str) -> PathBuf {
  dir.join(format!("{}.{}", source.stem(), ext.trim_start_matches('.')))
}
