use std::path::{Path, PathBuf};

use crate::source::{BuildOptions, SourceDescriptor};
use crate::util::path::normalize;

use super::options::{InvalidOptions, OptionContributor, OptionMap};
use super::{Generator, generated_path};

/// The `slice2cs` generator: one `.cs` file per Slice file.
pub struct Slice2CSharp;

impl OptionContributor for Slice2CSharp {
  fn contribute(&self, _options: &BuildOptions, _map: &mut OptionMap) {}

  fn arguments(&self, _map: &OptionMap, _args: &mut Vec<String>) -> Result<(), InvalidOptions> {
    Ok(())
  }
}

impl Generator for Slice2CSharp {
  fn tool_name(&self) -> &'static str {
    "slice2cs"
  }

  fn artifacts(&self, working_dir: &Path, source: &SourceDescriptor) -> Vec<PathBuf> {
    let output_dir = normalize(working_dir, &source.options.output_dir);
    vec![generated_path(&output_dir, source, "cs")]
  }
}
