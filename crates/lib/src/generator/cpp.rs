use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::generate::GenerateError;
use crate::source::{BuildContext, BuildOptions, SourceDescriptor};
use crate::timestamp;
use crate::util::path::{PathKey, normalize};

use super::options::{InvalidOptions, OptionContributor, OptionMap, insert_non_empty, keys};
use super::{Generator, generated_path};

const DEFAULT_HEADER_EXT: &str = "h";
const DEFAULT_SOURCE_EXT: &str = "cpp";

/// The `slice2cpp` generator: one source file and one header per Slice file.
pub struct Slice2Cpp;

impl Slice2Cpp {
  fn header_dir(working_dir: &Path, options: &BuildOptions) -> PathBuf {
    match options.header_output_dir.as_deref() {
      Some(dir) if !dir.is_empty() => normalize(working_dir, dir),
      _ => normalize(working_dir, &options.output_dir),
    }
  }
}

impl OptionContributor for Slice2Cpp {
  fn contribute(&self, options: &BuildOptions, map: &mut OptionMap) {
    insert_non_empty(map, keys::HEADER_EXT, &options.header_ext);
    insert_non_empty(map, keys::SOURCE_EXT, &options.source_ext);
    if let Some(dir) = &options.header_output_dir {
      insert_non_empty(map, keys::HEADER_OUTPUT_DIR, dir);
    }
    if let Some(dir) = &options.base_directory_for_generated_include {
      insert_non_empty(map, keys::BASE_DIRECTORY_FOR_GENERATED_INCLUDE, dir);
    }
  }

  fn arguments(&self, map: &OptionMap, args: &mut Vec<String>) -> Result<(), InvalidOptions> {
    if let Some(ext) = map.get(keys::HEADER_EXT).filter(|ext| ext.as_str() != DEFAULT_HEADER_EXT) {
      args.push("--header-ext".to_string());
      args.push(ext.clone());
    }
    if let Some(ext) = map.get(keys::SOURCE_EXT).filter(|ext| ext.as_str() != DEFAULT_SOURCE_EXT) {
      args.push("--source-ext".to_string());
      args.push(ext.clone());
    }
    if let Some(dir) = map.get(keys::BASE_DIRECTORY_FOR_GENERATED_INCLUDE) {
      args.push("--include-dir".to_string());
      args.push(dir.clone());
    }
    Ok(())
  }
}

impl Generator for Slice2Cpp {
  fn tool_name(&self) -> &'static str {
    "slice2cpp"
  }

  fn artifacts(&self, working_dir: &Path, source: &SourceDescriptor) -> Vec<PathBuf> {
    let output_dir = normalize(working_dir, &source.options.output_dir);
    vec![
      generated_path(&output_dir, source, &source.options.source_ext),
      generated_path(&Self::header_dir(working_dir, &source.options), source, &source.options.header_ext),
    ]
  }

  /// The generator always writes headers next to the sources; move the header
  /// into `HeaderOutputDir` when one is configured.
  fn finish(&self, ctx: &BuildContext, source: &SourceDescriptor) -> Result<(), GenerateError> {
    let output_dir = ctx.resolve(&source.options.output_dir);
    let header_dir = Self::header_dir(&ctx.working_dir, &source.options);
    if PathKey::new(&output_dir) == PathKey::new(&header_dir) {
      return Ok(());
    }

    fs::create_dir_all(&header_dir).map_err(|e| GenerateError::io(&header_dir, e))?;

    let generated = generated_path(&output_dir, source, &source.options.header_ext);
    let target = generated_path(&header_dir, source, &source.options.header_ext);

    let replace = match (timestamp::last_modified(&target), timestamp::last_modified(&generated)) {
      (Err(_), Ok(_)) => true,
      (Ok(existing), Ok(fresh)) => timestamp::newer(fresh, existing),
      (_, Err(_)) => false,
    };

    if replace {
      debug!(from = %ctx.display(&generated), to = %ctx.display(&target), "moving generated header");
      if timestamp::exists(&target) {
        fs::remove_file(&target).map_err(|e| GenerateError::io(&target, e))?;
      }
      fs::rename(&generated, &target).map_err(|e| GenerateError::io(&generated, e))?;
    }

    if timestamp::exists(&generated) {
      fs::remove_file(&generated).map_err(|e| GenerateError::io(&generated, e))?;
    }
    Ok(())
  }
}
