//! The canonical option mapping.
//!
//! Each [`OptionContributor`] adds its keys to one [`OptionMap`] and later
//! turns those same keys back into generator arguments. The map is what gets
//! persisted in a dependency record, so anything that changes the command
//! line also changes the equality check between runs.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::source::BuildOptions;

use super::Generator;

/// Option name to serialized value.
pub type OptionMap = BTreeMap<String, String>;

/// Option names, as stored in dependency records.
pub mod keys {
  pub const OUTPUT_DIR: &str = "OutputDir";
  pub const INCLUDE_DIRECTORIES: &str = "IncludeDirectories";
  pub const ADDITIONAL_OPTIONS: &str = "AdditionalOptions";
  pub const HEADER_EXT: &str = "HeaderExt";
  pub const SOURCE_EXT: &str = "SourceExt";
  pub const HEADER_OUTPUT_DIR: &str = "HeaderOutputDir";
  pub const BASE_DIRECTORY_FOR_GENERATED_INCLUDE: &str = "BaseDirectoryForGeneratedInclude";
}

/// Separator between list entries inside a single option value.
const LIST_SEPARATOR: char = ';';

#[derive(Debug, Error)]
#[error("invalid additional options `{value}`: {source}")]
pub struct InvalidOptions {
  pub value: String,
  #[source]
  pub source: shell_words::ParseError,
}

pub trait OptionContributor {
  /// Adds this contributor's options for `options` to `map`. Empty values are left out.
  fn contribute(&self, options: &BuildOptions, map: &mut OptionMap);

  /// Appends the generator arguments for this contributor's keys in `map`.
  fn arguments(&self, map: &OptionMap, args: &mut Vec<String>) -> Result<(), InvalidOptions>;
}

/// Options understood by every generator.
pub struct CommonOptions;

impl OptionContributor for CommonOptions {
  fn contribute(&self, options: &BuildOptions, map: &mut OptionMap) {
    insert_non_empty(map, keys::OUTPUT_DIR, &options.output_dir);

    let includes: Vec<&str> = options
      .include_directories
      .iter()
      .map(String::as_str)
      .filter(|dir| !dir.is_empty())
      .collect();
    if !includes.is_empty() {
      map.insert(
        keys::INCLUDE_DIRECTORIES.to_string(),
        includes.join(&LIST_SEPARATOR.to_string()),
      );
    }

    if let Some(additional) = &options.additional_options {
      insert_non_empty(map, keys::ADDITIONAL_OPTIONS, additional.trim());
    }
  }

  fn arguments(&self, map: &OptionMap, args: &mut Vec<String>) -> Result<(), InvalidOptions> {
    if let Some(dir) = map.get(keys::OUTPUT_DIR) {
      args.push("--output-dir".to_string());
      args.push(dir.clone());
    }

    if let Some(includes) = map.get(keys::INCLUDE_DIRECTORIES) {
      args.extend(includes.split(LIST_SEPARATOR).map(|dir| format!("-I{dir}")));
    }

    if let Some(additional) = map.get(keys::ADDITIONAL_OPTIONS) {
      let split = shell_words::split(additional).map_err(|source| InvalidOptions {
        value: additional.clone(),
        source,
      })?;
      args.extend(split);
    }

    Ok(())
  }
}

/// Builds the option mapping for `options` under `generator`.
pub fn effective_options(generator: &dyn Generator, options: &BuildOptions) -> OptionMap {
  let mut map = OptionMap::new();
  CommonOptions.contribute(options, &mut map);
  generator.contribute(options, &mut map);
  map
}

/// Builds the full generator command line for one source.
///
/// Generator-specific arguments come first, then the dependency-report switches (when
/// `depend_file` is set), then the common options, then the source itself.
pub fn command_arguments(
  generator: &dyn Generator,
  map: &OptionMap,
  depend_file: Option<&Path>,
  identity: &str,
) -> Result<Vec<String>, InvalidOptions> {
  let mut args = Vec::new();
  generator.arguments(map, &mut args)?;

  if let Some(depend_file) = depend_file {
    args.push("--depend-xml".to_string());
    args.push("--depend-file".to_string());
    args.push(depend_file.display().to_string());
  }

  CommonOptions.arguments(map, &mut args)?;
  args.push(identity.to_string());
  Ok(args)
}

pub(crate) fn insert_non_empty(map: &mut OptionMap, key: &str, value: &str) {
  if !value.is_empty() {
    map.insert(key.to_string(), value.to_string());
  }
}
