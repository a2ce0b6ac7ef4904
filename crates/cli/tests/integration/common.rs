//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Writes `<base>.cpp` and `<base>.h` for each source into `--output-dir`,
/// answers `--depend-xml` with no dependencies, and fails with a usage
/// message when a source is named `Broken.ice`.
const FAKE_SLICE2CPP: &str = r#"#!/bin/sh
out=.
depend=0
dfile=
srcs=
while [ $# -gt 0 ]; do
  case "$1" in
    --depend-xml) depend=1 ;;
    --depend-file) shift; dfile="$1" ;;
    --output-dir) shift; out="$1" ;;
    --header-ext|--source-ext|--include-dir) shift ;;
    -*) ;;
    *) srcs="$srcs $1" ;;
  esac
  shift
done
for s in $srcs; do
  if [ "$(basename "$s")" = Broken.ice ]; then
    echo "$s:3: syntax error" >&2
    exit 1
  fi
done
if [ "$depend" = 1 ]; then
  {
    echo '<dependencies>'
    for s in $srcs; do echo "  <source name=\"$s\"/>"; done
    echo '</dependencies>'
  } > "$dfile"
  exit 0
fi
echo "$srcs" >> "$0.log"
for s in $srcs; do
  b=$(basename "$s")
  b=${b%.*}
  : > "$out/$b.cpp"
  : > "$out/$b.h"
done
"#;

/// Isolated working directory with a manifest and the fake generator in `bin/`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new(sources: &[&str]) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    env.install_generator();

    let list: Vec<String> = sources.iter().map(|s| format!("\"{s}\"")).collect();
    env.write_file(
      "slicedep.json",
      &format!(
        r#"{{ "generator": "cpp", "toolsPath": "bin", "options": {{ "outputDir": "out" }}, "sources": [{}] }}"#,
        list.join(", ")
      ),
    );
    for source in sources {
      env.write_file(source, "module Demo {}\n");
    }
    env
  }

  /// Working directory, canonicalized so it matches paths printed by the binary.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Number of generation passes the fake generator has run.
  pub fn generator_runs(&self) -> usize {
    std::fs::read_to_string(self.root().join("bin/slice2cpp.log"))
      .map(|log| log.lines().count())
      .unwrap_or(0)
  }

  pub fn cmd(&self, subcommand: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("slicedep");
    cmd
      .env_remove("SLICEDEP_TOOLS_PATH")
      .env_remove("RUST_LOG")
      .current_dir(self.root())
      .arg(subcommand);
    cmd
  }

  fn install_generator(&self) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.temp.path().join("bin").join("slice2cpp");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, FAKE_SLICE2CPP).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }
}

pub fn exists(root: &Path, relative_path: &str) -> bool {
  root.join(relative_path).exists()
}
