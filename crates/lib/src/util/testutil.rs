//! Test utilities for slicedep-lib.
//!
//! Helpers for tests that need a stand-in generator executable. All of them
//! produce `/bin/sh` scripts, so callers are unix-only.

use std::path::{Path, PathBuf};

/// Writes an executable shell script named `name` into `dir` and returns its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  std::fs::create_dir_all(dir).unwrap();
  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// A generator stand-in that writes `<stem>.cpp`/`<stem>.h` for every source
/// argument and answers `--depend-xml` with an empty dependency list.
#[cfg(unix)]
pub fn write_cpp_generator(dir: &Path) -> PathBuf {
  write_script(
    dir,
    "slice2cpp",
    r#"out=.
depend=0
dfile=
hext=h
sext=cpp
srcs=
while [ $# -gt 0 ]; do
  case "$1" in
    --depend-xml) depend=1 ;;
    --depend-file) shift; dfile="$1" ;;
    --output-dir) shift; out="$1" ;;
    --header-ext) shift; hext="$1" ;;
    --source-ext) shift; sext="$1" ;;
    --include-dir) shift ;;
    -*) ;;
    *) srcs="$srcs $1" ;;
  esac
  shift
done
if [ "$depend" = 1 ]; then
  echo '<dependencies>' > "$dfile"
  for s in $srcs; do echo "<source name=\"$s\"/>" >> "$dfile"; done
  echo '</dependencies>' >> "$dfile"
  exit 0
fi
for s in $srcs; do
  b=$(basename "$s")
  b=${b%.*}
  : > "$out/$b.$sext"
  : > "$out/$b.$hext"
done"#,
  )
}
