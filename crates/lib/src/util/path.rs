//! Path normalization.
//!
//! Paths are made absolute and lexically cleaned once, when they enter the
//! system. Equality between paths is decided by [`PathKey`], which folds case
//! only where the host filesystem is case-insensitive. Stored paths keep their
//! original spelling.

use std::path::{Component, Path, PathBuf};

const CASE_INSENSITIVE: bool = cfg!(any(windows, target_os = "macos"));

/// Resolves `path` against `base` and removes `.` and `..` components.
///
/// The filesystem is not consulted, so the path does not need to exist.
pub fn normalize(base: &Path, path: impl AsRef<Path>) -> PathBuf {
  let path = path.as_ref();
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  };

  let mut out = PathBuf::new();
  for component in joined.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other.as_os_str()),
    }
  }
  dunce::simplified(&out).to_path_buf()
}

/// Comparison key for a normalized path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathKey(String);

impl PathKey {
  pub fn new(path: &Path) -> Self {
    let text = path.to_string_lossy();
    let text = if cfg!(windows) {
      text.replace('/', "\\")
    } else {
      text.into_owned()
    };
    if CASE_INSENSITIVE {
      PathKey(text.to_lowercase())
    } else {
      PathKey(text)
    }
  }
}

impl From<&Path> for PathKey {
  fn from(path: &Path) -> Self {
    PathKey::new(path)
  }
}

/// Returns `to` expressed relative to the directory `from`.
///
/// `to` is returned unchanged when it is relative or shares no leading
/// component with `from` (for example, a different drive).
pub fn make_relative(from: &Path, to: &Path) -> PathBuf {
  if !to.is_absolute() {
    return to.to_path_buf();
  }

  let from: Vec<_> = from.components().collect();
  let target: Vec<_> = to.components().collect();

  let same = from
    .iter()
    .zip(target.iter())
    .take_while(|(a, b)| component_key(a) == component_key(b))
    .count();

  if same == 0 {
    return to.to_path_buf();
  }

  let mut relative = PathBuf::new();
  for _ in same..from.len() {
    relative.push("..");
  }
  for component in &target[same..] {
    relative.push(component.as_os_str());
  }
  relative
}

/// Renders `path` relative to `base` for log and diagnostic messages.
pub fn display_relative(base: &Path, path: &Path) -> String {
  let relative = make_relative(base, path);
  if relative.as_os_str().is_empty() {
    ".".to_string()
  } else {
    relative.display().to_string()
  }
}

fn component_key(component: &Component<'_>) -> PathKey {
  PathKey::new(Path::new(component.as_os_str()))
}
