//! Classification of generator output lines.
//!
//! Generator diagnostics look like `<file>:<line>: warning: <message>`. The
//! file may be prefixed by the working directory and, on Windows, carry a
//! drive letter whose colon is not a separator. A line containing
//! `<tool>:` is a usage error; it is reported once and every later line of
//! the same invocation is ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::util::path::{make_relative, normalize};

use super::types::{Diagnostic, DiagnosticKind};

/// Per-invocation state for classifying generator output.
#[derive(Debug)]
pub struct DiagnosticParser<'a> {
  tool_names: Vec<String>,
  working_dir: &'a Path,
  depend_mode: bool,
  usage_error: bool,
}

impl<'a> DiagnosticParser<'a> {
  /// `tool_name` may be given with or without its platform suffix. In `depend_mode`
  /// warnings are dropped, as the generation pass has already reported them.
  pub fn new(tool_name: &str, executable_name: &str, working_dir: &'a Path, depend_mode: bool) -> Self {
    let mut tool_names = vec![executable_name.to_string()];
    if tool_name != executable_name {
      tool_names.push(tool_name.to_string());
    }
    Self {
      tool_names,
      working_dir,
      depend_mode,
      usage_error: false,
    }
  }

  /// True once a usage error has been seen.
  pub fn usage_error(&self) -> bool {
    self.usage_error
  }

  /// Classifies every line of `text`.
  pub fn parse(&mut self, text: &str) -> Vec<Diagnostic> {
    text.lines().filter_map(|line| self.classify(line)).collect()
  }

  /// Classifies one output line, or returns `None` when it carries nothing to report.
  pub fn classify(&mut self, line: &str) -> Option<Diagnostic> {
    if self.usage_error {
      return None;
    }

    if let Some(message) = self.usage_message(line) {
      self.usage_error = true;
      return Some(Diagnostic {
        kind: DiagnosticKind::Usage,
        file: None,
        line: None,
        message,
      });
    }

    let mut text = line.trim();
    let working_dir = self.working_dir.to_string_lossy();
    if let Some(rest) = text.strip_prefix(working_dir.as_ref())
      && (rest.is_empty() || rest.starts_with(['/', '\\']))
    {
      text = rest.trim_start_matches(['/', '\\']);
    }

    let Some(colon) = file_separator(text) else {
      if !text.is_empty() {
        debug!(line = %text, "ignoring generator output");
      }
      return None;
    };

    let file = text[..colon].trim().trim_matches('"');
    let file = (!file.is_empty()).then(|| self.relative_file(file));
    let mut rest = &text[colon + 1..];
    let mut line_number = None;

    if let Some(next) = rest.find(':')
      && let Ok(n) = rest[..next].trim().parse::<u32>()
    {
      line_number = Some(n);
      rest = &rest[next + 1..];
    }

    let description = rest.trim();
    let (kind, message) = if let Some(message) = description.strip_prefix("warning:") {
      (DiagnosticKind::Warning, message.trim())
    } else if let Some(message) = description.strip_prefix("error:") {
      (DiagnosticKind::Error, message.trim())
    } else if !description.is_empty() {
      (DiagnosticKind::Unclassified, description)
    } else {
      return None;
    };

    if kind == DiagnosticKind::Warning && self.depend_mode {
      return None;
    }

    Some(Diagnostic {
      kind,
      file,
      line: line_number,
      message: message.to_string(),
    })
  }

  fn usage_message(&self, line: &str) -> Option<String> {
    self.tool_names.iter().find_map(|name| {
      let marker = format!("{name}:");
      line
        .find(&marker)
        .map(|i| format!("{}: {}", name, line[i + marker.len()..].trim()))
    })
  }

  fn relative_file(&self, file: &str) -> PathBuf {
    let absolute = normalize(self.working_dir, file);
    make_relative(self.working_dir, &absolute)
  }
}

/// Index of the colon ending the file part, skipping a drive-letter colon.
fn file_separator(text: &str) -> Option<usize> {
  let first = text.find(':')?;
  if first <= 1 && text.len() > first + 1 {
    return text[first + 1..].find(':').map(|i| first + 1 + i);
  }
  Some(first)
}

/// Logs `diagnostic` at the level matching its kind.
pub fn report(diagnostic: &Diagnostic) {
  match diagnostic.kind {
    DiagnosticKind::Warning => warn!("{diagnostic}"),
    DiagnosticKind::Error | DiagnosticKind::Unclassified | DiagnosticKind::Usage => error!("{diagnostic}"),
  }
}
