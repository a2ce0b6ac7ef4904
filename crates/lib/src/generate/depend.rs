//! Parsing of the generator's `--depend-xml` report.
//!
//! ```xml
//! <dependencies>
//!   <source name="slice/Foo.ice">
//!     <dependsOn name="/abs/slice/Bar.ice"/>
//!   </source>
//! </dependencies>
//! ```

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::util::path::{PathKey, normalize};

#[derive(Debug, Error)]
pub enum ReportError {
  #[error("malformed XML: {0}")]
  Xml(#[from] quick_xml::Error),

  #[error("malformed attribute: {0}")]
  Attribute(#[from] quick_xml::events::attributes::AttrError),

  #[error("expected a <dependencies> root element")]
  MissingRoot,

  #[error("<{0}> is missing its name attribute")]
  MissingName(String),

  #[error("unexpected end of document")]
  Truncated,
}

/// One `<source>` entry of a report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportedSource {
  pub name: String,
  pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependReport {
  pub sources: Vec<ReportedSource>,
}

impl DependReport {
  /// Dependencies reported for `identity`.
  ///
  /// An entry matches when its name equals `identity` or resolves to the same
  /// absolute path. A source missing from the report has no dependencies.
  pub fn dependencies_of(&self, working_dir: &Path, identity: &str) -> Vec<String> {
    let key = PathKey::new(&normalize(working_dir, identity));
    self
      .sources
      .iter()
      .filter(|source| source.name == identity || PathKey::new(&normalize(working_dir, &source.name)) == key)
      .flat_map(|source| source.depends_on.iter().cloned())
      .collect()
  }
}

/// Parses a dependency report document.
pub fn parse_report(xml: &str) -> Result<DependReport, ReportError> {
  let mut reader = Reader::from_str(xml);
  reader.trim_text(true);

  let mut report = DependReport::default();
  let mut current: Option<ReportedSource> = None;
  let mut depth = 0usize;
  let mut saw_root = false;

  loop {
    match reader.read_event()? {
      Event::Start(e) => {
        depth += 1;
        if depth == 1 {
          check_root(&e)?;
          saw_root = true;
        } else {
          open(&e, depth, &mut current, &mut report)?;
        }
      }
      Event::Empty(e) => {
        if depth == 0 {
          check_root(&e)?;
          saw_root = true;
        } else {
          open(&e, depth + 1, &mut current, &mut report)?;
          if depth == 1
            && let Some(source) = current.take()
          {
            report.sources.push(source);
          }
        }
      }
      Event::End(e) => {
        if depth == 2
          && e.name().as_ref() == b"source"
          && let Some(source) = current.take()
        {
          report.sources.push(source);
        }
        depth = depth.saturating_sub(1);
      }
      Event::Eof => break,
      _ => {}
    }
  }

  if !saw_root {
    return Err(ReportError::MissingRoot);
  }
  if depth != 0 {
    return Err(ReportError::Truncated);
  }
  Ok(report)
}

fn check_root(e: &BytesStart<'_>) -> Result<(), ReportError> {
  if e.name().as_ref() == b"dependencies" {
    Ok(())
  } else {
    Err(ReportError::MissingRoot)
  }
}

/// Handles an element opened at `depth` (root is depth 1).
fn open(
  e: &BytesStart<'_>,
  depth: usize,
  current: &mut Option<ReportedSource>,
  report: &mut DependReport,
) -> Result<(), ReportError> {
  match (depth, e.name().as_ref()) {
    (2, b"source") => {
      if let Some(previous) = current.take() {
        report.sources.push(previous);
      }
      *current = Some(ReportedSource {
        name: name_attribute(e, "source")?,
        depends_on: Vec::new(),
      });
    }
    (3, b"dependsOn") => {
      let name = name_attribute(e, "dependsOn")?;
      if let Some(source) = current.as_mut() {
        source.depends_on.push(name);
      }
    }
    _ => {}
  }
  Ok(())
}

fn name_attribute(e: &BytesStart<'_>, element: &str) -> Result<String, ReportError> {
  match e.try_get_attribute("name")? {
    Some(attr) => Ok(attr.unescape_value()?.into_owned()),
    None => Err(ReportError::MissingName(element.to_string())),
  }
}
