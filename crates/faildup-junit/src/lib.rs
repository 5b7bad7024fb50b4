//! # faildup-junit
//!
//! **Tier 2 (Utilities)**
//!
//! Extracts failing test cases from JUnit/xUnit XML reports.
//!
//! Every `<testcase>` with a `<failure>` or `<error>` child yields one
//! [`FailureRecord`]. The message is the child's text content (CDATA
//! included), trimmed, falling back to its `message` attribute. Only the
//! first failure of a test case counts.
//!
//! ## What belongs here
//! * XML report parsing
//! * Skipping unreadable reports with a warning
//!
//! ## What does NOT belong here
//! * Report discovery (use faildup-walk)
//! * Similarity scoring

use std::path::{Path, PathBuf};

use faildup_types::{FailureRecord, FailureSet};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed report {file} at byte {position}: {source}")]
    Xml {
        file: String,
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
}

/// Failures pulled from a batch of reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub failures: FailureSet,
    pub reports_scanned: usize,
    /// One line per report that could not be read or parsed.
    pub warnings: Vec<String>,
}

/// Test case being read; `failure` holds the first failure message seen.
#[derive(Default)]
struct OpenCase {
    name: String,
    class_name: String,
    failure: Option<String>,
}

/// Failure element being read.
struct OpenFailure {
    text: String,
    message_attr: String,
}

impl OpenFailure {
    fn finish(self) -> String {
        let text = self.text.trim();
        if text.is_empty() {
            self.message_attr.trim().to_string()
        } else {
            text.to_string()
        }
    }
}

fn is_failure_tag(name: &[u8]) -> bool {
    name == b"failure" || name == b"error"
}

fn attr(e: &BytesStart<'_>, key: &str) -> Result<String, quick_xml::Error> {
    match e.try_get_attribute(key)? {
        Some(a) => Ok(a.unescape_value()?.into_owned()),
        None => Ok(String::new()),
    }
}

/// Parse one report's XML text. `file_name` is stamped on every record.
pub fn parse_report_str(xml: &str, file_name: &str) -> Result<Vec<FailureRecord>, ReportError> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();

    let mut case: Option<OpenCase> = None;
    let mut failure: Option<OpenFailure> = None;

    let to_err = |reader: &Reader<&[u8]>, source: quick_xml::Error| ReportError::Xml {
        file: file_name.to_string(),
        position: reader.error_position(),
        source,
    };

    loop {
        let event = reader.read_event().map_err(|e| to_err(&reader, e))?;
        match event {
            Event::Start(e) => {
                let local = e.local_name();
                if local.as_ref() == b"testcase" {
                    case = Some(OpenCase {
                        name: attr(&e, "name").map_err(|err| to_err(&reader, err))?,
                        class_name: attr(&e, "classname").map_err(|err| to_err(&reader, err))?,
                        failure: None,
                    });
                } else if is_failure_tag(local.as_ref()) {
                    if let Some(open) = case.as_ref() {
                        if open.failure.is_none() && failure.is_none() {
                            failure = Some(OpenFailure {
                                text: String::new(),
                                message_attr: attr(&e, "message")
                                    .map_err(|err| to_err(&reader, err))?,
                            });
                        }
                    }
                }
            }
            Event::Empty(e) => {
                let local = e.local_name();
                // A self-closed testcase has no children, so it passed.
                if is_failure_tag(local.as_ref()) {
                    if let Some(open) = case.as_mut() {
                        if open.failure.is_none() && failure.is_none() {
                            let message = attr(&e, "message").map_err(|err| to_err(&reader, err))?;
                            open.failure = Some(message.trim().to_string());
                        }
                    }
                }
            }
            Event::Text(t) => {
                if let Some(open) = failure.as_mut() {
                    let text = t.unescape().map_err(|e| to_err(&reader, e))?;
                    open.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(open) = failure.as_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                let local = e.local_name();
                if is_failure_tag(local.as_ref()) {
                    if let (Some(done), Some(open)) = (failure.take(), case.as_mut()) {
                        open.failure = Some(done.finish());
                    }
                } else if local.as_ref() == b"testcase" {
                    if let Some(OpenCase {
                        name,
                        class_name,
                        failure: Some(message),
                    }) = case.take()
                    {
                        records.push(FailureRecord::new(message, name, file_name, class_name));
                    }
                    failure = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Read and parse the report at `path`.
pub fn parse_report(path: &Path) -> Result<Vec<FailureRecord>, ReportError> {
    let xml = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_report_str(&xml, &file_name)
}

/// Parse every report in order and concatenate their failures.
///
/// Reports that fail to read or parse are skipped; each skip is logged and
/// listed in [`Extraction::warnings`].
pub fn collect_failures<P: AsRef<Path>>(paths: &[P]) -> Extraction {
    let mut out = Extraction::default();
    for path in paths {
        let path = path.as_ref();
        match parse_report(path) {
            Ok(records) => {
                debug!(
                    report = %path.display(),
                    failures = records.len(),
                    "parsed report"
                );
                out.reports_scanned += 1;
                out.failures.extend(FailureSet::from_records(records));
            }
            Err(err) => {
                warn!(report = %path.display(), "skipping report: {err}");
                out.warnings.push(err.to_string());
            }
        }
    }
    out
}
