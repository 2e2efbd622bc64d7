//! Contains the common [`ErrorKind`] trait used by source-located errors in the step tutor to
//! display user-facing error messages, and to report a stable error code to collaborators.

use ariadne::{Color, Report, Source};
use std::{fmt::{Debug, Display}, ops::Range};

// lets the `ErrorKind` derive refer to `tutor_error::EXPR` from inside this crate's own tests
extern crate self as tutor_error;

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can be pinned to regions of an input string.
pub trait ErrorKind: Debug + Display + Send + Sync {
    /// The stable, machine-readable code for this error, such as `parse-error`.
    fn code(&self) -> &'static str;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error is fatal. Fatal errors stop any backtracking in progress.
    pub fatal: bool,
}

impl Error {
    /// Creates a new non-fatal error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// The stable code of the underlying error kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        if self.spans.is_empty() {
            self.kind.build_report(src_id, &[0..0])
        } else {
            self.kind.build_report(src_id, &self.spans)
        }
    }

    /// Renders the report for this error against the given source into a string. Colors are
    /// included.
    pub fn render(&self, src_id: &str, source: &str) -> String {
        let mut buf = Vec::new();
        // writing into a `Vec` cannot fail
        let _ = self.build_report(src_id).write((src_id, Source::from(source)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_attrs::ErrorKind;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        code = "parse-error",
        message = "missing denominator",
        labels = ["this fraction"],
        help = "write the denominator after the slash",
    )]
    struct MissingDenominator;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        code = "invalid-path",
        message = format!("unknown path step `{}`", self.step),
        labels = ["here"],
    )]
    struct UnknownStep {
        step: String,
    }

    fn plain(err: &Error, source: &str) -> String {
        let rendered = err.render("input", source);
        String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap()
    }

    #[test]
    fn report_contains_message_and_help() {
        let err = Error::new(vec![0..2], MissingDenominator);
        let report = plain(&err, "1/ + 2");

        assert!(report.contains("missing denominator"));
        assert!(report.contains("this fraction"));
        assert!(report.contains("write the denominator after the slash"));
        assert_eq!(err.code(), "parse-error");
        assert!(!err.fatal);
    }

    #[test]
    fn message_uses_fields() {
        let err = Error::new_fatal(vec![5..8], UnknownStep { step: "foo".to_string() });
        assert_eq!(err.to_string(), "unknown path step `foo`");
        assert_eq!(err.code(), "invalid-path");
        assert!(err.fatal);
        assert!(plain(&err, "term[0].foo").contains("unknown path step"));
    }

    #[test]
    fn report_without_spans() {
        let err = Error::new(Vec::new(), MissingDenominator);
        assert!(plain(&err, "").contains("missing denominator"));
    }
}
