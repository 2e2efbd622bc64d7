use ariadne::Source;
use tutor_core::ApplyError;
use tutor_parser::Error as ParseError;

/// Utility enum to package errors that can occur while running a command.
pub enum Error {
    /// An expression or path could not be parsed. `source` is the text that was parsed.
    Parse { err: ParseError, source: String },

    /// A rule could not be applied.
    Apply(ApplyError),

    /// The command itself is malformed.
    Usage(&'static str),
}

impl Error {
    /// Wraps an error that occurred while parsing `source`.
    pub fn parse(err: ParseError, source: &str) -> Self {
        Self::Parse { err, source: source.to_string() }
    }

    /// Report this [`Error`] to stderr.
    ///
    /// The `ariadne` crate's [`ariadne::Report`] type does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Parse { err, source } => {
                let report = err.build_report("input");
                if let Err(io_err) = report.eprint(("input", Source::from(source))) {
                    eprintln!("{}: {}", err, io_err);
                }
            },
            Self::Apply(err) => eprintln!("error[{}]: {}", err.code(), err),
            Self::Usage(usage) => eprintln!("usage: {}", usage),
        }
    }
}

impl From<ApplyError> for Error {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}
