use ariadne::Fmt;
use tutor_attrs::ErrorKind;
use tutor_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// An intentionally useless error. This should only be used for non-fatal errors, as it contains
/// no useful information.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "an internal non-fatal error occurred while parsing",
    labels = ["here"],
    help = "you should never see this error; please report this as a bug"
)]
pub struct NonFatal;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "unexpected token",
    labels = [format!("expected one of: {}", self.expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", self.found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis or curly brace was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if self.opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A LaTeX command other than `\frac`, `\cdot`, `\times`, `\div`, `\left(`, and `\right)` was
/// used.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = format!("unsupported command `{}`", self.name),
    labels = ["this command"],
    help = format!("only {} and the arithmetic operators are supported", "\\frac".fg(EXPR)),
)]
pub struct UnknownCommand {
    /// The command, including its leading backslash.
    pub name: String,
}

/// A `\frac` command was not followed by both of its `{...}` arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "parse-error",
    message = "incomplete fraction",
    labels = ["this fraction"],
    help = format!("write fractions as {}", "\\frac{numerator}{denominator}".fg(EXPR)),
)]
pub struct IncompleteFraction;

/// A path string contained a step that is not one of `term[0]`, `term[1]`, `argument`, `num`, or
/// `den`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    code = "invalid-path",
    message = format!("unknown path step `{}`", self.step),
    labels = ["this step"],
    help = format!(
        "path steps are {}, {}, {}, {}, and {}, joined by `.`",
        "term[0]".fg(EXPR),
        "term[1]".fg(EXPR),
        "argument".fg(EXPR),
        "num".fg(EXPR),
        "den".fg(EXPR),
    ),
)]
pub struct InvalidPathStep {
    /// The step that could not be understood.
    pub step: String,
}
