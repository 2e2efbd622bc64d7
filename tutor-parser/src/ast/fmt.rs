//! Printing of expressions, both in the plain text form exchanged with front-ends and as LaTeX.

use std::fmt::{self, Display, Formatter};
use super::{path::PathStep, AstNode};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt_latex(f)
    }
}

/// Returns true if the child of `parent` reached by `step` must be surrounded by parentheses
/// when printed.
///
/// Parentheses are needed around:
/// - a binary operand whose operator binds more loosely than the parent's,
/// - a right binary operand whose operator binds equally tightly,
/// - a unary operation on the right side of a binary operation (`3 - (-2)`),
/// - an operation that is the operand of a unary operation (`-(1 + 2)`).
///
/// Fraction parts never need parentheses, since they are delimited by braces or are literals.
pub fn child_needs_parens(parent: &AstNode, step: PathStep) -> bool {
    let Some(child) = parent.child(step) else {
        return false;
    };

    match parent {
        AstNode::BinaryOp { op, .. } => match child {
            AstNode::UnaryOp { .. } => step == PathStep::Right,
            AstNode::BinaryOp { op: child_op, .. } => {
                let (outer, inner) = (op.precedence(), child_op.precedence());
                inner < outer || step == PathStep::Right && inner == outer
            },
            _ => false,
        },
        AstNode::UnaryOp { .. } => {
            matches!(child, AstNode::BinaryOp { .. } | AstNode::UnaryOp { .. })
        },
        _ => false,
    }
}

/// Formats the child of `parent` reached by `step`, adding parentheses if needed.
fn fmt_child(f: &mut Formatter, parent: &AstNode, step: PathStep, latex: bool) -> fmt::Result {
    let Some(child) = parent.child(step) else {
        return Ok(());
    };

    let parens = child_needs_parens(parent, step);
    match (parens, latex) {
        (true, true) => write!(f, "\\left(")?,
        (true, false) => write!(f, "(")?,
        _ => (),
    }

    if latex {
        child.fmt_latex(f)?;
    } else {
        write!(f, "{}", child)?;
    }

    match (parens, latex) {
        (true, true) => write!(f, "\\right)"),
        (true, false) => write!(f, ")"),
        _ => Ok(()),
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AstNode::Number(number) => write!(f, "{}", number),
            AstNode::Fraction { numerator, denominator } => {
                match (numerator.as_integer_literal(), denominator.as_integer_literal()) {
                    (Some(n), Some(d)) => write!(f, "{}/{}", n, d),
                    _ => write!(f, "\\frac{{{}}}{{{}}}", numerator, denominator),
                }
            },
            AstNode::MixedNumber { whole, numerator, denominator } => {
                write!(f, "{}\\frac{{{}}}{{{}}}", whole, numerator, denominator)
            },
            AstNode::BinaryOp { op, .. } => {
                fmt_child(f, self, PathStep::Left, false)?;
                write!(f, " {} ", op.symbol())?;
                fmt_child(f, self, PathStep::Right, false)
            },
            AstNode::UnaryOp { op, .. } => {
                write!(f, "{}", op.symbol())?;
                fmt_child(f, self, PathStep::Argument, false)
            },
            AstNode::Variable(name) => write!(f, "{}", name),
        }
    }
}

impl Latex for AstNode {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AstNode::Number(number) => write!(f, "{}", number),
            AstNode::Fraction { numerator, denominator } => {
                write!(f, "\\frac{{")?;
                numerator.fmt_latex(f)?;
                write!(f, "}}{{")?;
                denominator.fmt_latex(f)?;
                write!(f, "}}")
            },
            AstNode::MixedNumber { whole, numerator, denominator } => {
                write!(f, "{}\\frac{{{}}}{{{}}}", whole, numerator, denominator)
            },
            AstNode::BinaryOp { op, .. } => {
                fmt_child(f, self, PathStep::Left, true)?;
                write!(f, " {} ", op.symbol())?;
                fmt_child(f, self, PathStep::Right, true)
            },
            AstNode::UnaryOp { op, .. } => {
                write!(f, "{}", op.symbol())?;
                fmt_child(f, self, PathStep::Argument, true)
            },
            AstNode::Variable(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::parse;

    fn reprint(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn fmt_display() {
        assert_eq!(reprint("1/7+3/7"), "1/7 + 3/7");
        assert_eq!(reprint("2*3 ÷ 4"), "2 \\cdot 3 \\div 4");
        assert_eq!(reprint("7 / 2"), "7 / 2");
        assert_eq!(reprint("\\frac{1}{3}"), "1/3");
        assert_eq!(reprint("\\frac{1.5}{x}"), "\\frac{1.5}{x}");
        assert_eq!(reprint("2\\frac{1}{3}"), "2\\frac{1}{3}");
    }

    #[test]
    fn fmt_parens() {
        assert_eq!(reprint("(1 + 2) * 3"), "(1 + 2) \\cdot 3");
        assert_eq!(reprint("1 - (2 - 3)"), "1 - (2 - 3)");
        assert_eq!(reprint("1 + (2 + 3)"), "1 + (2 + 3)");
        assert_eq!(reprint("(1 + 2) + 3"), "1 + 2 + 3");
        assert_eq!(reprint("3 - -2"), "3 - (-2)");
        assert_eq!(reprint("-(1 + 2)"), "-(1 + 2)");
        assert_eq!(reprint("--3"), "-(-3)");
        assert_eq!(reprint("-3 + 2"), "-3 + 2");
        assert_eq!(reprint("((4))"), "4");
    }

    #[test]
    fn fmt_latex() {
        let ast = parse("1/2 - (3 + x) : 4").unwrap();
        assert_eq!(
            ast.as_display().to_string(),
            "\\frac{1}{2} - \\left(3 + x\\right) \\div 4",
        );
    }

    #[test]
    fn latex_reparses() {
        let ast = parse("-(1/2 + 2\\frac{1}{4}) \\cdot (3 - -1)").unwrap();
        let latex = ast.as_display().to_string();
        assert_eq!(parse(&latex).unwrap(), ast);
    }
}
