//! Exact values read from expression nodes, and helpers to find related nodes in a tree.
//!
//! Every value here is a [`rug::Integer`] or a [`Number`]; nothing is ever converted to floating
//! point.

use rug::Integer;
use std::cmp::Ordering;
use tutor_parser::{AstNode, BinOpKind, Number, Path, UnaryOpKind};

/// Returns true if the integer is zero.
pub fn is_zero(n: &Integer) -> bool {
    n.cmp0() == Ordering::Equal
}

/// Returns true if the integer is negative.
pub fn is_negative(n: &Integer) -> bool {
    n.cmp0() == Ordering::Less
}

/// Returns the argument of a unary minus, if the node is one.
pub fn negated(node: &AstNode) -> Option<&AstNode> {
    match node {
        AstNode::UnaryOp { op: UnaryOpKind::Neg, argument } => Some(argument.as_ref()),
        _ => None,
    }
}

/// Returns the signed value of a number literal, or of a negated number literal.
///
/// `3` gives `3`, `-1.5` gives `-1.5`.
pub fn signed_number(node: &AstNode) -> Option<Number> {
    match node {
        AstNode::Number(number) => Some(number.clone()),
        _ => negated(node).and_then(|argument| match argument {
            AstNode::Number(number) => Some(number.neg()),
            _ => None,
        }),
    }
}

/// Returns the signed value of an integer literal (written without a decimal point), or of a
/// negated integer literal.
pub fn signed_integer(node: &AstNode) -> Option<Integer> {
    let number = signed_number(node)?;
    number.as_integer().cloned()
}

/// Returns true if the node is a decimal literal, or a negated one.
pub fn is_signed_decimal(node: &AstNode) -> bool {
    signed_number(node).map_or(false, |number| number.is_decimal())
}

/// Returns the numerator and denominator of a fraction whose parts are signed integer literals,
/// or of a negated one. The denominator is returned as written, so it may be zero or negative.
///
/// `3/4` gives `(3, 4)`, `-3/4` gives `(-3, 4)`, `\frac{3}{-4}` gives `(3, -4)`.
pub fn signed_fraction(node: &AstNode) -> Option<(Integer, Integer)> {
    match node {
        AstNode::Fraction { numerator, denominator } => {
            Some((signed_integer(numerator)?, signed_integer(denominator)?))
        },
        _ => {
            let (numerator, denominator) = signed_fraction(negated(node)?)?;
            Some((-numerator, denominator))
        },
    }
}

/// Like [`signed_fraction`], but moves the sign of the denominator into the numerator. Returns
/// [`None`] if the denominator is zero.
pub fn normalized_fraction(node: &AstNode) -> Option<(Integer, Integer)> {
    let (numerator, denominator) = signed_fraction(node)?;
    match denominator.cmp0() {
        Ordering::Equal => None,
        Ordering::Less => Some((-numerator, -denominator)),
        Ordering::Greater => Some((numerator, denominator)),
    }
}

/// Returns true if the node is a variable, or a negated variable.
pub fn is_signed_variable(node: &AstNode) -> bool {
    matches!(node, AstNode::Variable(_))
        || negated(node).map_or(false, |argument| matches!(argument, AstNode::Variable(_)))
}

/// Returns true if the node is a fraction of any kind, a mixed number, or a negated one of those.
pub fn is_fraction_like(node: &AstNode) -> bool {
    match node {
        AstNode::Fraction { .. } | AstNode::MixedNumber { .. } => true,
        _ => negated(node).map_or(false, is_fraction_like),
    }
}

/// Returns the (positive) denominator that the node exposes to a sibling operand, if any.
///
/// Fractions and mixed numbers expose their denominator. A product exposes a denominator if
/// exactly one of its factors does, as in `2 \cdot 1/3`.
pub fn exposed_denominator(node: &AstNode) -> Option<Integer> {
    match node {
        AstNode::Fraction { .. } => normalized_fraction(node).map(|(_, denominator)| denominator),
        AstNode::MixedNumber { denominator, .. } => {
            (!is_zero(denominator)).then(|| Integer::from(denominator.abs_ref()))
        },
        AstNode::UnaryOp { argument, .. } => exposed_denominator(argument),
        AstNode::BinaryOp { op: BinOpKind::Mul, left, right } => {
            match (exposed_denominator(left), exposed_denominator(right)) {
                (Some(denominator), None) | (None, Some(denominator)) => Some(denominator),
                _ => None,
            }
        },
        _ => None,
    }
}

/// Returns the other operand of the binary operation containing the node at `path`. A unary
/// operation in between is looked through, so in `-1/2 + 1/3`, the sibling of `1/2` is `1/3`.
pub fn sibling<'a>(root: &'a AstNode, path: &Path) -> Option<&'a AstNode> {
    let mut path = path.clone();
    loop {
        let last = path.last()?;
        let parent = path.parent()?;
        let parent_node = root.navigate(&parent)?;
        match (last.sibling(), parent_node) {
            (Some(step), _) => return parent_node.child(step),
            (None, AstNode::UnaryOp { .. }) => path = parent,
            (None, _) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tutor_parser::parse;
    use super::*;

    fn int(n: i64) -> Integer {
        Integer::from(n)
    }

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn signed_values() {
        assert_eq!(signed_integer(&parse("-7").unwrap()), Some(int(-7)));
        assert_eq!(signed_integer(&parse("1.5").unwrap()), None);
        assert_eq!(signed_number(&parse("-1.5").unwrap()).map(|n| n.to_string()), Some("-1.5".to_string()));
        assert_eq!(signed_fraction(&parse("-3/4").unwrap()), Some((int(-3), int(4))));
        assert_eq!(signed_fraction(&parse("\\frac{3}{-4}").unwrap()), Some((int(3), int(-4))));
        assert_eq!(normalized_fraction(&parse("\\frac{3}{-4}").unwrap()), Some((int(-3), int(4))));
        assert_eq!(normalized_fraction(&parse("3/0").unwrap()), None);
        assert_eq!(signed_fraction(&parse("\\frac{x}{4}").unwrap()), None);
    }

    #[test]
    fn denominators() {
        assert_eq!(exposed_denominator(&parse("-3/4").unwrap()), Some(int(4)));
        assert_eq!(exposed_denominator(&parse("2\\frac{1}{3}").unwrap()), Some(int(3)));
        assert_eq!(exposed_denominator(&parse("2 \\cdot 1/3").unwrap()), Some(int(3)));
        assert_eq!(exposed_denominator(&parse("1/2 \\cdot 1/3").unwrap()), None);
        assert_eq!(exposed_denominator(&parse("5").unwrap()), None);
    }

    #[test]
    fn siblings() {
        let ast = parse("-1/2 + 1/3").unwrap();
        assert_eq!(sibling(&ast, &path("term[0].argument")), Some(&parse("1/3").unwrap()));
        assert_eq!(sibling(&ast, &path("term[1]")), Some(&parse("-1/2").unwrap()));
        assert_eq!(sibling(&ast, &Path::root()), None);
        assert_eq!(sibling(&ast, &path("term[1].num")), None);
    }
}
