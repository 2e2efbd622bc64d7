//! The syntax tree of an arithmetic expression.
//!
//! Trees are immutable. Every rewrite builds a new tree with [`AstNode::replace`], which shares
//! all unmodified subtrees with the original through [`Arc`].

pub mod fmt;
pub mod iter;
pub mod number;
pub mod path;

use crate::parser::{token::op::{BinOpKind, Operator, UnaryOpKind}, Precedence};
use number::Number;
use path::{Path, PathStep};
use rug::Integer;
use std::{cmp::Ordering, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node of an arithmetic expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AstNode {
    /// A non-negative number literal, such as `12` or `1.5`.
    Number(Number),

    /// A fraction. Fractions written as `a/b` have integer literal parts, while fractions written
    /// with `\frac{A}{B}` can hold any expression.
    Fraction {
        numerator: Arc<AstNode>,
        denominator: Arc<AstNode>,
    },

    /// A mixed number, such as `2\frac{1}{3}`.
    MixedNumber {
        whole: Integer,
        numerator: Integer,
        denominator: Integer,
    },

    /// A binary operation, such as `1 + 2`.
    BinaryOp {
        op: BinOpKind,
        left: Arc<AstNode>,
        right: Arc<AstNode>,
    },

    /// A unary operation, such as `-3`.
    UnaryOp {
        op: UnaryOpKind,
        argument: Arc<AstNode>,
    },

    /// A named variable, such as `x`.
    Variable(String),
}

impl AstNode {
    /// Creates an integer literal. Negative values are wrapped in a unary minus, so the result is
    /// always in the form the parser would produce.
    pub fn integer(value: impl Into<Integer>) -> Self {
        Self::number(Number::integer(value))
    }

    /// Creates a number literal. Negative values are wrapped in a unary minus.
    pub fn number(number: Number) -> Self {
        if number.is_negative() {
            Self::neg(Self::Number(number.abs()))
        } else {
            Self::Number(number)
        }
    }

    /// Creates a fraction node from two nodes.
    pub fn fraction(numerator: AstNode, denominator: AstNode) -> Self {
        Self::Fraction {
            numerator: Arc::new(numerator),
            denominator: Arc::new(denominator),
        }
    }

    /// Creates an integer fraction `numerator/denominator`. The sign of the fraction is moved
    /// outside as a unary minus, and the literal parts are non-negative.
    pub fn int_fraction(numerator: impl Into<Integer>, denominator: impl Into<Integer>) -> Self {
        let (numerator, denominator) = (numerator.into(), denominator.into());
        let negative = (numerator.cmp0() == Ordering::Less) != (denominator.cmp0() == Ordering::Less);
        let fraction = Self::fraction(
            Self::Number(Number::integer(numerator.abs())),
            Self::Number(Number::integer(denominator.abs())),
        );

        if negative && !fraction_is_zero(&fraction) {
            Self::neg(fraction)
        } else {
            fraction
        }
    }

    /// Creates a mixed number `whole numerator/denominator`, moving a negative sign outside.
    pub fn mixed_number(whole: Integer, numerator: Integer, denominator: Integer) -> Self {
        let negative = whole.cmp0() == Ordering::Less;
        let mixed = Self::MixedNumber {
            whole: whole.abs(),
            numerator: numerator.abs(),
            denominator: denominator.abs(),
        };

        if negative {
            Self::neg(mixed)
        } else {
            mixed
        }
    }

    /// Creates a binary operation node.
    pub fn binary(op: BinOpKind, left: AstNode, right: AstNode) -> Self {
        Self::BinaryOp {
            op,
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }

    /// Creates a unary operation node.
    pub fn unary(op: UnaryOpKind, argument: AstNode) -> Self {
        Self::UnaryOp { op, argument: Arc::new(argument) }
    }

    /// Creates a unary minus node.
    pub fn neg(argument: AstNode) -> Self {
        Self::unary(UnaryOpKind::Neg, argument)
    }

    /// Returns the operator of this node, if it is a binary or unary operation.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::BinaryOp { op, .. } => Some(Operator::Binary(*op)),
            Self::UnaryOp { op, .. } => Some(Operator::Unary(*op)),
            _ => None,
        }
    }

    /// Returns the precedence of this node, used to decide where parentheses are needed.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::BinaryOp { op, .. } => op.precedence(),
            Self::UnaryOp { op, .. } => op.precedence(),
            _ => Precedence::Atom,
        }
    }

    /// Returns the value of this node if it is an integer literal written without a decimal
    /// point.
    pub fn as_integer_literal(&self) -> Option<&Integer> {
        match self {
            Self::Number(number) => number.as_integer(),
            _ => None,
        }
    }

    /// Returns the child reached by taking the given step from this node.
    pub fn child(&self, step: PathStep) -> Option<&AstNode> {
        match (self, step) {
            (Self::BinaryOp { left, .. }, PathStep::Left) => Some(left.as_ref()),
            (Self::BinaryOp { right, .. }, PathStep::Right) => Some(right.as_ref()),
            (Self::UnaryOp { argument, .. }, PathStep::Argument) => Some(argument.as_ref()),
            (Self::Fraction { numerator, .. }, PathStep::Num) => Some(numerator.as_ref()),
            (Self::Fraction { denominator, .. }, PathStep::Den) => Some(denominator.as_ref()),
            _ => None,
        }
    }

    /// Returns a mutable reference to the slot holding the child reached by the given step.
    fn child_slot_mut(&mut self, step: PathStep) -> Option<&mut Arc<AstNode>> {
        match (self, step) {
            (Self::BinaryOp { left, .. }, PathStep::Left) => Some(left),
            (Self::BinaryOp { right, .. }, PathStep::Right) => Some(right),
            (Self::UnaryOp { argument, .. }, PathStep::Argument) => Some(argument),
            (Self::Fraction { numerator, .. }, PathStep::Num) => Some(numerator),
            (Self::Fraction { denominator, .. }, PathStep::Den) => Some(denominator),
            _ => None,
        }
    }

    /// Returns the node at the given path, or [`None`] if the path does not lead to a node of
    /// this tree.
    pub fn navigate(&self, path: &Path) -> Option<&AstNode> {
        path.steps()
            .iter()
            .try_fold(self, |node, step| node.child(*step))
    }

    /// Returns a new tree with the node at the given path replaced by `node`, or [`None`] if the
    /// path does not lead to a node of this tree. Replacing the root returns `node` itself.
    ///
    /// Only the nodes along the path are rebuilt; every other subtree is shared with `self`.
    pub fn replace(&self, path: &Path, node: AstNode) -> Option<AstNode> {
        self.replace_steps(path.steps(), node)
    }

    fn replace_steps(&self, steps: &[PathStep], node: AstNode) -> Option<AstNode> {
        let Some((first, rest)) = steps.split_first() else {
            return Some(node);
        };

        let mut rebuilt = self.clone();
        let slot = rebuilt.child_slot_mut(*first)?;
        let replaced = slot.replace_steps(rest, node)?;
        *slot = Arc::new(replaced);
        Some(rebuilt)
    }
}

/// Returns true if the fraction has a literal zero numerator.
fn fraction_is_zero(fraction: &AstNode) -> bool {
    match fraction {
        AstNode::Fraction { numerator, .. } => numerator
            .as_integer_literal()
            .map_or(false, |n| n.cmp0() == Ordering::Equal),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::parse;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn navigate_binary_and_fraction() {
        let ast = parse("1/7 + 3/7").unwrap();
        assert_eq!(ast.navigate(&path("term[1].den")), Some(&AstNode::integer(7)));
        assert_eq!(ast.navigate(&path("term[0].num")), Some(&AstNode::integer(1)));
        assert_eq!(ast.navigate(&Path::root()), Some(&ast));
        assert_eq!(ast.navigate(&path("argument")), None);
        assert_eq!(ast.navigate(&path("term[0].num.den")), None);
    }

    #[test]
    fn replace_shares_untouched_subtrees() {
        let ast = parse("1 + 2 \\cdot 3").unwrap();
        let replaced = ast.replace(&path("term[1]"), AstNode::integer(6)).unwrap();
        assert_eq!(replaced, parse("1 + 6").unwrap());

        let (AstNode::BinaryOp { left: old, .. }, AstNode::BinaryOp { left: new, .. }) = (&ast, &replaced) else {
            panic!("expected binary operations");
        };
        assert!(Arc::ptr_eq(old, new));
    }

    #[test]
    fn replace_root_and_missing() {
        let ast = parse("-4").unwrap();
        assert_eq!(ast.replace(&Path::root(), AstNode::integer(4)), Some(AstNode::integer(4)));
        assert_eq!(ast.replace(&path("term[0]"), AstNode::integer(4)), None);
        assert_eq!(ast.replace(&path("argument"), AstNode::integer(5)), Some(parse("-5").unwrap()));
    }

    #[test]
    fn signed_constructors() {
        assert_eq!(AstNode::integer(-3), parse("-3").unwrap());
        assert_eq!(AstNode::int_fraction(-1, 2), parse("-1/2").unwrap());
        assert_eq!(AstNode::int_fraction(1, -2), parse("-1/2").unwrap());
        assert_eq!(AstNode::int_fraction(-1, -2), parse("1/2").unwrap());
        assert_eq!(AstNode::int_fraction(0, -2), parse("0/2").unwrap());
        assert_eq!(
            AstNode::mixed_number(Integer::from(-2), Integer::from(1), Integer::from(3)),
            parse("-2\\frac{1}{3}").unwrap(),
        );
    }
}
