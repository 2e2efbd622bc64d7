//! Rewrites that change the shape of an expression without computing anything: sign handling,
//! distribution of a minus sign, regrouping, and removing brackets.
//!
//! Operands are moved into the new tree by cloning their [`Arc`], so the rewritten node shares
//! every operand with the original.

use crate::{
    error::ApplyError,
    numeric::{is_zero, negated, signed_fraction, signed_integer, signed_number},
};
use std::sync::Arc;
use super::{operands, Target};
use tutor_parser::{AstNode, BinOpKind, UnaryOpKind};

/// Builds a binary operation from shared operands.
fn binary(op: BinOpKind, left: &Arc<AstNode>, right: &Arc<AstNode>) -> AstNode {
    AstNode::BinaryOp {
        op,
        left: Arc::clone(left),
        right: Arc::clone(right),
    }
}

/// If the node is a binary operation, returns its parts.
fn as_binary(node: &AstNode) -> Option<(BinOpKind, &Arc<AstNode>, &Arc<AstNode>)> {
    match node {
        AstNode::BinaryOp { op, left, right } => Some((*op, left, right)),
        _ => None,
    }
}

/// If the node is a unary operation of the given kind, returns its argument.
fn as_unary(node: &AstNode, kind: UnaryOpKind) -> Option<&Arc<AstNode>> {
    match node {
        AstNode::UnaryOp { op, argument } if *op == kind => Some(argument),
        _ => None,
    }
}

/// Replaces `a op (-b)` with `a new_op b`.
fn flip_negative_right(target: Target, op: BinOpKind, new_op: BinOpKind) -> Result<AstNode, ApplyError> {
    let (_, left, right) = as_binary(target.node)
        .filter(|(actual, _, _)| *actual == op)
        .ok_or_else(|| target.not_applicable())?;
    let inner = as_unary(right, UnaryOpKind::Neg).ok_or_else(|| target.not_applicable())?;
    Ok(binary(new_op, left, inner))
}

/// `a - (-b) = a + b`
pub fn sub_neg_to_add(target: Target) -> Result<AstNode, ApplyError> {
    flip_negative_right(target, BinOpKind::Sub, BinOpKind::Add)
}

/// `a + (-b) = a - b`
pub fn add_neg_to_sub(target: Target) -> Result<AstNode, ApplyError> {
    flip_negative_right(target, BinOpKind::Add, BinOpKind::Sub)
}

/// Returns the opposite of an additive operator.
fn opposite(op: BinOpKind) -> BinOpKind {
    match op {
        BinOpKind::Add => BinOpKind::Sub,
        _ => BinOpKind::Add,
    }
}

/// If the node is a sum or difference, returns its parts.
fn as_sum(node: &AstNode) -> Option<(BinOpKind, &Arc<AstNode>, &Arc<AstNode>)> {
    as_binary(node).filter(|(op, _, _)| matches!(op, BinOpKind::Add | BinOpKind::Sub))
}

/// `a - (b + c) = a - b - c`
/// `a - (b - c) = a - b + c`
pub fn sub_distribute(target: Target) -> Result<AstNode, ApplyError> {
    let (_, a, right) = as_binary(target.node)
        .filter(|(op, _, _)| *op == BinOpKind::Sub)
        .ok_or_else(|| target.not_applicable())?;
    let (inner, b, c) = as_sum(right).ok_or_else(|| target.not_applicable())?;

    let head = binary(BinOpKind::Sub, a, b);
    Ok(AstNode::BinaryOp {
        op: opposite(inner),
        left: Arc::new(head),
        right: Arc::clone(c),
    })
}

/// `a + (b ± c) = (a + b) ± c`
/// `a \cdot (b \cdot c) = (a \cdot b) \cdot c`
pub fn regroup(target: Target) -> Result<AstNode, ApplyError> {
    let (outer, a, right) = as_binary(target.node).ok_or_else(|| target.not_applicable())?;
    let (inner, b, c) = as_binary(right).ok_or_else(|| target.not_applicable())?;
    let fits = match outer {
        BinOpKind::Add => matches!(inner, BinOpKind::Add | BinOpKind::Sub),
        BinOpKind::Mul => inner == BinOpKind::Mul,
        _ => false,
    };
    if !fits {
        return Err(target.not_applicable());
    }

    let head = binary(outer, a, b);
    Ok(AstNode::BinaryOp {
        op: inner,
        left: Arc::new(head),
        right: Arc::clone(c),
    })
}

/// `-(-a) = a`
pub fn neg_neg(target: Target) -> Result<AstNode, ApplyError> {
    as_unary(target.node, UnaryOpKind::Neg)
        .and_then(|argument| as_unary(argument, UnaryOpKind::Neg))
        .map(|inner| inner.as_ref().clone())
        .ok_or_else(|| target.not_applicable())
}

/// `-(b + c) = -b - c`
/// `-(b - c) = -b + c`
pub fn neg_distribute(target: Target) -> Result<AstNode, ApplyError> {
    let argument = as_unary(target.node, UnaryOpKind::Neg).ok_or_else(|| target.not_applicable())?;
    let (inner, b, c) = as_sum(argument).ok_or_else(|| target.not_applicable())?;

    let head = AstNode::UnaryOp { op: UnaryOpKind::Neg, argument: Arc::clone(b) };
    Ok(AstNode::BinaryOp {
        op: opposite(inner),
        left: Arc::new(head),
        right: Arc::clone(c),
    })
}

/// `+a = a`
pub fn unary_plus_drop(target: Target) -> Result<AstNode, ApplyError> {
    as_unary(target.node, UnaryOpKind::Pos)
        .map(|argument| argument.as_ref().clone())
        .ok_or_else(|| target.not_applicable())
}

/// `(a) = a`
///
/// Brackets are not nodes of the tree, so this rewrite leaves the tree unchanged; only the printed
/// form can differ, once the brackets are no longer needed.
pub fn bracket_remove(target: Target) -> Result<AstNode, ApplyError> {
    Ok(target.node.clone())
}

/// `\frac{A}{B} = A \cdot 1/B`, where `B` is an integer or a fraction with integer parts.
pub fn nested_frac_div(target: Target) -> Result<AstNode, ApplyError> {
    let AstNode::Fraction { numerator, denominator } = target.node else {
        return Err(target.not_applicable());
    };

    let is_fraction = |node: &AstNode| matches!(negated(node).unwrap_or(node), AstNode::Fraction { .. });
    if !is_fraction(numerator.as_ref()) && !is_fraction(denominator.as_ref()) {
        return Err(target.not_applicable());
    }

    let reciprocal = if let Some(k) = signed_integer(denominator) {
        if is_zero(&k) {
            return Err(target.division_by_zero());
        }
        AstNode::int_fraction(1, k)
    } else if let Some((n, d)) = signed_fraction(denominator) {
        if is_zero(&n) || is_zero(&d) {
            return Err(target.division_by_zero());
        }
        AstNode::int_fraction(d, n)
    } else {
        return Err(target.not_applicable());
    };

    Ok(AstNode::BinaryOp {
        op: BinOpKind::Mul,
        left: Arc::clone(numerator),
        right: Arc::new(reciprocal),
    })
}

/// Returns the error of executing a division-by-zero diagnostic: the target must be a division by
/// zero, or a fraction with a zero denominator.
pub fn division_by_zero(target: Target) -> ApplyError {
    let zero_divisor = match operands(target, BinOpKind::Div) {
        Ok((_, divisor)) => signed_number(divisor).map(|n| n.is_zero())
            .or_else(|| signed_fraction(divisor).map(|(n, _)| is_zero(&n)))
            .unwrap_or(false),
        Err(_) => match target.node {
            AstNode::Fraction { denominator, .. } => signed_integer(denominator)
                .map_or(false, |d| is_zero(&d)),
            _ => false,
        },
    };

    if zero_divisor {
        target.division_by_zero()
    } else {
        target.not_applicable()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::super::run;

    fn ok(s: &str) -> Result<String, &'static str> {
        Ok(s.to_string())
    }

    #[test]
    fn signs() {
        assert_eq!(run(sub_neg_to_add, "3 - (-2)", "root"), ok("3 + 2"));
        assert_eq!(run(add_neg_to_sub, "3 + (-2)", "root"), ok("3 - 2"));
        assert_eq!(run(sub_neg_to_add, "3 + (-2)", "root"), Err("not-applicable"));
        assert_eq!(run(neg_neg, "-(-x)", "root"), ok("x"));
        assert_eq!(run(neg_neg, "-x", "root"), Err("not-applicable"));
        assert_eq!(run(unary_plus_drop, "+4", "root"), ok("4"));
    }

    #[test]
    fn distribution() {
        assert_eq!(run(sub_distribute, "a - (b + c)", "root"), ok("a - b - c"));
        assert_eq!(run(sub_distribute, "a - (b - c)", "root"), ok("a - b + c"));
        assert_eq!(run(sub_distribute, "a - b \\cdot c", "root"), Err("not-applicable"));
        assert_eq!(run(neg_distribute, "-(b + c)", "root"), ok("-b - c"));
        assert_eq!(run(neg_distribute, "-(b - c)", "root"), ok("-b + c"));
    }

    #[test]
    fn regrouping() {
        assert_eq!(run(regroup, "a + (b + c)", "root"), ok("a + b + c"));
        assert_eq!(run(regroup, "a + (b - c)", "root"), ok("a + b - c"));
        assert_eq!(run(regroup, "a \\cdot (b \\cdot c)", "root"), ok("a \\cdot b \\cdot c"));
        assert_eq!(run(regroup, "a - (b + c)", "root"), Err("not-applicable"));
        assert_eq!(run(regroup, "a \\cdot (b + c)", "root"), Err("not-applicable"));
    }

    #[test]
    fn brackets_and_nesting() {
        assert_eq!(run(bracket_remove, "(1 + 2) + 3", "term[0]"), ok("1 + 2"));
        assert_eq!(run(nested_frac_div, "\\frac{1/2}{3}", "root"), ok("1/2 \\cdot 1/3"));
        assert_eq!(run(nested_frac_div, "\\frac{2}{3/4}", "root"), ok("2 \\cdot 4/3"));
        assert_eq!(run(nested_frac_div, "\\frac{1/2}{0}", "root"), Err("division-by-zero"));
        assert_eq!(run(nested_frac_div, "\\frac{1/2}{0/4}", "root"), Err("division-by-zero"));
        assert_eq!(run(nested_frac_div, "3/4", "root"), Err("not-applicable"));
    }

    #[test]
    fn zero_divisors() {
        let code = |source: &str| run(|t| Err(division_by_zero(t)), source, "root");
        assert_eq!(code("10 / 0"), Err("division-by-zero"));
        assert_eq!(code("1/2 \\div 0/3"), Err("division-by-zero"));
        assert_eq!(code("5/0"), Err("division-by-zero"));
        assert_eq!(code("10 / 2"), Err("not-applicable"));
    }
}
