//! Arithmetic on fractions with integer literal parts, alone or together with integers.
//!
//! Operand fractions are read with their sign normalized into the numerator, so `\frac{3}{-4}`
//! and `-3/4` behave the same way. Results are built with [`AstNode::int_fraction`] and are never
//! reduced; reducing is a separate step.

use crate::{
    error::ApplyError,
    numeric::{is_zero, normalized_fraction, signed_fraction, signed_integer},
};
use rug::Integer;
use super::{operands, Target};
use tutor_parser::{AstNode, BinOpKind};

/// Returns the normalized parts of a fraction operand.
fn fraction(target: Target, node: &AstNode) -> Result<(Integer, Integer), ApplyError> {
    normalized_fraction(node).ok_or_else(|| target.not_applicable())
}

/// Returns the value of an integer operand.
fn integer(target: Target, node: &AstNode) -> Result<Integer, ApplyError> {
    signed_integer(node).ok_or_else(|| target.not_applicable())
}

/// Returns the numerator and denominator of a target that is itself a fraction with integer
/// literal parts, as written.
pub(crate) fn fraction_parts(target: Target) -> Result<(Integer, Integer), ApplyError> {
    match target.node {
        AstNode::Fraction { .. } => signed_fraction(target.node).ok_or_else(|| target.not_applicable()),
        _ => Err(target.not_applicable()),
    }
}

/// Returns the parts of two fraction operands that share a denominator.
fn same_den(target: Target, op: BinOpKind) -> Result<(Integer, Integer, Integer), ApplyError> {
    let (left, right) = operands(target, op)?;
    let (n1, d1) = fraction(target, left)?;
    let (n2, d2) = fraction(target, right)?;
    if d1 != d2 {
        return Err(target.not_applicable());
    }
    Ok((n1, n2, d1))
}

/// `a/d + b/d = (a+b)/d`
pub fn add_same_den(target: Target) -> Result<AstNode, ApplyError> {
    let (n1, n2, d) = same_den(target, BinOpKind::Add)?;
    Ok(AstNode::int_fraction(n1 + n2, d))
}

/// `a/d - b/d = (a-b)/d`
pub fn sub_same_den(target: Target) -> Result<AstNode, ApplyError> {
    let (n1, n2, d) = same_den(target, BinOpKind::Sub)?;
    Ok(AstNode::int_fraction(n1 - n2, d))
}

/// `a/b ± c/d = (a·L/b)/L ± (c·L/d)/L`, where `L` is the least common multiple of `b` and `d`.
pub fn common_denominator(target: Target) -> Result<AstNode, ApplyError> {
    let op = match target.node {
        AstNode::BinaryOp { op: op @ (BinOpKind::Add | BinOpKind::Sub), .. } => *op,
        _ => return Err(target.not_applicable()),
    };
    let (left, right) = operands(target, op)?;
    let (n1, d1) = fraction(target, left)?;
    let (n2, d2) = fraction(target, right)?;
    if d1 == d2 {
        return Err(target.not_applicable());
    }

    let lcm = Integer::from(d1.lcm_ref(&d2));
    let f1 = Integer::from(&lcm / &d1);
    let f2 = Integer::from(&lcm / &d2);
    Ok(AstNode::binary(
        op,
        AstNode::int_fraction(n1 * f1, lcm.clone()),
        AstNode::int_fraction(n2 * f2, lcm),
    ))
}

/// `a/b \cdot c/d = (a·c)/(b·d)`
pub fn mul(target: Target) -> Result<AstNode, ApplyError> {
    let (left, right) = operands(target, BinOpKind::Mul)?;
    let (n1, d1) = fraction(target, left)?;
    let (n2, d2) = fraction(target, right)?;
    Ok(AstNode::int_fraction(n1 * n2, d1 * d2))
}

/// `a/b / c/d = a/b \cdot d/c`
pub fn div(target: Target) -> Result<AstNode, ApplyError> {
    let (left, right) = operands(target, BinOpKind::Div)?;
    let (n2, d2) = fraction(target, right)?;
    if is_zero(&n2) {
        return Err(target.division_by_zero());
    }

    let (n1, d1) = fraction(target, left)?;
    Ok(AstNode::binary(
        BinOpKind::Mul,
        AstNode::int_fraction(n1, d1),
        AstNode::int_fraction(d2, n2),
    ))
}

/// Returns the parts of a fraction operand on the left and an integer operand on the right.
fn frac_int(target: Target, op: BinOpKind) -> Result<(Integer, Integer, Integer), ApplyError> {
    let (left, right) = operands(target, op)?;
    let k = integer(target, right)?;
    let (n, d) = fraction(target, left)?;
    Ok((n, d, k))
}

/// Returns the parts of an integer operand on the left and a fraction operand on the right.
fn int_frac(target: Target, op: BinOpKind) -> Result<(Integer, Integer, Integer), ApplyError> {
    let (left, right) = operands(target, op)?;
    let k = integer(target, left)?;
    let (n, d) = fraction(target, right)?;
    Ok((k, n, d))
}

/// `a/b + k = (a + k·b)/b`
pub fn frac_int_add(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d, k) = frac_int(target, BinOpKind::Add)?;
    Ok(AstNode::int_fraction(n + k * &d, d))
}

/// `k + a/b = (k·b + a)/b`
pub fn int_frac_add(target: Target) -> Result<AstNode, ApplyError> {
    let (k, n, d) = int_frac(target, BinOpKind::Add)?;
    Ok(AstNode::int_fraction(k * &d + n, d))
}

/// `a/b - k = (a - k·b)/b`
pub fn frac_int_sub(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d, k) = frac_int(target, BinOpKind::Sub)?;
    Ok(AstNode::int_fraction(n - k * &d, d))
}

/// `k - a/b = (k·b - a)/b`
pub fn int_frac_sub(target: Target) -> Result<AstNode, ApplyError> {
    let (k, n, d) = int_frac(target, BinOpKind::Sub)?;
    Ok(AstNode::int_fraction(k * &d - n, d))
}

/// `a/b \cdot k = (a·k)/b`
pub fn frac_int_mul(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d, k) = frac_int(target, BinOpKind::Mul)?;
    Ok(AstNode::int_fraction(n * k, d))
}

/// `k \cdot a/b = (k·a)/b`
pub fn int_frac_mul(target: Target) -> Result<AstNode, ApplyError> {
    let (k, n, d) = int_frac(target, BinOpKind::Mul)?;
    Ok(AstNode::int_fraction(k * n, d))
}

/// `a/b / k = a/(b·k)`
pub fn frac_int_div(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d, k) = frac_int(target, BinOpKind::Div)?;
    if is_zero(&k) {
        return Err(target.division_by_zero());
    }
    Ok(AstNode::int_fraction(n, d * k))
}

/// `k / a/b = (k·b)/a`
pub fn int_frac_div(target: Target) -> Result<AstNode, ApplyError> {
    let (k, n, d) = int_frac(target, BinOpKind::Div)?;
    if is_zero(&n) {
        return Err(target.division_by_zero());
    }
    Ok(AstNode::int_fraction(k * d, n))
}

/// `6/4 = 3/2`
///
/// Divides both parts by their greatest common divisor. The denominator of the result is always
/// positive.
pub fn simplify(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if is_zero(&d) {
        return Err(target.division_by_zero());
    }

    let gcd = Integer::from(n.gcd_ref(&d));
    if gcd <= 1 {
        return Err(target.not_applicable());
    }
    Ok(AstNode::int_fraction(n.div_exact(&gcd), d.div_exact(&gcd)))
}

/// `8/4 = 2`
pub fn divide_exact(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if is_zero(&d) {
        return Err(target.division_by_zero());
    }
    if !n.is_divisible(&d) {
        return Err(target.not_applicable());
    }
    Ok(AstNode::integer(n.div_exact(&d)))
}
