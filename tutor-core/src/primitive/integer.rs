//! Arithmetic on two number literals.

use crate::{error::ApplyError, numeric::{signed_integer, signed_number}};
use super::{operands, Target};
use tutor_parser::{AstNode, BinOpKind, Number};

/// Returns the signed values of two number operands.
fn numbers(target: Target, left: &AstNode, right: &AstNode) -> Result<(Number, Number), ApplyError> {
    match (signed_number(left), signed_number(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(target.not_applicable()),
    }
}

/// `3 + 4 = 7`
pub fn add(target: Target) -> Result<AstNode, ApplyError> {
    let (left, right) = operands(target, BinOpKind::Add)?;
    let (a, b) = numbers(target, left, right)?;
    Ok(AstNode::number(a.add(&b)))
}

/// `3 - 4 = -1`
pub fn sub(target: Target) -> Result<AstNode, ApplyError> {
    let (left, right) = operands(target, BinOpKind::Sub)?;
    let (a, b) = numbers(target, left, right)?;
    Ok(AstNode::number(a.sub(&b)))
}

/// `3 \cdot 4 = 12`
pub fn mul(target: Target) -> Result<AstNode, ApplyError> {
    let (left, right) = operands(target, BinOpKind::Mul)?;
    let (a, b) = numbers(target, left, right)?;
    Ok(AstNode::number(a.mul(&b)))
}

/// Checks the divisor of a division before anything else, so that a zero divisor is always
/// reported as such. Returns the integer operands.
fn division_operands(target: Target) -> Result<(rug::Integer, rug::Integer), ApplyError> {
    let (left, right) = operands(target, BinOpKind::Div)?;
    let divisor = signed_number(right).ok_or_else(|| target.not_applicable())?;
    if divisor.is_zero() {
        return Err(target.division_by_zero());
    }

    match (signed_integer(left), signed_integer(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(target.not_applicable()),
    }
}

/// `12 / 4 = 3`
///
/// Not applicable if the division leaves a remainder.
pub fn div_exact(target: Target) -> Result<AstNode, ApplyError> {
    let (a, b) = division_operands(target)?;
    if !a.is_divisible(&b) {
        return Err(target.not_applicable());
    }
    Ok(AstNode::integer(a.div_exact(&b)))
}

/// `7 / 2 = 7/2`
///
/// The fraction is not reduced.
pub fn div_to_frac(target: Target) -> Result<AstNode, ApplyError> {
    let (a, b) = division_operands(target)?;
    Ok(AstNode::int_fraction(a, b))
}
