//! Conversions between integers, decimals, fractions, and mixed numbers that keep the value of the
//! expression unchanged.

use crate::{
    error::ApplyError,
    numeric::{exposed_denominator, is_negative, is_zero, sibling, signed_integer, signed_number},
};
use rug::Integer;
use super::{fraction::fraction_parts, Target};
use tutor_parser::{AstNode, BinOpKind};

/// `5/1 = 5`
pub fn frac_to_int(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if d != 1 {
        return Err(target.not_applicable());
    }
    Ok(AstNode::integer(n))
}

/// `0/5 = 0`
pub fn frac_zero_numerator(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if is_zero(&d) {
        return Err(target.division_by_zero());
    }
    if !is_zero(&n) {
        return Err(target.not_applicable());
    }
    Ok(AstNode::integer(0))
}

/// `\frac{3}{-4} = -3/4`
pub fn frac_normalize_sign(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if !is_negative(&d) {
        return Err(target.not_applicable());
    }
    Ok(AstNode::int_fraction(n, d))
}

/// `7/2 = 3\frac{1}{2}`
pub fn frac_to_mixed(target: Target) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if is_zero(&d) {
        return Err(target.division_by_zero());
    }

    let negative = is_negative(&n) != is_negative(&d);
    let d = d.abs();
    let (whole, rest) = n.abs().div_rem(d.clone());
    if is_zero(&whole) || is_zero(&rest) {
        return Err(target.not_applicable());
    }

    let whole = if negative { -whole } else { whole };
    Ok(AstNode::mixed_number(whole, rest, d))
}

/// `1/3 = 2/6`
///
/// The factor is the given one, or else the one that brings the denominator to the least common
/// multiple of its own and its sibling's.
pub fn frac_expand(target: Target, factor: Option<&Integer>) -> Result<AstNode, ApplyError> {
    let (n, d) = fraction_parts(target)?;
    if is_zero(&d) {
        return Err(target.division_by_zero());
    }

    let (n, d) = if is_negative(&d) { (-n, -d) } else { (n, d) };
    let factor = match factor {
        Some(factor) => factor.clone(),
        None => {
            let other = sibling(target.root, target.path)
                .and_then(exposed_denominator)
                .ok_or_else(|| target.not_applicable())?;
            Integer::from(d.lcm_ref(&other)) / &d
        },
    };

    if is_zero(&factor) {
        return Err(target.division_by_zero());
    }
    if is_negative(&factor) {
        return Err(target.not_applicable());
    }
    Ok(AstNode::int_fraction(n * &factor, d * factor))
}

/// `3 = 3/1`
pub fn int_to_frac(target: Target) -> Result<AstNode, ApplyError> {
    let k = signed_integer(target.node).ok_or_else(|| target.not_applicable())?;
    Ok(AstNode::int_fraction(k, 1))
}

/// `1.25 = 5/4`
///
/// The decimal is scaled to an integer, and the resulting fraction is reduced.
pub fn decimal_to_frac(target: Target) -> Result<AstNode, ApplyError> {
    let number = signed_number(target.node)
        .filter(|number| number.is_decimal())
        .ok_or_else(|| target.not_applicable())?;
    let (n, d) = number.to_rational().into_numer_denom();
    Ok(AstNode::int_fraction(n, d))
}

/// Returns the parts of a mixed number target.
fn mixed_parts<'a>(target: Target<'a>) -> Result<(&'a Integer, &'a Integer, &'a Integer), ApplyError> {
    match target.node {
        AstNode::MixedNumber { whole, numerator, denominator } => {
            if is_zero(denominator) {
                Err(target.division_by_zero())
            } else {
                Ok((whole, numerator, denominator))
            }
        },
        _ => Err(target.not_applicable()),
    }
}

/// `2\frac{1}{3} = 2 + 1/3`
pub fn mixed_to_sum(target: Target) -> Result<AstNode, ApplyError> {
    let (whole, numerator, denominator) = mixed_parts(target)?;
    Ok(AstNode::binary(
        BinOpKind::Add,
        AstNode::integer(whole.clone()),
        AstNode::int_fraction(numerator.clone(), denominator.clone()),
    ))
}

/// `2\frac{1}{3} = 7/3`
pub fn mixed_to_improper(target: Target) -> Result<AstNode, ApplyError> {
    let (whole, numerator, denominator) = mixed_parts(target)?;
    let numerator = Integer::from(whole * denominator) + numerator;
    Ok(AstNode::int_fraction(numerator, denominator.clone()))
}

/// `1 = 3/3`
///
/// The denominator is the given one, or else the one exposed by the sibling operand.
pub fn one_to_unit_frac(target: Target, denominator: Option<&Integer>) -> Result<AstNode, ApplyError> {
    if signed_integer(target.node).map_or(true, |k| k != 1) {
        return Err(target.not_applicable());
    }

    let d = match denominator {
        Some(d) => d.clone(),
        None => sibling(target.root, target.path)
            .and_then(exposed_denominator)
            .ok_or_else(|| target.not_applicable())?,
    };

    if is_zero(&d) {
        return Err(target.division_by_zero());
    }
    if is_negative(&d) {
        return Err(target.not_applicable());
    }
    Ok(AstNode::int_fraction(d.clone(), d))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::super::run;

    fn int(n: i64) -> Integer {
        Integer::from(n)
    }

    fn ok(s: &str) -> Result<String, &'static str> {
        Ok(s.to_string())
    }

    #[test]
    fn fraction_forms() {
        assert_eq!(run(frac_to_int, "5/1", "root"), ok("5"));
        assert_eq!(run(frac_to_int, "5/2", "root"), Err("not-applicable"));
        assert_eq!(run(frac_zero_numerator, "0/5", "root"), ok("0"));
        assert_eq!(run(frac_zero_numerator, "0/0", "root"), Err("division-by-zero"));
        assert_eq!(run(frac_normalize_sign, "\\frac{3}{-4}", "root"), ok("-3/4"));
        assert_eq!(run(frac_normalize_sign, "\\frac{-3}{-4}", "root"), ok("3/4"));
        assert_eq!(run(frac_normalize_sign, "3/4", "root"), Err("not-applicable"));
    }

    #[test]
    fn mixed_numbers() {
        assert_eq!(run(frac_to_mixed, "7/2", "root"), ok("3\\frac{1}{2}"));
        assert_eq!(run(frac_to_mixed, "\\frac{-7}{2}", "root"), ok("-3\\frac{1}{2}"));
        assert_eq!(run(frac_to_mixed, "1/2", "root"), Err("not-applicable"));
        assert_eq!(run(frac_to_mixed, "4/2", "root"), Err("not-applicable"));
        assert_eq!(run(mixed_to_sum, "2\\frac{1}{3}", "root"), ok("2 + 1/3"));
        assert_eq!(run(mixed_to_improper, "2\\frac{1}{3}", "root"), ok("7/3"));
        assert_eq!(run(mixed_to_improper, "-2\\frac{1}{3}", "argument"), ok("7/3"));
    }

    #[test]
    fn expand_to_sibling() {
        assert_eq!(run(|t| frac_expand(t, None), "1/4 + 1/6", "term[0]"), ok("3/12"));
        assert_eq!(run(|t| frac_expand(t, None), "-1/4 + 1/6", "term[0].argument"), ok("3/12"));
        assert_eq!(run(|t| frac_expand(t, None), "1/4", "root"), Err("not-applicable"));
        assert_eq!(run(|t| frac_expand(t, Some(&int(5))), "1/4", "root"), ok("5/20"));
        assert_eq!(run(|t| frac_expand(t, Some(&int(0))), "1/4", "root"), Err("division-by-zero"));
    }

    #[test]
    fn integers_and_decimals() {
        assert_eq!(run(int_to_frac, "3 + 1/2", "term[0]"), ok("3/1"));
        assert_eq!(run(decimal_to_frac, "1.25", "root"), ok("5/4"));
        assert_eq!(run(decimal_to_frac, "-0.5", "root"), ok("-1/2"));
        assert_eq!(run(decimal_to_frac, "2.0", "root"), ok("2/1"));
        assert_eq!(run(decimal_to_frac, "2", "root"), Err("not-applicable"));
    }

    #[test]
    fn unit_fraction() {
        assert_eq!(run(|t| one_to_unit_frac(t, None), "1 + 2/5", "term[0]"), ok("5/5"));
        assert_eq!(run(|t| one_to_unit_frac(t, Some(&int(3))), "1 + 2/5", "term[0]"), ok("3/3"));
        assert_eq!(run(|t| one_to_unit_frac(t, None), "1 + 2", "term[0]"), Err("not-applicable"));
        assert_eq!(run(|t| one_to_unit_frac(t, None), "2 + 2/5", "term[0]"), Err("not-applicable"));
        assert_eq!(run(|t| one_to_unit_frac(t, Some(&int(0))), "1", "root"), Err("division-by-zero"));
    }
}
