//! The primitive executors.
//!
//! Each executor in this module is a function that takes the [`Target`] of the rewrite, and
//! returns the node that replaces the target if the primitive applies, or an [`ApplyError`] if it
//! does not. The replacement is then spliced into the tree with [`AstNode::replace`], so an
//! executor never rebuilds more of the tree than its own target.

pub mod fraction;
pub mod integer;
pub mod normalize;
pub mod structural;

use crate::{error::ApplyError, trace::{Stage, TraceCollector, TraceEvent}};
use rug::Integer;
use tutor_parser::{AstNode, BinOpKind, Path};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies the executor of a rule. Several rules can share one executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveId {
    // integer arithmetic
    IntAdd,
    IntSub,
    IntMul,
    IntDivExact,
    IntDivToFrac,

    // fraction arithmetic
    FracAddSameDen,
    FracSubSameDen,
    FracCommonDenominator,
    FracMul,
    FracDiv,
    FracIntAdd,
    IntFracAdd,
    FracIntSub,
    IntFracSub,
    FracIntMul,
    IntFracMul,
    FracIntDiv,
    IntFracDiv,
    FracSimplify,
    FracDivideExact,

    // normalization
    FracToInt,
    FracZeroNumerator,
    FracNormalizeSign,
    FracToMixed,
    FracExpand,
    IntToFrac,
    DecimalToFrac,
    MixedToSum,
    MixedToImproper,
    OneToUnitFrac,

    // structural rewriting
    SubNegToAdd,
    AddNegToSub,
    SubDistribute,
    Regroup,
    NegNeg,
    NegDistribute,
    UnaryPlusDrop,
    BracketRemove,
    NestedFracDiv,

    // diagnostics
    DivisionByZero,
    Diagnostic,
}

/// Optional values supplied by the caller to parameterize a primitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bindings {
    /// The denominator of the unit fraction created by `ONE_TO_UNIT_FRAC`, instead of the
    /// sibling's denominator.
    pub denominator: Option<Integer>,

    /// The factor by which `FRAC_EXPAND` expands a fraction, instead of the factor that brings it
    /// to the least common denominator with its sibling.
    pub factor: Option<Integer>,
}

/// The node a primitive rewrites.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// The whole tree.
    pub root: &'a AstNode,

    /// The path of the target node.
    pub path: &'a Path,

    /// The target node.
    pub node: &'a AstNode,
}

impl Target<'_> {
    /// The error for a target whose shape does not fit the primitive.
    pub fn not_applicable(&self) -> ApplyError {
        ApplyError::NotApplicable { path: self.path.clone() }
    }

    /// The error for a rewrite that would divide by zero.
    pub fn division_by_zero(&self) -> ApplyError {
        ApplyError::DivisionByZero { path: self.path.clone() }
    }
}

/// If the target is a binary operation in the same family as `op`, returns its operands.
pub(crate) fn operands<'a>(target: Target<'a>, op: BinOpKind) -> Result<(&'a AstNode, &'a AstNode), ApplyError> {
    match target.node {
        AstNode::BinaryOp { op: actual, left, right } if actual.same_family(&op) => {
            Ok((left.as_ref(), right.as_ref()))
        },
        _ => Err(target.not_applicable()),
    }
}

/// Runs the executor on the node at `path`, returning the rewritten tree.
///
/// `rule_id` is only used in error messages.
pub fn execute(
    id: PrimitiveId,
    rule_id: &'static str,
    root: &AstNode,
    path: &Path,
    bindings: &Bindings,
) -> Result<AstNode, ApplyError> {
    execute_with_trace(id, rule_id, root, path, bindings, &mut ())
}

/// Runs the executor on the node at `path`, reporting the result to the collector.
pub fn execute_with_trace(
    id: PrimitiveId,
    rule_id: &'static str,
    root: &AstNode,
    path: &Path,
    bindings: &Bindings,
    trace: &mut dyn TraceCollector,
) -> Result<AstNode, ApplyError> {
    let result = root.navigate(path)
        .ok_or_else(|| ApplyError::NotApplicable { path: path.clone() })
        .and_then(|node| {
            let target = Target { root, path, node };
            let replacement = rewrite(id, rule_id, target, bindings)?;
            root.replace(path, replacement).ok_or_else(|| target.not_applicable())
        });

    match &result {
        Ok(tree) => trace.push(TraceEvent::new(
            Stage::Execute,
            rule_id,
            format!("rewrote `{}`, giving `{}`", path, tree),
        )),
        Err(err) => trace.push(TraceEvent::new(Stage::Execute, rule_id, err.to_string())),
    }

    result
}

/// Dispatches to the executor of the primitive.
fn rewrite(
    id: PrimitiveId,
    rule_id: &'static str,
    target: Target,
    bindings: &Bindings,
) -> Result<AstNode, ApplyError> {
    use PrimitiveId::*;
    match id {
        IntAdd => integer::add(target),
        IntSub => integer::sub(target),
        IntMul => integer::mul(target),
        IntDivExact => integer::div_exact(target),
        IntDivToFrac => integer::div_to_frac(target),

        FracAddSameDen => fraction::add_same_den(target),
        FracSubSameDen => fraction::sub_same_den(target),
        FracCommonDenominator => fraction::common_denominator(target),
        FracMul => fraction::mul(target),
        FracDiv => fraction::div(target),
        FracIntAdd => fraction::frac_int_add(target),
        IntFracAdd => fraction::int_frac_add(target),
        FracIntSub => fraction::frac_int_sub(target),
        IntFracSub => fraction::int_frac_sub(target),
        FracIntMul => fraction::frac_int_mul(target),
        IntFracMul => fraction::int_frac_mul(target),
        FracIntDiv => fraction::frac_int_div(target),
        IntFracDiv => fraction::int_frac_div(target),
        FracSimplify => fraction::simplify(target),
        FracDivideExact => fraction::divide_exact(target),

        FracToInt => normalize::frac_to_int(target),
        FracZeroNumerator => normalize::frac_zero_numerator(target),
        FracNormalizeSign => normalize::frac_normalize_sign(target),
        FracToMixed => normalize::frac_to_mixed(target),
        FracExpand => normalize::frac_expand(target, bindings.factor.as_ref()),
        IntToFrac => normalize::int_to_frac(target),
        DecimalToFrac => normalize::decimal_to_frac(target),
        MixedToSum => normalize::mixed_to_sum(target),
        MixedToImproper => normalize::mixed_to_improper(target),
        OneToUnitFrac => normalize::one_to_unit_frac(target, bindings.denominator.as_ref()),

        SubNegToAdd => structural::sub_neg_to_add(target),
        AddNegToSub => structural::add_neg_to_sub(target),
        SubDistribute => structural::sub_distribute(target),
        Regroup => structural::regroup(target),
        NegNeg => structural::neg_neg(target),
        NegDistribute => structural::neg_distribute(target),
        UnaryPlusDrop => structural::unary_plus_drop(target),
        BracketRemove => structural::bracket_remove(target),
        NestedFracDiv => structural::nested_frac_div(target),

        DivisionByZero => Err(structural::division_by_zero(target)),
        Diagnostic => Err(ApplyError::DiagnosticOnly { rule_id }),
    }
}

/// Runs an executor on the node at `path` of the parsed source, returning the printed replacement
/// or the error code.
#[cfg(test)]
pub(crate) fn run(
    f: fn(Target<'_>) -> Result<AstNode, ApplyError>,
    source: &str,
    path: &str,
) -> Result<String, &'static str> {
    let root = tutor_parser::parse(source).unwrap();
    let path: Path = path.parse().unwrap();
    let node = root.navigate(&path).unwrap();
    f(Target { root: &root, path: &path, node })
        .map(|node| node.to_string())
        .map_err(|err| err.code())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tutor_parser::parse;
    use super::*;

    #[test]
    fn replaces_only_the_target() {
        let ast = parse("(1 + 2) \\cdot 3").unwrap();
        let path = "term[0]".parse().unwrap();
        let tree = execute(PrimitiveId::IntAdd, "INT_ADD", &ast, &path, &Bindings::default()).unwrap();
        assert_eq!(tree.to_string(), "3 \\cdot 3");
        assert_eq!(ast.to_string(), "(1 + 2) \\cdot 3");
    }

    #[test]
    fn unresolved_path_is_not_applicable() {
        let ast = parse("1 + 2").unwrap();
        let path: Path = "term[0].num".parse().unwrap();
        let mut events = Vec::new();
        let err = execute_with_trace(PrimitiveId::IntAdd, "INT_ADD", &ast, &path, &Bindings::default(), &mut events)
            .unwrap_err();
        assert_eq!(err, ApplyError::NotApplicable { path });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stage, Stage::Execute);
    }

    #[test]
    fn diagnostics_never_rewrite() {
        let ast = parse("x + 1").unwrap();
        let err = execute(PrimitiveId::Diagnostic, "SYMBOLIC_OPERAND", &ast, &Path::root(), &Bindings::default())
            .unwrap_err();
        assert_eq!(err.code(), "diagnostic-only");
    }
}
