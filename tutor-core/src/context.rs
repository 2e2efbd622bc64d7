//! Resolves a click on an expression into a [`NodeContext`]: the operator it acts on, the types of
//! that operator's operands, and the guards that hold there.
//!
//! Building a context never fails. A click that does not resolve to a node produces a context with
//! no operator and no guards, which no rule matches.

use crate::{
    numeric::{
        exposed_denominator,
        is_fraction_like,
        is_signed_decimal,
        is_signed_variable,
        is_zero,
        negated,
        sibling,
        signed_fraction,
        signed_integer,
        signed_number,
    },
    registry::{ClickKind, Guard, OperandType},
    trace::{Stage, TraceCollector, TraceEvent},
};
use rug::Integer;
use std::{cmp::Ordering, collections::BTreeMap, fmt};
use tutor_parser::{ast::fmt::child_needs_parens, AstNode, BinOpKind, Operator, Path, PathStep, UnaryOpKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the user clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct ClickTarget {
    /// The path of the clicked node. Ignored if `operator_index` is given.
    pub node_id: Path,

    /// The kind of thing that was clicked.
    pub kind: ClickKind,

    /// The index of the clicked operator in left-to-right visual order, as an alternative to
    /// `node_id`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub operator_index: Option<usize>,
}

impl ClickTarget {
    /// Creates a click on the node at the given path.
    pub fn new(node_id: Path, kind: ClickKind) -> Self {
        Self { node_id, kind, operator_index: None }
    }

    /// Creates a click on the `index`th operator.
    pub fn operator(index: usize) -> Self {
        Self {
            node_id: Path::root(),
            kind: ClickKind::Operator,
            operator_index: Some(index),
        }
    }
}

/// The guards computed for a context.
///
/// A guard missing from the set is undecided, which matching treats the same as false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct GuardSet(BTreeMap<Guard, bool>);

impl GuardSet {
    /// Returns true if the guard is known to hold.
    pub fn is_true(&self, guard: Guard) -> bool {
        self.0.get(&guard).copied().unwrap_or(false)
    }

    /// Returns the value of the guard, or [`None`] if it is undecided.
    pub fn get(&self, guard: Guard) -> Option<bool> {
        self.0.get(&guard).copied()
    }

    /// Returns true if no guard was decided.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the decided guards.
    pub fn iter(&self) -> impl Iterator<Item = (Guard, bool)> + '_ {
        self.0.iter().map(|(guard, value)| (*guard, *value))
    }

    /// Sets a guard.
    fn set(&mut self, guard: Guard, value: bool) {
        self.0.insert(guard, value);
    }

    /// Sets a pair of opposite guards from a fact that may be undecided. An undecided fact leaves
    /// both guards false.
    fn set_pair(&mut self, if_true: Guard, if_false: Guard, fact: Option<bool>) {
        self.set(if_true, fact == Some(true));
        self.set(if_false, fact == Some(false));
    }
}

impl fmt::Display for GuardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = self.iter()
            .filter(|(_, value)| *value)
            .map(|(guard, _)| guard.as_str())
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", held.join(", "))
    }
}

/// The resolved view of a click.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct NodeContext {
    /// The path of the clicked node.
    pub node_id: Path,

    /// The kind of the click.
    pub target_kind: ClickKind,

    /// The operator of the action node, if it has one.
    pub operator: Option<Operator>,

    /// The type of the left operand of the action node, if it has one.
    pub left: Option<OperandType>,

    /// The type of the right operand, or of the argument of a unary action node.
    pub right: Option<OperandType>,

    pub guards: GuardSet,

    /// The path of the action node, when it is not the clicked node.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub action_node_id: Option<Path>,
}

impl NodeContext {
    /// Creates the context of a click that did not resolve to a node.
    fn unresolved(node_id: Path, target_kind: ClickKind) -> Self {
        Self {
            node_id,
            target_kind,
            operator: None,
            left: None,
            right: None,
            guards: GuardSet::default(),
            action_node_id: None,
        }
    }

    /// Returns the path of the node that rules with action scope rewrite.
    pub fn action_path(&self) -> &Path {
        self.action_node_id.as_ref().unwrap_or(&self.node_id)
    }
}

/// Classifies an operand.
pub fn classify(node: &AstNode) -> OperandType {
    if let Some(number) = signed_number(node) {
        return if number.is_zero() { OperandType::Int } else { OperandType::NonzeroInt };
    }

    if let Some((numerator, _)) = signed_fraction(node) {
        return if is_zero(&numerator) { OperandType::Fraction } else { OperandType::NonzeroFraction };
    }

    match negated(node).unwrap_or(node) {
        AstNode::MixedNumber { .. } => OperandType::MixedNumber,
        _ => OperandType::Any,
    }
}

/// Builds the context of a click.
pub fn build_context(ast: &AstNode, click: &ClickTarget) -> NodeContext {
    build_context_with_trace(ast, click, &mut ())
}

/// Builds the context of a click, reporting how it was resolved to the collector.
pub fn build_context_with_trace(
    ast: &AstNode,
    click: &ClickTarget,
    trace: &mut dyn TraceCollector,
) -> NodeContext {
    let node_id = match click.operator_index {
        Some(index) => match ast.nth_operator(index) {
            Some(path) => path,
            None => {
                trace.push(TraceEvent::new(
                    Stage::Context,
                    "unresolved",
                    format!("there is no operator with index {}", index),
                ));
                return NodeContext::unresolved(click.node_id.clone(), click.kind);
            },
        },
        None => click.node_id.clone(),
    };

    let Some(clicked) = ast.navigate(&node_id) else {
        trace.push(TraceEvent::new(
            Stage::Context,
            "unresolved",
            format!("`{}` does not address a node", node_id),
        ));
        return NodeContext::unresolved(node_id, click.kind);
    };

    // operator clicks act on the clicked operation itself when it is one; every other click acts
    // on the enclosing operation
    let parent_path = node_id.parent();
    let action_node_id = match click.kind {
        ClickKind::Operator if clicked.operator().is_some() => None,
        _ => parent_path,
    };
    let action = match &action_node_id {
        Some(path) => ast.navigate(path),
        None => Some(clicked),
    };

    let (operator, left, right) = match action {
        Some(AstNode::BinaryOp { op, left, right }) => (
            Some(Operator::Binary(*op)),
            Some(left.as_ref()),
            Some(right.as_ref()),
        ),
        Some(AstNode::UnaryOp { op, argument }) => (
            Some(Operator::Unary(*op)),
            None,
            Some(argument.as_ref()),
        ),
        _ => (None, None, None),
    };

    // a bracket belongs to the operator containing it, so operand facts about the right side only
    // hold when the clicked bracket is that right side
    let right_for_facts = match click.kind {
        ClickKind::Bracket => match node_id.last() {
            Some(PathStep::Right | PathStep::Argument) => right,
            _ => None,
        },
        _ => right,
    };

    let mut guards = GuardSet::default();
    let pair = match click.kind {
        ClickKind::Number | ClickKind::FractionBar => Some((clicked, sibling(ast, &node_id))),
        _ => match (left, right) {
            (Some(left), Some(right)) => Some((left, Some(right))),
            _ => None,
        },
    };
    operand_guards(&mut guards, operator, left, right, right_for_facts, pair);
    clicked_guards(&mut guards, ast, &node_id, clicked);

    let context = NodeContext {
        node_id,
        target_kind: click.kind,
        operator,
        left: left.map(classify),
        right: right.map(classify),
        guards,
        action_node_id,
    };

    trace.push(TraceEvent::new(
        Stage::Context,
        match context.operator {
            Some(op) => op.to_string(),
            None => "no operator".to_string(),
        },
        format!(
            "clicked `{}`, acting on `{}`, guards {}",
            context.node_id,
            context.action_path(),
            context.guards,
        ),
    ));

    context
}

/// Returns true if the operator is one of the division operators.
fn is_division(operator: Option<Operator>) -> bool {
    matches!(operator, Some(Operator::Binary(op)) if op.is_division())
}

/// Returns whether the node has value zero, if it is a number or integer fraction. A fraction
/// with a zero denominator has no value, so this is left undecided.
fn value_is_zero(node: &AstNode) -> Option<bool> {
    if let Some(number) = signed_number(node) {
        return Some(number.is_zero());
    }

    signed_fraction(node)
        .filter(|(_, denominator)| !is_zero(denominator))
        .map(|(numerator, _)| is_zero(&numerator))
}

/// Computes the guards describing the operands of the action node.
fn operand_guards(
    guards: &mut GuardSet,
    operator: Option<Operator>,
    left: Option<&AstNode>,
    right: Option<&AstNode>,
    right_for_facts: Option<&AstNode>,
    pair: Option<(&AstNode, Option<&AstNode>)>,
) {
    let operands = left.into_iter().chain(right).collect::<Vec<_>>();

    let denominators = pair.and_then(|(a, b)| {
        let a = exposed_denominator(a)?;
        let b = exposed_denominator(b?)?;
        Some(a == b)
    });
    guards.set_pair(Guard::DenominatorsEqual, Guard::DenominatorsDifferent, denominators);

    let divisor = right.filter(|_| is_division(operator));
    let divisor_zero = divisor.and_then(value_is_zero);
    guards.set_pair(Guard::DivisorZero, Guard::DivisorNonzero, divisor_zero);

    // the remainder is only decided for integer division by a nonzero integer
    let remainder_zero = match (left.and_then(signed_integer), divisor.and_then(signed_integer)) {
        (Some(dividend), Some(divisor)) if !is_zero(&divisor) => Some(dividend.is_divisible(&divisor)),
        _ => None,
    };
    guards.set_pair(Guard::RemainderZero, Guard::RemainderNonzero, remainder_zero);

    guards.set(Guard::OperandDecimal, operands.iter().any(|node| is_signed_decimal(node)));
    guards.set(Guard::OperandFraction, operands.iter().any(|node| is_fraction_like(node)));
    guards.set(Guard::OperandVariable, operands.iter().any(|node| is_signed_variable(node)));

    let is_binary = left.is_some();
    let right_negative = matches!(right_for_facts, Some(AstNode::UnaryOp { op: UnaryOpKind::Neg, .. }));
    let right_sum = matches!(
        right_for_facts,
        Some(AstNode::BinaryOp { op: BinOpKind::Add | BinOpKind::Sub, .. }),
    );
    let right_product = matches!(right_for_facts, Some(AstNode::BinaryOp { op: BinOpKind::Mul, .. }));

    guards.set(Guard::RightNegative, is_binary && right_negative);
    guards.set(Guard::RightSum, is_binary && right_sum);
    guards.set(Guard::RightProduct, is_binary && right_product);
    guards.set(Guard::ArgumentNegative, !is_binary && right_negative);
    guards.set(Guard::ArgumentSum, !is_binary && right_sum);
}

/// Computes the guards describing the clicked node itself.
fn clicked_guards(guards: &mut GuardSet, ast: &AstNode, path: &Path, clicked: &AstNode) {
    guards.set(Guard::IsDecimal, matches!(clicked, AstNode::Number(number) if number.is_decimal()));

    let integer = signed_integer(clicked);
    guards.set(Guard::IsInteger, integer.is_some());
    guards.set(Guard::IsOne, integer.map_or(false, |n| n == 1));
    guards.set(Guard::IsMixedNumber, matches!(clicked, AstNode::MixedNumber { .. }));
    guards.set(
        Guard::SiblingHasDenominator,
        sibling(ast, path).and_then(exposed_denominator).is_some(),
    );

    guards.set(
        Guard::BracketRedundant,
        match (path.parent().and_then(|parent| ast.navigate(&parent)), path.last()) {
            (Some(parent), Some(step)) => !child_needs_parens(parent, step),
            _ => true,
        },
    );

    if let AstNode::Fraction { numerator, denominator } = clicked {
        fraction_guards(guards, numerator, denominator);
    }
}

/// Computes the guards describing a clicked fraction.
fn fraction_guards(guards: &mut GuardSet, numerator: &AstNode, denominator: &AstNode) {
    let reciprocal_exists = signed_integer(denominator).is_some()
        || signed_fraction(denominator).is_some();
    let has_fraction_part = matches!(negated(numerator).unwrap_or(numerator), AstNode::Fraction { .. })
        || matches!(negated(denominator).unwrap_or(denominator), AstNode::Fraction { .. });
    guards.set(Guard::NestedFraction, reciprocal_exists && has_fraction_part);

    let (Some(n), Some(d)) = (signed_integer(numerator), signed_integer(denominator)) else {
        return;
    };

    let den_zero = is_zero(&d);
    guards.set(Guard::DenominatorZero, den_zero);
    guards.set(Guard::NumeratorZero, is_zero(&n));
    guards.set(Guard::DenominatorOne, d == 1);
    guards.set(Guard::DenominatorNegative, d < 0);
    if den_zero {
        return;
    }

    let unit = d == 1 || d == -1;
    let whole = n.is_divisible(&d) && !unit;
    let gcd = Integer::from(n.gcd_ref(&d));
    guards.set(Guard::FractionWhole, whole);
    guards.set(Guard::FractionReducible, gcd > 1);
    guards.set(Guard::FractionImproper, n.cmp_abs(&d) == Ordering::Greater && !whole && !unit);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tutor_parser::parse;
    use super::*;

    fn context(source: &str, path: &str, kind: ClickKind) -> NodeContext {
        let ast = parse(source).unwrap();
        build_context(&ast, &ClickTarget::new(path.parse().unwrap(), kind))
    }

    fn held(context: &NodeContext) -> Vec<Guard> {
        context.guards.iter().filter(|(_, v)| *v).map(|(g, _)| g).collect()
    }

    #[test]
    fn operator_click_on_operation() {
        let ctx = context("1/7 + 3/7", "root", ClickKind::Operator);
        assert_eq!(ctx.operator, Some(Operator::Binary(BinOpKind::Add)));
        assert_eq!(ctx.left, Some(OperandType::NonzeroFraction));
        assert_eq!(ctx.right, Some(OperandType::NonzeroFraction));
        assert_eq!(ctx.action_node_id, None);
        assert_eq!(held(&ctx), vec![Guard::DenominatorsEqual, Guard::OperandFraction, Guard::BracketRedundant]);
    }

    #[test]
    fn operator_click_on_leaf_bubbles() {
        let ctx = context("10 / 0", "term[1]", ClickKind::Operator);
        assert_eq!(ctx.operator, Some(Operator::Binary(BinOpKind::Div)));
        assert_eq!(ctx.action_node_id, Some(Path::root()));
        assert_eq!(ctx.right, Some(OperandType::Int));
        assert!(ctx.guards.is_true(Guard::DivisorZero));
        assert!(!ctx.guards.is_true(Guard::DivisorNonzero));
        assert_eq!(ctx.guards.get(Guard::RemainderZero), Some(false));
        assert_eq!(ctx.guards.get(Guard::RemainderNonzero), Some(false));
    }

    #[test]
    fn divisor_without_value() {
        let ctx = context("1/2 \\div 3/0", "root", ClickKind::Operator);
        assert_eq!(ctx.guards.get(Guard::DivisorZero), Some(false));
        assert_eq!(ctx.guards.get(Guard::DivisorNonzero), Some(false));

        let ctx = context("1/2 \\div 0/3", "root", ClickKind::Operator);
        assert!(ctx.guards.is_true(Guard::DivisorZero));
    }

    #[test]
    fn division_remainder() {
        let ctx = context("7 / 2", "root", ClickKind::Operator);
        assert!(ctx.guards.is_true(Guard::DivisorNonzero));
        assert!(ctx.guards.is_true(Guard::RemainderNonzero));

        let ctx = context("1.5 / 3", "root", ClickKind::Operator);
        assert!(ctx.guards.is_true(Guard::OperandDecimal));
        assert!(ctx.guards.is_true(Guard::DivisorNonzero));
        assert!(!ctx.guards.is_true(Guard::RemainderZero));
        assert!(!ctx.guards.is_true(Guard::RemainderNonzero));
    }

    #[test]
    fn number_click_uses_parent() {
        let ctx = context("1 + 1/3", "term[0]", ClickKind::Number);
        assert_eq!(ctx.operator, Some(Operator::Binary(BinOpKind::Add)));
        assert_eq!(ctx.action_node_id, Some(Path::root()));
        assert!(ctx.guards.is_true(Guard::IsOne));
        assert!(ctx.guards.is_true(Guard::IsInteger));
        assert!(ctx.guards.is_true(Guard::SiblingHasDenominator));

        let ctx = context("2.5 + 1", "term[0]", ClickKind::Number);
        assert!(ctx.guards.is_true(Guard::IsDecimal));
        assert!(!ctx.guards.is_true(Guard::IsInteger));
    }

    #[test]
    fn fraction_bar_facts() {
        let ctx = context("6/4", "root", ClickKind::FractionBar);
        assert_eq!(ctx.operator, None);
        assert!(ctx.guards.is_true(Guard::FractionReducible));
        assert!(ctx.guards.is_true(Guard::FractionImproper));
        assert!(!ctx.guards.is_true(Guard::FractionWhole));

        let ctx = context("8/4", "root", ClickKind::FractionBar);
        assert!(ctx.guards.is_true(Guard::FractionWhole));
        assert!(!ctx.guards.is_true(Guard::FractionImproper));

        let ctx = context("5/0", "root", ClickKind::FractionBar);
        assert!(ctx.guards.is_true(Guard::DenominatorZero));
        assert!(!ctx.guards.is_true(Guard::FractionReducible));

        let ctx = context("\\frac{3}{-4}", "root", ClickKind::FractionBar);
        assert!(ctx.guards.is_true(Guard::DenominatorNegative));

        let ctx = context("\\frac{1/2}{3}", "root", ClickKind::FractionBar);
        assert!(ctx.guards.is_true(Guard::NestedFraction));

        let ctx = context("1/2 + 1/3", "term[0]", ClickKind::FractionBar);
        assert!(ctx.guards.is_true(Guard::DenominatorsDifferent));
    }

    #[test]
    fn bracket_facts() {
        let ctx = context("5 - (2 + 1)", "term[1]", ClickKind::Bracket);
        assert_eq!(ctx.operator, Some(Operator::Binary(BinOpKind::Sub)));
        assert!(ctx.guards.is_true(Guard::RightSum));
        assert!(!ctx.guards.is_true(Guard::BracketRedundant));

        // the left bracket does not see facts about the right operand
        let ctx = context("(1 + 2) + (3 + 4)", "term[0]", ClickKind::Bracket);
        assert!(!ctx.guards.is_true(Guard::RightSum));
        assert!(ctx.guards.is_true(Guard::BracketRedundant));

        let ctx = context("-(2 + 1)", "argument", ClickKind::Bracket);
        assert!(ctx.guards.is_true(Guard::ArgumentSum));
        assert!(!ctx.guards.is_true(Guard::RightSum));
    }

    #[test]
    fn operator_index() {
        let ast = parse("1 + 2 \\cdot 3").unwrap();
        let ctx = build_context(&ast, &ClickTarget::operator(1));
        assert_eq!(ctx.node_id, "term[1]".parse().unwrap());
        assert_eq!(ctx.operator, Some(Operator::Binary(BinOpKind::Mul)));
    }

    #[test]
    fn unresolved_clicks() {
        let ast = parse("1 + 2").unwrap();
        let mut events = Vec::new();
        let ctx = build_context_with_trace(&ast, &ClickTarget::operator(5), &mut events);
        assert_eq!(ctx.operator, None);
        assert!(ctx.guards.is_empty());
        assert_eq!(events[0].decision, "unresolved");

        let ctx = context("1 + 2", "term[0].argument", ClickKind::Number);
        assert_eq!(ctx.operator, None);
        assert!(ctx.guards.is_empty());
    }

    #[test]
    fn classification() {
        assert_eq!(classify(&parse("0").unwrap()), OperandType::Int);
        assert_eq!(classify(&parse("-3").unwrap()), OperandType::NonzeroInt);
        assert_eq!(classify(&parse("-0/3").unwrap()), OperandType::Fraction);
        assert_eq!(classify(&parse("-2\\frac{1}{3}").unwrap()), OperandType::MixedNumber);
        assert_eq!(classify(&parse("x").unwrap()), OperandType::Any);
        assert_eq!(classify(&parse("1 + 2").unwrap()), OperandType::Any);
    }
}
