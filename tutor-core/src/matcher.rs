//! Matching registry rows against a [`NodeContext`], and selecting a single outcome among the
//! matches.

use crate::{
    context::NodeContext,
    registry::{Color, OperandType, PrimitiveRule, Scope},
    trace::{Stage, TraceCollector, TraceEvent},
};
use std::fmt;
use tutor_parser::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A registry row that matched a context.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct RuleMatch {
    /// The id of the matched rule.
    pub rule_id: String,

    pub color: Color,

    /// The path of the node the rule rewrites.
    pub target_path: Path,
}

/// The kind of outcome selected from a set of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum OutcomeKind {
    /// Nothing matched.
    NoCandidates,

    /// A rule must be offered as a choice to the user.
    BlueChoice,

    /// A diagnostic explains why nothing can be applied.
    RedDiagnostic,

    /// The chosen rule starts a longer scenario.
    YellowScenario,

    /// The chosen rule can be applied right away.
    GreenPrimitive,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCandidates => "no-candidates",
            Self::BlueChoice => "blue-choice",
            Self::RedDiagnostic => "red-diagnostic",
            Self::YellowScenario => "yellow-scenario",
            Self::GreenPrimitive => "green-primitive",
        }
    }

    /// Returns true if the chosen rule of this outcome may be applied without asking the user.
    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::YellowScenario | Self::GreenPrimitive)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of resolving a click.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct Outcome {
    pub kind: OutcomeKind,

    /// The rule chosen by the selection, unless there were no matches.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub chosen_rule_id: Option<String>,

    /// Every match, in table order.
    pub matches: Vec<RuleMatch>,
}

impl Outcome {
    /// Returns the match of the chosen rule.
    pub fn chosen(&self) -> Option<&RuleMatch> {
        let id = self.chosen_rule_id.as_deref()?;
        self.matches.iter().find(|m| m.rule_id == id)
    }
}

/// Returns why the operand type of a context does not fit a rule, if it doesn't.
fn operand_mismatch(
    side: &str,
    wanted: Option<OperandType>,
    actual: Option<OperandType>,
) -> Option<String> {
    match (wanted, actual) {
        (None, _) => None,
        (Some(wanted), Some(actual)) if wanted.accepts(actual) => None,
        (Some(wanted), Some(actual)) => Some(format!("{} operand is {}, not {}", side, actual, wanted)),
        (Some(wanted), None) => Some(format!("no {} operand, wanted {}", side, wanted)),
    }
}

/// Returns why a rule does not match the context, or [`None`] if it does.
fn rejection(rule: &PrimitiveRule, ctx: &NodeContext) -> Option<String> {
    if rule.click != ctx.target_kind {
        return Some(format!("responds to {} clicks", rule.click));
    }

    if let Some(wanted) = rule.operator {
        match ctx.operator {
            Some(actual) if actual.same_family(&wanted) => (),
            Some(actual) => return Some(format!("operator is `{}`, not `{}`", actual, wanted)),
            None => return Some(format!("no operator, wanted `{}`", wanted)),
        }
    }

    if let Some(guard) = rule.required.iter().find(|g| !ctx.guards.is_true(**g)) {
        return Some(format!("requires {}", guard));
    }

    if let Some(guard) = rule.forbidden.iter().find(|g| ctx.guards.is_true(**g)) {
        return Some(format!("forbids {}", guard));
    }

    operand_mismatch("left", rule.left, ctx.left)
        .or_else(|| operand_mismatch("right", rule.right, ctx.right))
}

/// Returns every rule of the table that matches the context, in table order.
pub fn match_rules(table: &[PrimitiveRule], ctx: &NodeContext) -> Vec<RuleMatch> {
    match_rules_with_trace(table, ctx, &mut ())
}

/// Returns every matching rule, reporting each comparison to the collector.
pub fn match_rules_with_trace(
    table: &[PrimitiveRule],
    ctx: &NodeContext,
    trace: &mut dyn TraceCollector,
) -> Vec<RuleMatch> {
    table.iter()
        .filter(|rule| match rejection(rule, ctx) {
            Some(reason) => {
                trace.push(TraceEvent::new(Stage::Match, rule.id, format!("rejected: {}", reason)));
                false
            },
            None => {
                trace.push(TraceEvent::new(Stage::Match, rule.id, "matched"));
                true
            },
        })
        .map(|rule| RuleMatch {
            rule_id: rule.id.to_string(),
            color: rule.color,
            target_path: match rule.scope {
                Scope::Action => ctx.action_path().clone(),
                Scope::Clicked => ctx.node_id.clone(),
            },
        })
        .collect()
}

/// Selects the outcome of a set of matches.
///
/// The first blue match wins over everything else, then the first red match. Otherwise, the first
/// match is chosen.
pub fn select(matches: Vec<RuleMatch>) -> Outcome {
    select_with_trace(matches, &mut ())
}

/// Selects the outcome of a set of matches, reporting the selection to the collector.
pub fn select_with_trace(matches: Vec<RuleMatch>, trace: &mut dyn TraceCollector) -> Outcome {
    let first_of = |color: Color| matches.iter().find(|m| m.color == color);

    let (kind, chosen) = if let Some(first) = matches.first() {
        if let Some(blue) = first_of(Color::Blue) {
            (OutcomeKind::BlueChoice, Some(blue))
        } else if let Some(red) = first_of(Color::Red) {
            (OutcomeKind::RedDiagnostic, Some(red))
        } else if first.color == Color::Yellow {
            (OutcomeKind::YellowScenario, Some(first))
        } else {
            (OutcomeKind::GreenPrimitive, Some(first))
        }
    } else {
        (OutcomeKind::NoCandidates, None)
    };

    let chosen_rule_id = chosen.map(|m| m.rule_id.clone());
    trace.push(TraceEvent::new(
        Stage::Select,
        kind.as_str(),
        match &chosen_rule_id {
            Some(id) => format!("chose `{}` among {} matches", id, matches.len()),
            None => "nothing matched".to_string(),
        },
    ));

    Outcome { kind, chosen_rule_id, matches }
}
