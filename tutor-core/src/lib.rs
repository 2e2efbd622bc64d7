//! The decision pipeline of the step tutor.
//!
//! Given an expression and a click on part of it, this crate decides which single atomic rewrite
//! (a *primitive*) applies at that location, and performs it with exact arithmetic.
//!
//! ```
//! use tutor_core::{apply_primitive, parse, resolve_step, Bindings, ClickKind, ClickTarget, OutcomeKind, Path};
//!
//! let ast = parse("1/7 + 3/7").unwrap();
//! let outcome = resolve_step(&ast, &ClickTarget::new(Path::root(), ClickKind::Operator));
//! assert_eq!(outcome.kind, OutcomeKind::GreenPrimitive);
//! assert_eq!(outcome.chosen_rule_id.as_deref(), Some("FRAC_ADD_SAME_DEN"));
//!
//! let rewritten = apply_primitive("FRAC_ADD_SAME_DEN", &ast, &Path::root(), &Bindings::default()).unwrap();
//! assert_eq!(rewritten.to_string(), "4/7");
//! ```
//!
//! The pipeline never prints anything. Every operation has a `_with_trace` variant that reports
//! each decision to a [`TraceCollector`]; use [`TracingCollector`] to forward them to [`tracing`].

pub mod context;
pub mod error;
pub mod matcher;
pub mod numeric;
pub mod options;
pub mod primitive;
pub mod registry;
pub mod step_master;
pub mod trace;

pub use context::{build_context, ClickTarget, NodeContext};
pub use error::ApplyError;
pub use matcher::{Outcome, OutcomeKind, RuleMatch};
pub use options::{DecisionOptions, DecisionOptionsBuilder, LocalityPolicy};
pub use primitive::Bindings;
pub use registry::{ClickKind, Color, Guard, PrimitiveRule, REGISTRY};
pub use step_master::{
    decide_step,
    decide_step_with_trace,
    Candidate,
    Decision,
    StepHistory,
    StepHistoryEntry,
    StepStatus,
};
pub use trace::{Stage, TraceCollector, TraceEvent, TracingCollector};
pub use tutor_parser::{parse, AstNode, Operator, Path};

use tracing::error;

/// Parses a path from its wire form, such as `term[0].den`. An empty string is the root.
pub fn parse_path(s: &str) -> Result<Path, ApplyError> {
    s.parse().map_err(|err: tutor_parser::Error| ApplyError::InvalidPath {
        path: s.to_string(),
        message: err.to_string(),
    })
}

/// Resolves a click into the outcome of matching it against the registry.
pub fn resolve_step(ast: &AstNode, click: &ClickTarget) -> Outcome {
    resolve_step_with_trace(ast, click, &mut ())
}

/// Resolves a click, reporting every decision to the collector.
pub fn resolve_step_with_trace(
    ast: &AstNode,
    click: &ClickTarget,
    trace: &mut dyn TraceCollector,
) -> Outcome {
    let ctx = context::build_context_with_trace(ast, click, trace);
    let matches = matcher::match_rules_with_trace(REGISTRY.rules(), &ctx, trace);
    matcher::select_with_trace(matches, trace)
}

/// Applies the rule with the given id to the node at `path`, returning the rewritten tree.
///
/// The original tree is left untouched.
pub fn apply_primitive(
    rule_id: &str,
    ast: &AstNode,
    path: &Path,
    bindings: &Bindings,
) -> Result<AstNode, ApplyError> {
    apply_primitive_with_trace(rule_id, ast, path, bindings, &mut ())
}

/// Applies a rule, reporting the result to the collector.
pub fn apply_primitive_with_trace(
    rule_id: &str,
    ast: &AstNode,
    path: &Path,
    bindings: &Bindings,
    trace: &mut dyn TraceCollector,
) -> Result<AstNode, ApplyError> {
    let rule = REGISTRY.lookup(rule_id)?;
    primitive::execute_with_trace(rule.primitive, rule.id, ast, path, bindings, trace)
}

/// The result of [`step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// The outcome of resolving the click.
    pub outcome: Outcome,

    /// The decision made among the applicable matches of the outcome.
    pub decision: Decision,

    /// The rewritten expression, if a rule was chosen.
    pub new_ast: Option<AstNode>,

    /// The printed form of `new_ast`.
    pub printed: Option<String>,
}

/// Resolves a click, decides among the applicable matches, and applies the chosen rule, recording
/// the step in the history.
///
/// Only green and yellow matches become candidates, and only when the outcome itself is
/// applicable; a blue or red outcome is reported without rewriting anything. The selection for the
/// locality filter is the node the click acts on, or the clicked node itself under
/// [`LocalityPolicy::Strict`].
pub fn step(
    ast: &AstNode,
    click: &ClickTarget,
    history: &mut StepHistory,
    options: &DecisionOptions,
) -> Result<StepReport, ApplyError> {
    step_with_trace(ast, click, history, options, &mut ())
}

/// Performs a [`step`], reporting every decision to the collector.
pub fn step_with_trace(
    ast: &AstNode,
    click: &ClickTarget,
    history: &mut StepHistory,
    options: &DecisionOptions,
    trace: &mut dyn TraceCollector,
) -> Result<StepReport, ApplyError> {
    let ctx = context::build_context_with_trace(ast, click, trace);
    let matches = matcher::match_rules_with_trace(REGISTRY.rules(), &ctx, trace);
    let outcome = matcher::select_with_trace(matches, trace);

    let candidates = if outcome.kind.is_applicable() {
        outcome.matches.iter()
            .filter(|m| matches!(m.color, Color::Green | Color::Yellow))
            .map(|m| Candidate::new(m.rule_id.clone(), m.target_path.clone()))
            .collect()
    } else {
        Vec::new()
    };

    let selection = match options.locality {
        LocalityPolicy::Bubbling => ctx.action_path(),
        LocalityPolicy::Strict => &ctx.node_id,
    };
    let decision = decide_step_with_trace(&candidates, history.last(), Some(selection), options, trace);
    let before = ast.to_string();
    let chosen = decision.chosen_candidate_id.as_ref()
        .and_then(|id| candidates.iter().find(|candidate| candidate.id == *id));
    let Some(candidate) = chosen else {
        history.record(StepHistoryEntry::no_candidates(before));
        return Ok(StepReport { outcome, decision, new_ast: None, printed: None });
    };

    let mut entry = StepHistoryEntry::chosen(candidate, before);
    let result = if ast.navigate(&candidate.target_path).is_none() {
        error!(
            rule_id = %candidate.rule_id,
            path = %candidate.target_path,
            "matched rule targets a path that does not exist",
        );
        Err(ApplyError::InternalInconsistency {
            rule_id: candidate.rule_id.clone(),
            path: candidate.target_path.clone(),
        })
    } else {
        apply_primitive_with_trace(&candidate.rule_id, ast, &candidate.target_path, &Bindings::default(), trace)
    };

    match result {
        Ok(new_ast) => {
            let printed = new_ast.to_string();
            entry.expression_after = Some(printed.clone());
            history.record(entry);
            Ok(StepReport {
                outcome,
                decision,
                new_ast: Some(new_ast),
                printed: Some(printed),
            })
        },
        Err(err) => {
            entry.error_code = Some(err.code().to_string());
            history.record(entry);
            Err(err)
        },
    }
}

/// Lists every operator of the expression in left-to-right visual order, as `(index, path,
/// operator)`. The index is the one accepted by [`ClickTarget::operator`].
pub fn operators(ast: &AstNode) -> Vec<(usize, Path, Operator)> {
    ast.operators()
        .into_iter()
        .map(|op| (op.index, op.path, op.operator))
        .collect()
}
