use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rug::Integer;
use tutor_core::{
    apply_primitive,
    decide_step,
    numeric::signed_fraction,
    parse,
    parse_path,
    resolve_step,
    step,
    AstNode,
    Bindings,
    Candidate,
    ClickKind,
    ClickTarget,
    DecisionOptions,
    DecisionOptionsBuilder,
    LocalityPolicy,
    Path,
    StepHistory,
    StepHistoryEntry,
    StepStatus,
};

/// Applies a rule at the given path of the parsed source, returning the printed result or the
/// error code.
fn apply(rule_id: &str, source: &str, path: &str) -> Result<String, &'static str> {
    let ast = parse(source).unwrap();
    let path = parse_path(path).unwrap();
    apply_primitive(rule_id, &ast, &path, &Bindings::default())
        .map(|ast| ast.to_string())
        .map_err(|err| err.code())
}

#[test]
fn same_denominator_addition() {
    assert_eq!(apply("FRAC_ADD_SAME_DEN", "1/7 + 3/7", "root"), Ok("4/7".to_string()));
}

#[test]
fn exact_division_by_zero() {
    assert_eq!(apply("INT_DIV_EXACT", "10 / 0", "root"), Err("division-by-zero"));
}

#[test]
fn division_to_fraction() {
    assert_eq!(apply("INT_DIV_TO_FRAC", "7 / 2", "root"), Ok("7/2".to_string()));
    assert_eq!(apply("INT_DIV_TO_FRAC", "8 / 4", "root"), Ok("8/4".to_string()));
}

#[test]
fn fraction_divisor_without_value() {
    let outcome = resolve_step(&parse("1/2 \\div 3/0").unwrap(), &ClickTarget::operator(0));
    assert!(outcome.matches.iter().all(|m| m.rule_id != "FRAC_DIV"));
    assert_eq!(apply("FRAC_DIV", "1/2 \\div 3/0", "root"), Err("not-applicable"));
}

#[test]
fn locality_keeps_container_and_selection() {
    let candidates = [
        Candidate::new("ruleA", Path::root()),
        Candidate::new("ruleB", parse_path("term[0]").unwrap()),
        Candidate::new("ruleC", parse_path("term[1]").unwrap()),
    ];
    let selection = parse_path("term[0]").unwrap();

    let decision = decide_step(&candidates, None, Some(&selection), &DecisionOptions::default());
    assert_eq!(decision.status, StepStatus::Chosen);
    assert_eq!(decision.chosen_candidate_id.as_deref(), Some("ruleA@root"));

    // without the root candidate, the selection itself is chosen, and never its sibling
    let decision = decide_step(&candidates[1..], None, Some(&selection), &DecisionOptions::default());
    assert_eq!(decision.chosen_candidate_id.as_deref(), Some("ruleB@term[0]"));
    let decision = decide_step(&candidates[2..], None, Some(&selection), &DecisionOptions::default());
    assert_eq!(decision.status, StepStatus::NoCandidates);
}

#[test]
fn repeated_step_is_filtered() {
    let previous = Candidate::new("ruleX", Path::root());
    let mut history = StepHistory::new();
    history.record(StepHistoryEntry::chosen(&previous, "1 + 2"));

    let decision = decide_step(&[previous], history.last(), None, &DecisionOptions::default());
    assert_eq!(decision.status, StepStatus::NoCandidates);
    assert_eq!(decision.chosen_candidate_id, None);
}

#[test]
fn stepping_to_an_integer() {
    let options = DecisionOptions::default();
    let mut history = StepHistory::new();
    let mut ast = parse("1/4 + 1/4 + 1/2").unwrap();

    // 1/4 + 1/4
    let report = step(&ast, &ClickTarget::operator(0), &mut history, &options).unwrap();
    assert_eq!(report.printed.as_deref(), Some("2/4 + 1/2"));
    ast = report.new_ast.unwrap();

    // 2/4 = 1/2
    let click = ClickTarget::new(parse_path("term[0]").unwrap(), ClickKind::FractionBar);
    let report = step(&ast, &click, &mut history, &options).unwrap();
    assert_eq!(report.printed.as_deref(), Some("1/2 + 1/2"));
    ast = report.new_ast.unwrap();

    let report = step(&ast, &ClickTarget::operator(0), &mut history, &options).unwrap();
    assert_eq!(report.printed.as_deref(), Some("2/2"));
    ast = report.new_ast.unwrap();

    let click = ClickTarget::new(Path::root(), ClickKind::FractionBar);
    let report = step(&ast, &click, &mut history, &options).unwrap();
    assert_eq!(report.printed.as_deref(), Some("1"));

    assert_eq!(history.len(), 4);
    assert!(history.entries().iter().all(|entry| entry.status == StepStatus::Chosen));
    assert_eq!(history.undo().and_then(|entry| entry.invariant_rule_id).as_deref(), Some("FRAC_DIVIDE_EXACT"));
}

#[test]
fn strict_locality_rejects_bubbled_actions() {
    // clicking an operand acts on its parent, which strict locality does not allow
    let ast = parse("2 \\cdot 1/3").unwrap();
    let click = ClickTarget::new(parse_path("term[0]").unwrap(), ClickKind::Operator);
    let strict = DecisionOptionsBuilder::new().locality(LocalityPolicy::Strict).build();

    let mut history = StepHistory::new();
    let report = step(&ast, &click, &mut history, &strict).unwrap();
    assert_eq!(report.decision.status, StepStatus::NoCandidates);

    let mut history = StepHistory::new();
    let report = step(&ast, &ClickTarget::operator(0), &mut history, &strict).unwrap();
    assert_eq!(report.printed.as_deref(), Some("2/3"));
}

#[test]
fn nested_operand_click_acts_on_container() {
    let ast = parse("1 + 2 \\cdot 3").unwrap();
    let click = ClickTarget::new(parse_path("term[1].term[0]").unwrap(), ClickKind::Operator);

    let mut history = StepHistory::new();
    let report = step(&ast, &click, &mut history, &DecisionOptions::default()).unwrap();
    assert_eq!(report.decision.chosen_candidate_id.as_deref(), Some("INT_MUL@term[1]"));
    assert_eq!(report.new_ast, Some(parse("1 + 6").unwrap()));
}

#[test]
fn nested_bracket_click_acts_on_container() {
    let ast = parse("1 + (5 - (2 + 1))").unwrap();
    let click = ClickTarget::new(parse_path("term[1].term[1]").unwrap(), ClickKind::Bracket);

    let mut history = StepHistory::new();
    let report = step(&ast, &click, &mut history, &DecisionOptions::default()).unwrap();
    assert_eq!(report.decision.chosen_candidate_id.as_deref(), Some("BRACKET_SUB_DISTRIBUTE@term[1]"));
    assert_eq!(report.new_ast, Some(parse("1 + (5 - 2 - 1)").unwrap()));
}

#[test]
fn bindings() {
    let ast = parse("1 + 2/5").unwrap();
    let path = parse_path("term[0]").unwrap();
    let bindings = Bindings { denominator: Some(Integer::from(10)), factor: None };
    let rewritten = apply_primitive("ONE_TO_UNIT_FRAC", &ast, &path, &bindings).unwrap();
    assert_eq!(rewritten.to_string(), "10/10 + 2/5");

    let ast = parse("1/4 + 1/6").unwrap();
    let rewritten = apply_primitive("FRAC_EXPAND", &ast, &path, &Bindings::default()).unwrap();
    assert_eq!(rewritten.to_string(), "3/12 + 1/6");
}

fn signed(n: i64) -> AstNode {
    if n < 0 {
        AstNode::neg(AstNode::integer(-n))
    } else {
        AstNode::integer(n)
    }
}

proptest! {
    #[test]
    fn simplified_fractions_are_reduced(n in -500i64..500, d in -500i64..500) {
        let ast = AstNode::fraction(signed(n), signed(d));
        match apply_primitive("FRAC_SIMPLIFY", &ast, &Path::root(), &Bindings::default()) {
            Ok(reduced) => {
                let (num, den) = signed_fraction(&reduced).unwrap();
                prop_assert!(den > 0);
                prop_assert_eq!(Integer::from(num.gcd_ref(&den)), 1);
                prop_assert_eq!(Integer::from(&num * d), Integer::from(&den * n));
            },
            Err(err) => {
                let code = err.code();
                if d == 0 {
                    prop_assert_eq!(code, "division-by-zero");
                } else {
                    prop_assert_eq!(code, "not-applicable");
                    prop_assert_eq!(Integer::from(n).gcd(&Integer::from(d)), 1);
                }
            },
        }
    }

    #[test]
    fn integer_division_never_divides_by_zero(n in -1000i64..1000) {
        let ast = AstNode::binary(tutor_parser::BinOpKind::Div, signed(n), AstNode::integer(0));
        for rule in ["INT_DIV_EXACT", "INT_DIV_TO_FRAC", "INT_DIV_BY_ZERO"] {
            let err = apply_primitive(rule, &ast, &Path::root(), &Bindings::default()).unwrap_err();
            prop_assert_eq!(err.code(), "division-by-zero");
        }
    }

    #[test]
    fn locality_is_sound(depth in 1usize..4, sibling_first in any::<bool>()) {
        // a selection that is neither root nor related to the other candidate
        let mut steps = vec![tutor_parser::PathStep::Left; depth];
        let selection = Path::from(steps.clone());
        steps[0] = tutor_parser::PathStep::Right;
        let unrelated = Path::from(steps);

        let mut candidates = vec![
            Candidate::new("global", Path::root()),
            Candidate::new("here", selection.clone()),
            Candidate::new("elsewhere", unrelated),
        ];
        if sibling_first {
            candidates.rotate_left(2);
        }

        let kept = candidates.iter()
            .filter(|c| tutor_core::step_master::is_local(LocalityPolicy::Bubbling, &c.target_path, &selection))
            .map(|c| c.rule_id.as_str())
            .collect::<Vec<_>>();
        prop_assert!(kept.contains(&"global"));
        prop_assert!(kept.contains(&"here"));
        prop_assert!(!kept.contains(&"elsewhere"));

        let decision = decide_step(&candidates, None, Some(&selection), &DecisionOptions::default());
        let chosen = decision.chosen_candidate_id.unwrap();
        prop_assert!(!chosen.starts_with("elsewhere"));
    }
}
