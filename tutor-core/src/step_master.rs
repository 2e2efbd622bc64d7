//! The step decision layer: narrows a list of proposed rewrites down to a single one, using the
//! previous step and the selected node.
//!
//! Candidates are kept in the order they are given, and the first one to survive both filters is
//! chosen. Candidates after the chosen one are not examined.

use crate::{
    options::{DecisionOptions, LocalityPolicy},
    trace::{Stage, TraceCollector, TraceEvent},
};
use std::{fmt, time::{SystemTime, UNIX_EPOCH}};
use tutor_parser::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A proposed rewrite: a rule, and the path of the node it would rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct Candidate {
    /// Identifies the candidate in the resulting [`Decision`].
    pub id: String,

    pub rule_id: String,

    pub target_path: Path,
}

impl Candidate {
    /// Creates a candidate whose id is derived from the rule and path, as in `FRAC_SIMPLIFY@term[0]`.
    pub fn new(rule_id: impl Into<String>, target_path: Path) -> Self {
        let rule_id = rule_id.into();
        Self {
            id: format!("{}@{}", rule_id, target_path),
            rule_id,
            target_path,
        }
    }
}

/// The terminal state of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum StepStatus {
    /// A candidate was chosen.
    Chosen,

    /// No candidate survived the filters.
    NoCandidates,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chosen => "chosen",
            Self::NoCandidates => "no-candidates",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of [`decide_step`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct Decision {
    pub status: StepStatus,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub chosen_candidate_id: Option<String>,
}

impl Decision {
    fn no_candidates() -> Self {
        Self { status: StepStatus::NoCandidates, chosen_candidate_id: None }
    }
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// One recorded step of a tutoring session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct StepHistoryEntry {
    /// Assigned by [`StepHistory::record`].
    pub step_id: String,

    pub candidate_id: Option<String>,

    pub status: StepStatus,

    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,

    /// The rule that was applied in this step.
    pub invariant_rule_id: Option<String>,

    /// The path of the node rewritten in this step.
    pub target_path: Option<Path>,

    pub expression_before: String,

    pub expression_after: Option<String>,

    /// The code of the error that stopped the step, if any.
    pub error_code: Option<String>,
}

impl StepHistoryEntry {
    /// An entry for a step that chose the given candidate. The resulting expression and error code
    /// can be filled in afterwards.
    pub fn chosen(candidate: &Candidate, expression_before: impl Into<String>) -> Self {
        Self {
            step_id: String::new(),
            candidate_id: Some(candidate.id.clone()),
            status: StepStatus::Chosen,
            timestamp: now_millis(),
            invariant_rule_id: Some(candidate.rule_id.clone()),
            target_path: Some(candidate.target_path.clone()),
            expression_before: expression_before.into(),
            expression_after: None,
            error_code: None,
        }
    }

    /// An entry for a step where nothing could be chosen.
    pub fn no_candidates(expression_before: impl Into<String>) -> Self {
        Self {
            step_id: String::new(),
            candidate_id: None,
            status: StepStatus::NoCandidates,
            timestamp: now_millis(),
            invariant_rule_id: None,
            target_path: None,
            expression_before: expression_before.into(),
            expression_after: None,
            error_code: None,
        }
    }

    /// Returns true if this entry applied the same rule to the same node as the candidate.
    fn repeats(&self, candidate: &Candidate) -> bool {
        match (&self.invariant_rule_id, &self.target_path) {
            (Some(rule_id), Some(path)) => *rule_id == candidate.rule_id && *path == candidate.target_path,
            _ => false,
        }
    }
}

/// The append-only history of a tutoring session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepHistory {
    entries: Vec<StepHistoryEntry>,

    /// Incremented for every recorded entry, and never decremented, so that step ids stay unique
    /// after an undo.
    counter: usize,
}

impl StepHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, assigning it the next step id. Returns the assigned id.
    pub fn record(&mut self, mut entry: StepHistoryEntry) -> &str {
        self.counter += 1;
        entry.step_id = format!("step-{}", self.counter);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1].step_id
    }

    /// Removes and returns the most recent entry.
    pub fn undo(&mut self) -> Option<StepHistoryEntry> {
        self.entries.pop()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&StepHistoryEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[StepHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns true if a candidate targeting `target` is local to the selected node.
pub fn is_local(policy: LocalityPolicy, target: &Path, selection: &Path) -> bool {
    match policy {
        LocalityPolicy::Strict => target == selection,
        LocalityPolicy::Bubbling => target == selection
            || target.is_root()
            || selection.is_root()
            || target.is_strict_descendant_of(selection),
    }
}

/// Chooses a candidate, given the most recent step of the history and the selected node.
pub fn decide_step(
    candidates: &[Candidate],
    last: Option<&StepHistoryEntry>,
    selection: Option<&Path>,
    options: &DecisionOptions,
) -> Decision {
    decide_step_with_trace(candidates, last, selection, options, &mut ())
}

/// Chooses a candidate, reporting every discarded candidate to the collector.
pub fn decide_step_with_trace(
    candidates: &[Candidate],
    last: Option<&StepHistoryEntry>,
    selection: Option<&Path>,
    options: &DecisionOptions,
    trace: &mut dyn TraceCollector,
) -> Decision {
    let rejection = |candidate: &Candidate| {
        if last.map_or(false, |entry| entry.repeats(candidate)) {
            return Some("repeats the previous step".to_string());
        }
        match selection {
            Some(selection) if !is_local(options.locality, &candidate.target_path, selection) => {
                Some(format!("not local to `{}`", selection))
            },
            _ => None,
        }
    };

    let chosen = candidates.iter().find(|candidate| match rejection(candidate) {
        Some(reason) => {
            trace.push(TraceEvent::new(Stage::Decide, &candidate.id, reason));
            false
        },
        None => true,
    });

    match chosen {
        Some(candidate) => {
            trace.push(TraceEvent::new(Stage::Decide, StepStatus::Chosen.as_str(), &candidate.id));
            Decision {
                status: StepStatus::Chosen,
                chosen_candidate_id: Some(candidate.id.clone()),
            }
        },
        None => {
            trace.push(TraceEvent::new(
                Stage::Decide,
                StepStatus::NoCandidates.as_str(),
                format!("none of {} candidates survived", candidates.len()),
            ));
            Decision::no_candidates()
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("A", Path::root()),
            Candidate::new("B", path("term[0]")),
            Candidate::new("C", path("term[1]")),
            Candidate::new("D", path("term[0].term[1]")),
        ]
    }

    fn chosen(decision: Decision) -> Option<String> {
        decision.chosen_candidate_id
    }

    #[test]
    fn first_candidate_wins() {
        let decision = decide_step(&candidates(), None, None, &DecisionOptions::default());
        assert_eq!(decision.status, StepStatus::Chosen);
        assert_eq!(chosen(decision), Some("A@root".to_string()));
    }

    #[test]
    fn bubbling_locality() {
        let selection = path("term[0]");
        let mut events = Vec::new();
        let survivors = candidates()
            .into_iter()
            .filter(|c| is_local(LocalityPolicy::Bubbling, &c.target_path, &selection))
            .map(|c| c.rule_id)
            .collect::<Vec<_>>();
        assert_eq!(survivors, vec!["A", "B", "D"]);

        let decision = decide_step_with_trace(
            &candidates()[2..],
            None,
            Some(&selection),
            &DecisionOptions::default(),
            &mut events,
        );
        assert_eq!(chosen(decision), Some("D@term[0].term[1]".to_string()));
        assert!(events.iter().any(|e| e.decision == "C@term[1]" && e.reason.contains("not local")));

        // a root selection authorizes everything
        assert!(is_local(LocalityPolicy::Bubbling, &path("term[1]"), &Path::root()));
        // an ancestor of the selection is not local, unless it is the root
        assert!(!is_local(LocalityPolicy::Bubbling, &path("term[0]"), &path("term[0].term[1]")));
    }

    #[test]
    fn strict_locality() {
        let options = LocalityPolicy::Strict.inside(DecisionOptions::default());
        let decision = decide_step(&candidates(), None, Some(&path("term[1]")), &options);
        assert_eq!(chosen(decision), Some("C@term[1]".to_string()));

        let decision = decide_step(&candidates()[..2], None, Some(&path("term[1]")), &options);
        assert_eq!(decision, Decision::no_candidates());
    }

    #[test]
    fn repetition() {
        let mut history = StepHistory::new();
        let previous = Candidate::new("A", Path::root());
        history.record(StepHistoryEntry::chosen(&previous, "1 + 2"));

        let decision = decide_step(&candidates(), history.last(), None, &DecisionOptions::default());
        assert_eq!(chosen(decision), Some("B@term[0]".to_string()));

        // same rule elsewhere is not a repetition
        let moved = [Candidate::new("A", path("term[0]"))];
        let decision = decide_step(&moved, history.last(), None, &DecisionOptions::default());
        assert_eq!(decision.status, StepStatus::Chosen);

        // an entry without a rule never filters anything
        history.record(StepHistoryEntry::no_candidates("1 + 2"));
        let decision = decide_step(&[previous], history.last(), None, &DecisionOptions::default());
        assert_eq!(decision.status, StepStatus::Chosen);
    }

    #[test]
    fn history() {
        let mut history = StepHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.record(StepHistoryEntry::no_candidates("1")), "step-1");
        assert_eq!(history.record(StepHistoryEntry::no_candidates("2")), "step-2");

        let undone = history.undo().unwrap();
        assert_eq!(undone.step_id, "step-2");
        assert_eq!(history.len(), 1);
        assert_eq!(history.record(StepHistoryEntry::no_candidates("3")), "step-3");
        assert_eq!(history.entries()[1].expression_before, "3");
    }
}
