//! Structured `(stage, decision, reason)` events describing how a step was decided.
//!
//! The decision pipeline never prints anything. Instead, every operation has a `_with_trace`
//! variant accepting a [`TraceCollector`], which receives one [`TraceEvent`] per decision made.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The stage of the pipeline that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum Stage {
    /// Resolving a click into a node context.
    Context,

    /// Comparing a registry row against the context.
    Match,

    /// Choosing an outcome among the matches.
    Select,

    /// Running a primitive executor.
    Execute,

    /// Filtering and choosing step candidates.
    Decide,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Context => "context",
            Self::Match => "match",
            Self::Select => "select",
            Self::Execute => "execute",
            Self::Decide => "decide",
        };
        write!(f, "{}", name)
    }
}

/// A single decision made by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    /// The stage that made the decision.
    pub stage: Stage,

    /// What was decided, such as a rule id or an outcome.
    pub decision: String,

    /// Why it was decided.
    pub reason: String,
}

impl TraceEvent {
    /// Creates a new event.
    pub fn new(stage: Stage, decision: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage,
            decision: decision.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.decision, self.reason)
    }
}

/// A type that collects the trace events of the pipeline.
///
/// [`TraceCollector`] is also implemented for the unit type `()`, which discards every event.
pub trait TraceCollector {
    /// Adds an event to the collector.
    fn push(&mut self, event: TraceEvent);
}

impl TraceCollector for () {
    #[inline]
    fn push(&mut self, _: TraceEvent) {}
}

impl TraceCollector for Vec<TraceEvent> {
    #[inline]
    fn push(&mut self, event: TraceEvent) {
        Vec::push(self, event);
    }
}

/// A [`TraceCollector`] that forwards every event to [`tracing`], at the `debug` level for
/// outcomes and the `trace` level for individual rule comparisons.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCollector;

impl TraceCollector for TracingCollector {
    fn push(&mut self, event: TraceEvent) {
        match event.stage {
            Stage::Match => tracing::trace!(
                target: "tutor_core",
                stage = %event.stage,
                decision = %event.decision,
                reason = %event.reason,
                "rule compared",
            ),
            _ => tracing::debug!(
                target: "tutor_core",
                stage = %event.stage,
                decision = %event.decision,
                reason = %event.reason,
                "step decision",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn collectors() {
        let event = TraceEvent::new(Stage::Select, "green-primitive", "INT_ADD");

        let mut events = Vec::new();
        TraceCollector::push(&mut events, event.clone());
        assert_eq!(events, vec![event.clone()]);
        assert_eq!(event.to_string(), "[select] green-primitive: INT_ADD");

        // discarding and forwarding never fail
        ().push(event.clone());
        TracingCollector.push(event);
    }
}
