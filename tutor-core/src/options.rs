//! Options controlling how step candidates are decided.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for the step decision layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionOptions {
    /// Which candidates are local to the selected node.
    pub locality: LocalityPolicy,
}

impl DecisionOptions {
    /// Wraps the given [`DecisionOptions`] into a builder for further customization.
    pub fn into_builder(self) -> DecisionOptionsBuilder {
        DecisionOptionsBuilder(self)
    }
}

/// Which candidates survive the locality filter, given the path of the selected node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum LocalityPolicy {
    /// A candidate is kept if it targets the selected node, the root, or a node strictly inside
    /// the selected node. Every candidate is kept if the root is selected.
    ///
    /// This is the default option.
    #[default]
    Bubbling,

    /// A candidate is kept only if it targets exactly the selected node.
    Strict,
}

impl LocalityPolicy {
    /// Utility function to create a new [`DecisionOptions`] with the same options as the given
    /// [`DecisionOptions`], but with the locality policy set to this value.
    pub fn inside(self, options: DecisionOptions) -> DecisionOptions {
        DecisionOptions {
            locality: self,
            ..options
        }
    }
}

/// Helper struct to build a [`DecisionOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOptionsBuilder(DecisionOptions);

impl DecisionOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locality policy. See [`LocalityPolicy`] for more information.
    pub fn locality(mut self, locality: LocalityPolicy) -> Self {
        self.0.locality = locality;
        self
    }

    /// Builds the [`DecisionOptions`] struct.
    pub fn build(self) -> DecisionOptions {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn builder() {
        assert_eq!(DecisionOptions::default().locality, LocalityPolicy::Bubbling);

        let options = DecisionOptionsBuilder::new()
            .locality(LocalityPolicy::Strict)
            .build();
        assert_eq!(options.locality, LocalityPolicy::Strict);
        assert_eq!(options.into_builder().locality(LocalityPolicy::Bubbling).build(), DecisionOptions::default());
        assert_eq!(LocalityPolicy::Strict.inside(DecisionOptions::default()), options);
    }
}
