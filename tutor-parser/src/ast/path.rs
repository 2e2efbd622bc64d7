//! Paths that address a node of an [`AstNode`](super::AstNode) tree.
//!
//! Paths are exchanged as strings, such as `term[0].term[1].argument`, and parsed into a typed
//! sequence of [`PathStep`]s before use. The empty path addresses the root and is written `root`
//! (the empty string is accepted too).

use crate::parser::error::{kind, Error};
use std::{fmt, str::FromStr};

/// One step from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    /// The left operand of a binary operation, written `term[0]`.
    Left,

    /// The right operand of a binary operation, written `term[1]`.
    Right,

    /// The operand of a unary operation, written `argument`.
    Argument,

    /// The numerator of a fraction, written `num`.
    Num,

    /// The denominator of a fraction, written `den`.
    Den,
}

impl PathStep {
    /// Returns the string form of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "term[0]",
            Self::Right => "term[1]",
            Self::Argument => "argument",
            Self::Num => "num",
            Self::Den => "den",
        }
    }

    /// Returns the step leading to the other operand of the same binary operation, if any.
    pub fn sibling(&self) -> Option<Self> {
        match self {
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::Argument | Self::Num | Self::Den => None,
        }
    }
}

impl FromStr for PathStep {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "term[0]" => Ok(Self::Left),
            "term[1]" => Ok(Self::Right),
            "argument" => Ok(Self::Argument),
            "num" => Ok(Self::Num),
            "den" => Ok(Self::Den),
            _ => Err(()),
        }
    }
}

/// The address of a node, as the ordered list of steps leading to it from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<PathStep>);

impl Path {
    /// Returns the path of the root node.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns true if this is the path of the root node.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the steps of the path.
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Returns the last step of the path.
    pub fn last(&self) -> Option<PathStep> {
        self.0.last().copied()
    }

    /// Returns a new path extended by the given step.
    pub fn child(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// Returns the path of the parent node, or [`None`] for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// Returns true if this path is equal to, or an ancestor of, the given path.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Returns true if this path addresses a node strictly contained by the node at `ancestor`.
    pub fn is_strict_descendant_of(&self, ancestor: &Self) -> bool {
        self.0.len() > ancestor.0.len() && ancestor.is_prefix_of(self)
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "root");
        }

        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "root" {
            return Ok(Self::root());
        }

        let start = s.len() - s.trim_start().len();
        let mut offset = start;
        let mut steps = Vec::new();
        for segment in trimmed.split('.') {
            let step = segment.parse::<PathStep>().map_err(|_| {
                Error::new(
                    vec![offset..offset + segment.len()],
                    kind::InvalidPathStep { step: segment.to_string() },
                )
            })?;
            steps.push(step);
            offset += segment.len() + 1;
        }

        Ok(Self(steps))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(|err: Error| serde::de::Error::custom(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_and_print() {
        let path: Path = "term[0].argument.den".parse().unwrap();
        assert_eq!(path.steps(), &[PathStep::Left, PathStep::Argument, PathStep::Den]);
        assert_eq!(path.to_string(), "term[0].argument.den");
        assert_eq!("root".parse::<Path>().unwrap(), Path::root());
        assert_eq!("".parse::<Path>().unwrap(), Path::root());
        assert_eq!(Path::root().to_string(), "root");
    }

    #[test]
    fn invalid_step_is_located() {
        let err = "term[0].left".parse::<Path>().unwrap_err();
        assert_eq!(err.code(), "invalid-path");
        assert_eq!(err.spans, vec![8..12]);
        assert_eq!(err.to_string(), "unknown path step `left`");
    }

    #[test]
    fn relationships() {
        let root = Path::root();
        let left: Path = "term[0]".parse().unwrap();
        let left_right: Path = "term[0].term[1]".parse().unwrap();
        let right: Path = "term[1]".parse().unwrap();

        assert!(left_right.is_strict_descendant_of(&left));
        assert!(left_right.is_strict_descendant_of(&root));
        assert!(!left.is_strict_descendant_of(&left));
        assert!(!right.is_strict_descendant_of(&left));
        assert!(left.is_prefix_of(&left));
        assert_eq!(left_right.parent(), Some(left.clone()));
        assert_eq!(root.parent(), None);
        assert_eq!(left.child(PathStep::Right), left_right);
    }
}
