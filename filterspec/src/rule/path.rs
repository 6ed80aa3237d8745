use std::fmt::Display;

use smallvec::SmallVec;

use crate::common::{CONDITION_KEY, FIELD_KEY, OPERATOR_KEY, RULES_KEY, VALUE_KEY};

/// One step of a [`RulePath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// The n-th child of a combined rule
    Rules(usize),
    Condition,
    Field,
    Operator,
    /// The value of an atom, or the nested rule of `$elemMatch`
    Value,
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Rules(index) => write!(f, "{}[{}]", RULES_KEY, index),
            PathSegment::Condition => write!(f, "{}", CONDITION_KEY),
            PathSegment::Field => write!(f, "{}", FIELD_KEY),
            PathSegment::Operator => write!(f, "{}", OPERATOR_KEY),
            PathSegment::Value => write!(f, "{}", VALUE_KEY),
        }
    }
}

/// Locator of a node inside a rule tree, e.g. `rules[2].rules[0]`.
///
/// Paths are built while walking the tree and attached to errors, so they are
/// kept inline for the depths the validator allows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RulePath {
    segments: SmallVec<[PathSegment; 8]>,
}

impl RulePath {
    /// The locator of the root rule.
    pub fn root() -> RulePath {
        RulePath::default()
    }

    /// Returns a new path one step below this one.
    pub fn child(&self, segment: PathSegment) -> RulePath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        RulePath { segments }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of `rules[i]` steps, i.e. how many combinators lie above the node.
    pub fn rule_depth(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Rules(_)))
            .count()
    }
}

impl Display for RulePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
