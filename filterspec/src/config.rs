//! Limits applied by the validator.

use serde::{Deserialize, Serialize};

use crate::common::{
    DEFAULT_MAX_AND_RULES, DEFAULT_MAX_CONDITIONS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LIST_ELEMENTS,
    DEFAULT_MAX_OR_RULES,
};
use crate::errors::{ErrorKind, FilterError, FilterResult};

/// Bounds on the size of a rule tree.
///
/// Every field has a default, so a partial document is enough when limits are
/// loaded from a service configuration file.
///
/// # Examples
///
/// ```rust
/// use filterspec::config::Limits;
///
/// let limits: Limits = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
/// assert_eq!(limits.max_depth, 3);
/// assert_eq!(limits.max_conditions, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting depth; a single atom has depth 1
    pub max_depth: usize,
    /// Maximum number of atoms in the whole tree
    pub max_conditions: usize,
    /// Maximum number of elements in an `$in`, `$nin` or `$all` list
    pub max_list_elements: usize,
    /// Maximum number of children of one `OR` or `NOR`, 0 for no limit
    pub max_or_rules: usize,
    /// Maximum number of children of one `AND`, 0 for no limit
    pub max_and_rules: usize,
    /// Whether list elements must all have the same JSON type
    pub require_uniform_lists: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_conditions: DEFAULT_MAX_CONDITIONS,
            max_list_elements: DEFAULT_MAX_LIST_ELEMENTS,
            max_or_rules: DEFAULT_MAX_OR_RULES,
            max_and_rules: DEFAULT_MAX_AND_RULES,
            require_uniform_lists: true,
        }
    }
}

impl Limits {
    pub fn builder() -> LimitsBuilder {
        LimitsBuilder::default()
    }

    /// Checks the limits are usable.
    pub fn check(&self) -> FilterResult<()> {
        if self.max_depth == 0 {
            log::error!("max_depth must be at least 1");
            return Err(FilterError::new(
                "max_depth must be at least 1",
                ErrorKind::InvalidConfiguration,
            ));
        }
        if self.max_conditions == 0 {
            log::error!("max_conditions must be at least 1");
            return Err(FilterError::new(
                "max_conditions must be at least 1",
                ErrorKind::InvalidConfiguration,
            ));
        }
        Ok(())
    }
}

/// Builder for [`Limits`], starting from the defaults.
#[derive(Default)]
pub struct LimitsBuilder {
    limits: Limits,
}

impl LimitsBuilder {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.limits.max_depth = max_depth;
        self
    }

    pub fn max_conditions(mut self, max_conditions: usize) -> Self {
        self.limits.max_conditions = max_conditions;
        self
    }

    pub fn max_list_elements(mut self, max_list_elements: usize) -> Self {
        self.limits.max_list_elements = max_list_elements;
        self
    }

    pub fn max_or_rules(mut self, max_or_rules: usize) -> Self {
        self.limits.max_or_rules = max_or_rules;
        self
    }

    pub fn max_and_rules(mut self, max_and_rules: usize) -> Self {
        self.limits.max_and_rules = max_and_rules;
        self
    }

    pub fn require_uniform_lists(mut self, require_uniform_lists: bool) -> Self {
        self.limits.require_uniform_lists = require_uniform_lists;
        self
    }

    /// # Errors
    ///
    /// `InvalidConfiguration` when `max_depth` or `max_conditions` is 0.
    pub fn build(self) -> FilterResult<Limits> {
        self.limits.check()?;
        Ok(self.limits)
    }
}
