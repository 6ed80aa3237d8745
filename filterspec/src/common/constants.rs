// rule document keys
pub const CONDITION_KEY: &str = "condition";
pub const RULES_KEY: &str = "rules";
pub const FIELD_KEY: &str = "field";
pub const OPERATOR_KEY: &str = "operator";
pub const VALUE_KEY: &str = "value";
pub const COMBINED_RULE_KEYS: [&str; 2] = [CONDITION_KEY, RULES_KEY];
pub const ATOM_RULE_KEYS: [&str; 3] = [FIELD_KEY, OPERATOR_KEY, VALUE_KEY];

// field name codec
pub const FIELD_SEPARATOR: char = '.';
pub const ESCAPE_INTRODUCER: char = '\\';
pub const ESCAPED_SEPARATOR: &str = "\\u002e";
pub const ESCAPED_INTRODUCER: &str = "\\u005c";

// Both escapes must share the same width so encoded names grow predictably.
const _: () = {
    const _: [(); 1] = [(); (ESCAPED_SEPARATOR.len() == ESCAPED_INTRODUCER.len()) as usize];
};

// default limits
pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_MAX_CONDITIONS: usize = 100;
pub const DEFAULT_MAX_LIST_ELEMENTS: usize = 500;
pub const DEFAULT_MAX_OR_RULES: usize = 20;
pub const DEFAULT_MAX_AND_RULES: usize = 0;

// timestamp string layouts accepted besides RFC 3339
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

pub const FILTERSPEC_VERSION: &str = env!("CARGO_PKG_VERSION");
