use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// An operator recognized by the registry.
///
/// The set is closed: anything the registry does not know about is rejected
/// by the validator, so the compiler can never emit a token outside of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "$gt")]
    Gt,
    #[serde(rename = "$lt")]
    Lt,
    #[serde(rename = "$gte")]
    Gte,
    #[serde(rename = "$lte")]
    Lte,
    #[serde(rename = "$eq")]
    Eq,
    #[serde(rename = "$ne")]
    Ne,
    #[serde(rename = "$in")]
    In,
    #[serde(rename = "$nin")]
    Nin,
    #[serde(rename = "$regex")]
    Regex,
    #[serde(rename = "$and")]
    And,
    #[serde(rename = "$or")]
    Or,
    #[serde(rename = "$not")]
    Not,
    #[serde(rename = "$nor")]
    Nor,
    #[serde(rename = "$exists")]
    Exists,
    #[serde(rename = "$type")]
    Type,
    #[serde(rename = "$all")]
    All,
    #[serde(rename = "$elemMatch")]
    ElemMatch,
    #[serde(rename = "$size")]
    Size,
}

/// Operator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    Comparison,
    Logical,
    Element,
    Array,
}

/// Value-arity contract of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// A single literal
    Scalar,
    /// A list of literals
    List,
    /// `true` or `false`
    Boolean,
    /// An integer `>= 0`
    NonNegativeInteger,
    /// A nested rule tree instead of a literal
    NestedRule,
    /// Child rules of a combinator
    Rules,
}

impl Display for ValueShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueShape::Scalar => write!(f, "scalar"),
            ValueShape::List => write!(f, "list"),
            ValueShape::Boolean => write!(f, "boolean"),
            ValueShape::NonNegativeInteger => write!(f, "non-negative integer"),
            ValueShape::NestedRule => write!(f, "nested rule"),
            ValueShape::Rules => write!(f, "rules"),
        }
    }
}

/// Registry entry of an operator.
#[derive(Debug, PartialEq, Eq)]
pub struct OperatorSpec {
    pub operator: Operator,
    /// Token accepted in rule input.
    pub token: &'static str,
    pub family: OperatorFamily,
    pub shape: ValueShape,
    /// Token emitted in the native filter.
    pub native: &'static str,
}

macro_rules! spec {
    ($op:ident, $token:literal, $family:ident, $shape:ident) => {
        OperatorSpec {
            operator: Operator::$op,
            token: $token,
            family: OperatorFamily::$family,
            shape: ValueShape::$shape,
            native: $token,
        }
    };
}

// Indexed by `Operator as usize`; entries must follow the enum order.
static REGISTRY: [OperatorSpec; 18] = [
    spec!(Gt, "$gt", Comparison, Scalar),
    spec!(Lt, "$lt", Comparison, Scalar),
    spec!(Gte, "$gte", Comparison, Scalar),
    spec!(Lte, "$lte", Comparison, Scalar),
    spec!(Eq, "$eq", Comparison, Scalar),
    spec!(Ne, "$ne", Comparison, Scalar),
    spec!(In, "$in", Comparison, List),
    spec!(Nin, "$nin", Comparison, List),
    spec!(Regex, "$regex", Comparison, Scalar),
    spec!(And, "$and", Logical, Rules),
    spec!(Or, "$or", Logical, Rules),
    spec!(Not, "$not", Logical, Rules),
    spec!(Nor, "$nor", Logical, Rules),
    spec!(Exists, "$exists", Element, Boolean),
    spec!(Type, "$type", Element, Scalar),
    spec!(All, "$all", Array, List),
    spec!(ElemMatch, "$elemMatch", Array, NestedRule),
    spec!(Size, "$size", Array, NonNegativeInteger),
];

impl Operator {
    pub const ALL: [Operator; 18] = [
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Eq,
        Operator::Ne,
        Operator::In,
        Operator::Nin,
        Operator::Regex,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::Nor,
        Operator::Exists,
        Operator::Type,
        Operator::All,
        Operator::ElemMatch,
        Operator::Size,
    ];

    /// Resolves an input token. Tokens are case-sensitive.
    pub fn from_token(token: &str) -> Option<Operator> {
        let operator = match token {
            "$gt" => Operator::Gt,
            "$lt" => Operator::Lt,
            "$gte" => Operator::Gte,
            "$lte" => Operator::Lte,
            "$eq" => Operator::Eq,
            "$ne" => Operator::Ne,
            "$in" => Operator::In,
            "$nin" => Operator::Nin,
            "$regex" => Operator::Regex,
            "$and" => Operator::And,
            "$or" => Operator::Or,
            "$not" => Operator::Not,
            "$nor" => Operator::Nor,
            "$exists" => Operator::Exists,
            "$type" => Operator::Type,
            "$all" => Operator::All,
            "$elemMatch" => Operator::ElemMatch,
            "$size" => Operator::Size,
            _ => return None,
        };
        Some(operator)
    }

    #[inline]
    pub fn spec(self) -> &'static OperatorSpec {
        &REGISTRY[self as usize]
    }

    #[inline]
    pub fn token(self) -> &'static str {
        self.spec().token
    }

    #[inline]
    pub fn native_token(self) -> &'static str {
        self.spec().native
    }

    #[inline]
    pub fn family(self) -> OperatorFamily {
        self.spec().family
    }

    #[inline]
    pub fn shape(self) -> ValueShape {
        self.spec().shape
    }

    /// Returns `true` for AND/OR/NOT/NOR, which only appear as rule conditions.
    #[inline]
    pub fn is_combinator(self) -> bool {
        self.family() == OperatorFamily::Logical
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Looks up an input token in the registry.
///
/// # Examples
///
/// ```rust
/// use filterspec::operator::{lookup, OperatorFamily, ValueShape};
///
/// let spec = lookup("$in").unwrap();
/// assert_eq!(spec.family, OperatorFamily::Comparison);
/// assert_eq!(spec.shape, ValueShape::List);
/// assert!(lookup("$where").is_none());
/// ```
#[inline]
pub fn lookup(token: &str) -> Option<&'static OperatorSpec> {
    Operator::from_token(token).map(Operator::spec)
}
