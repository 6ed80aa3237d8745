use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};
use crate::rule::RulePath;

/// Error kinds for rule parsing, validation and compilation.
///
/// The first seven kinds describe problems with caller input and are safe to
/// hand back to the client verbatim. [`ErrorKind::InvalidConfiguration`] and
/// [`ErrorKind::InternalError`] describe problems on the server side.
///
/// # Examples
///
/// ```rust
/// use filterspec::errors::{ErrorKind, FilterError, FilterResult};
///
/// fn example() -> FilterResult<()> {
///     Err(FilterError::new("unsupported operator: $where", ErrorKind::UnknownOperator))
/// }
///
/// assert!(example().unwrap_err().kind().is_user_error());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ErrorKind {
    /// The operator token is not part of the operator registry
    UnknownOperator,
    /// The field is absent from the schema, or the operator is not permitted on it
    FieldNotAllowed,
    /// The value does not fit the operator's arity contract or the field kind
    TypeMismatch,
    /// The rule tree is nested deeper than the configured limit
    TooDeep,
    /// The rule tree holds more conditions than the configured limit
    TooManyConditions,
    /// A combinator has no children, or the whole tree is empty
    EmptyRuleSet,
    /// The input does not parse into one of the two rule shapes
    MalformedTree,

    /// Limits or schema were built with invalid settings
    InvalidConfiguration,
    /// Internal error (a broken compiler contract, usually a bug)
    InternalError,
}

impl ErrorKind {
    /// Returns `true` when the error was caused by caller input.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ErrorKind::InvalidConfiguration | ErrorKind::InternalError)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnknownOperator => write!(f, "Unknown operator"),
            ErrorKind::FieldNotAllowed => write!(f, "Field not allowed"),
            ErrorKind::TypeMismatch => write!(f, "Type mismatch"),
            ErrorKind::TooDeep => write!(f, "Rule tree too deep"),
            ErrorKind::TooManyConditions => write!(f, "Too many conditions"),
            ErrorKind::EmptyRuleSet => write!(f, "Empty rule set"),
            ErrorKind::MalformedTree => write!(f, "Malformed rule tree"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the crate.
///
/// `FilterError` carries a message, a kind, an optional locator pointing at
/// the offending rule node and an optional cause. The backtrace is captured
/// unresolved and only symbolized when the error is debug-printed, so
/// rejecting bad client input stays cheap.
///
/// # Examples
///
/// ```rust
/// use filterspec::errors::{ErrorKind, FilterError};
/// use filterspec::rule::{PathSegment, RulePath};
///
/// let path = RulePath::root().child(PathSegment::Rules(2)).child(PathSegment::Rules(0));
/// let err = FilterError::new("max depth 3 exceeded", ErrorKind::TooDeep).with_path(path);
/// assert_eq!(err.to_string(), "rules[2].rules[0]: max depth 3 exceeded");
/// ```
#[derive(Clone)]
pub struct FilterError {
    message: String,
    error_kind: ErrorKind,
    path: Option<RulePath>,
    cause: Option<Box<FilterError>>,
    backtrace: Atomic<Backtrace>,
}

impl FilterError {
    /// Creates a new `FilterError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        FilterError {
            message: message.to_string(),
            error_kind,
            path: None,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `FilterError` wrapping a cause error.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: FilterError) -> Self {
        FilterError {
            message: message.to_string(),
            error_kind,
            path: cause.path.clone(),
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Attaches the locator of the rule node the error refers to.
    pub fn with_path(mut self, path: RulePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn path(&self) -> Option<&RulePath> {
        self.path.as_ref()
    }

    pub fn cause(&self) -> Option<&FilterError> {
        self.cause.as_deref()
    }
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) if !path.is_root() => write!(f, "{}: {}", path, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl Debug for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "[{}] {}\nCaused by: {:?}", self.error_kind, self, cause),
            None => {
                let mut backtrace = self.backtrace.write();
                backtrace.resolve();
                write!(f, "[{}] {}\n{:?}", self.error_kind, self, *backtrace)
            }
        }
    }
}

impl Error for FilterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for rule operations.
pub type FilterResult<T> = Result<T, FilterError>;

impl de::Error for FilterError {
    fn custom<T: Display>(msg: T) -> Self {
        FilterError::new(&msg.to_string(), ErrorKind::MalformedTree)
    }
}

impl ser::Error for FilterError {
    fn custom<T: Display>(msg: T) -> Self {
        FilterError::new(&msg.to_string(), ErrorKind::InternalError)
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::new(&format!("invalid rule json: {}", err), ErrorKind::MalformedTree)
    }
}

impl From<fancy_regex::Error> for FilterError {
    fn from(err: fancy_regex::Error) -> Self {
        FilterError::new(&format!("invalid regular expression: {}", err), ErrorKind::TypeMismatch)
    }
}

impl From<String> for FilterError {
    fn from(msg: String) -> Self {
        FilterError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for FilterError {
    fn from(msg: &str) -> Self {
        FilterError::new(msg, ErrorKind::InternalError)
    }
}
