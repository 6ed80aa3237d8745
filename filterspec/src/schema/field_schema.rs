use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;

use crate::codec::{encode, encode_path};
use crate::common::FIELD_SEPARATOR;
use crate::errors::{ErrorKind, FilterError, FilterResult};
use crate::operator::Operator;

use super::FieldKind;

static EMPTY_SCHEMA: LazyLock<Arc<FieldSchema>> = LazyLock::new(|| Arc::new(FieldSchema::default()));

/// How a field name maps to a storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldPath {
    /// The whole name is a single key; dots in it are escaped.
    #[default]
    Literal,
    /// The name is a dotted path into nested documents.
    Nested,
}

/// Schema entry of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    kind: FieldKind,
    allowed: Option<BTreeSet<Operator>>,
    path: FieldPath,
    elements: Option<Arc<FieldSchema>>,
}

impl FieldSpec {
    /// A literal field of `kind` that permits every operator its kind supports.
    pub fn new(kind: FieldKind) -> Self {
        FieldSpec {
            kind,
            allowed: None,
            path: FieldPath::Literal,
            elements: None,
        }
    }

    /// Narrows the operators permitted on this field.
    pub fn with_operators<I>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = Operator>,
    {
        self.allowed = Some(operators.into_iter().collect());
        self
    }

    /// Marks the name as a dotted path into nested documents.
    pub fn nested(mut self) -> Self {
        self.path = FieldPath::Nested;
        self
    }

    /// Sets the schema `$elemMatch` sub-rules are checked against.
    pub fn with_elements(mut self, elements: FieldSchema) -> Self {
        self.elements = Some(Arc::new(elements));
        self
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> FieldPath {
        self.path
    }

    pub fn allowed(&self) -> Option<&BTreeSet<Operator>> {
        self.allowed.as_ref()
    }

    /// Returns `true` when the schema lets `operator` be used on this field.
    pub fn permits(&self, operator: Operator) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.contains(&operator),
            None => true,
        }
    }

    /// The key the compiled filter uses for a field called `name`.
    pub fn storage_key(&self, name: &str) -> String {
        match self.path {
            FieldPath::Literal => encode(name),
            FieldPath::Nested => encode_path(name.split(FIELD_SEPARATOR)),
        }
    }

    /// Schema of a single array element. Empty when none was set.
    pub fn element_schema(&self) -> &FieldSchema {
        match &self.elements {
            Some(elements) => elements,
            None => &EMPTY_SCHEMA,
        }
    }
}

/// Field lookup used by the validator and the compiler.
pub trait SchemaProvider: Send + Sync {
    fn lookup(&self, field: &str) -> Option<&FieldSpec>;
}

/// Immutable table of the fields a caller may filter on.
///
/// # Examples
///
/// ```rust
/// use filterspec::operator::Operator;
/// use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
///
/// let schema = FieldSchema::builder()
///     .field("status", FieldSpec::new(FieldKind::String))
///     .field("cpu.load", FieldSpec::new(FieldKind::Number).with_operators([Operator::Gt, Operator::Lt]))
///     .build()
///     .unwrap();
///
/// assert!(schema.lookup("status").is_some());
/// assert!(!schema.lookup("cpu.load").unwrap().permits(Operator::Eq));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: IndexMap<String, FieldSpec>,
}

impl FieldSchema {
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder::default()
    }

    /// A shared empty schema.
    pub fn empty() -> Arc<FieldSchema> {
        EMPTY_SCHEMA.clone()
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl SchemaProvider for FieldSchema {
    #[inline]
    fn lookup(&self, field: &str) -> Option<&FieldSpec> {
        FieldSchema::lookup(self, field)
    }
}

/// Builder for [`FieldSchema`]. The first invalid entry is captured and
/// returned by [`build`](FieldSchemaBuilder::build).
#[derive(Default)]
pub struct FieldSchemaBuilder {
    fields: IndexMap<String, FieldSpec>,
    error: Option<FilterError>,
}

impl FieldSchemaBuilder {
    /// Adds a field.
    ///
    /// An empty or duplicate name is captured as an `InvalidConfiguration`
    /// error, as is an element schema on a non-array field.
    pub fn field(mut self, name: &str, spec: FieldSpec) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.check(name, &spec) {
                self.error = Some(e);
                return self;
            }
            self.fields.insert(name.to_string(), spec);
        }
        self
    }

    fn check(&self, name: &str, spec: &FieldSpec) -> FilterResult<()> {
        if name.is_empty() {
            log::error!("Schema field name can not be empty");
            return Err(FilterError::new(
                "schema field name can not be empty",
                ErrorKind::InvalidConfiguration,
            ));
        }
        if self.fields.contains_key(name) {
            log::error!("Schema field {} is declared twice", name);
            return Err(FilterError::new(
                &format!("schema field '{}' is declared twice", name),
                ErrorKind::InvalidConfiguration,
            ));
        }
        if spec.elements.is_some() && spec.kind != FieldKind::Array {
            log::error!("Schema field {} has an element schema but is not an array", name);
            return Err(FilterError::new(
                &format!("schema field '{}' has an element schema but is a {}", name, spec.kind),
                ErrorKind::InvalidConfiguration,
            ));
        }
        Ok(())
    }

    pub fn build(self) -> FilterResult<FieldSchema> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(FieldSchema { fields: self.fields })
    }
}
