use std::sync::Arc;

use crate::compiler::{compile, NativeFilter};
use crate::config::Limits;
use crate::errors::{FilterError, FilterResult};
use crate::rule::{parse_rule_tree, Rule};
use crate::schema::{FieldSchema, SchemaRegistry};
use crate::validator::validate;

/// Entry point of the crate: parses, validates and compiles rule trees
/// against the current schema and the configured limits.
///
/// `FilterCompiler` is cheap to clone and can be shared between threads.
/// Every call works on one schema snapshot taken when the call starts, so a
/// concurrent schema swap never mixes two schemas within a single request.
///
/// # Examples
///
/// ```rust
/// use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
/// use filterspec::FilterCompiler;
///
/// let schema = FieldSchema::builder()
///     .field("status", FieldSpec::new(FieldKind::String))
///     .field("cpu.load", FieldSpec::new(FieldKind::Number).nested())
///     .build()
///     .unwrap();
/// let compiler = FilterCompiler::builder().schema(schema).build().unwrap();
///
/// let filter = compiler.compile_json(r#"{
///     "condition": "AND",
///     "rules": [
///         {"field": "status", "operator": "$eq", "value": "running"},
///         {"field": "cpu.load", "operator": "$gt", "value": 80}
///     ]
/// }"#).unwrap();
/// assert_eq!(
///     filter.to_string(),
///     r#"{"$and":[{"status":"running"},{"cpu.load":{"$gt":80}}]}"#
/// );
/// ```
#[derive(Clone)]
pub struct FilterCompiler {
    inner: Arc<FilterCompilerInner>,
}

struct FilterCompilerInner {
    limits: Limits,
    schemas: SchemaRegistry,
}

impl FilterCompiler {
    pub fn builder() -> FilterCompilerBuilder {
        FilterCompilerBuilder::default()
    }

    /// A compiler over a fixed schema with default limits.
    pub fn new(schema: FieldSchema) -> Self {
        FilterCompiler {
            inner: Arc::new(FilterCompilerInner {
                limits: Limits::default(),
                schemas: SchemaRegistry::new(schema),
            }),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.inner.limits
    }

    /// The registry the schema is read from. Swapping the schema in it takes
    /// effect for calls starting afterwards.
    pub fn schema_registry(&self) -> &SchemaRegistry {
        &self.inner.schemas
    }

    /// Parses a raw JSON payload into a rule tree.
    pub fn parse(&self, raw: &str) -> FilterResult<Rule> {
        parse_rule_tree(raw).map_err(|e| self.rejected("parse", e))
    }

    /// Validates a rule tree against the current schema.
    pub fn validate(&self, rule: &Rule) -> FilterResult<()> {
        let schema = self.inner.schemas.snapshot();
        validate(rule, schema.as_ref(), &self.inner.limits).map_err(|e| self.rejected("validate", e))
    }

    /// Validates a rule tree and compiles it, both against the same schema
    /// snapshot.
    pub fn compile(&self, rule: &Rule) -> FilterResult<NativeFilter> {
        let schema = self.inner.schemas.snapshot();
        validate(rule, schema.as_ref(), &self.inner.limits).map_err(|e| self.rejected("validate", e))?;
        let filter = compile(rule, schema.as_ref())?;
        log::debug!("Compiled rule {} into {}", rule, filter);
        Ok(filter)
    }

    /// Runs the whole pipeline on a raw JSON payload.
    pub fn compile_json(&self, raw: &str) -> FilterResult<NativeFilter> {
        let rule = self.parse(raw)?;
        self.compile(&rule)
    }

    fn rejected(&self, stage: &str, error: FilterError) -> FilterError {
        if error.kind().is_user_error() {
            log::debug!("Rule rejected at {}: {}", stage, error);
        } else {
            log::error!("Rule failed at {}: {}", stage, error);
        }
        error
    }
}

/// Builder for [`FilterCompiler`].
///
/// Invalid settings are captured and returned by
/// [`build`](FilterCompilerBuilder::build).
#[derive(Default)]
pub struct FilterCompilerBuilder {
    limits: Limits,
    schemas: Option<SchemaRegistry>,
    error: Option<FilterError>,
}

impl FilterCompilerBuilder {
    /// Sets the limits. Limits with a zero depth or condition count are
    /// captured as an `InvalidConfiguration` error.
    pub fn limits(mut self, limits: Limits) -> Self {
        if self.error.is_none() {
            if let Err(e) = limits.check() {
                self.error = Some(e);
                return self;
            }
            self.limits = limits;
        }
        self
    }

    /// Uses a fixed schema.
    pub fn schema(mut self, schema: FieldSchema) -> Self {
        self.schemas = Some(SchemaRegistry::new(schema));
        self
    }

    /// Reads the schema from a registry shared with whoever reloads it.
    pub fn schema_registry(mut self, registry: SchemaRegistry) -> Self {
        self.schemas = Some(registry);
        self
    }

    /// Builds the compiler. Without a schema every field is rejected.
    pub fn build(self) -> FilterResult<FilterCompiler> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(FilterCompiler {
            inner: Arc::new(FilterCompilerInner {
                limits: self.limits,
                schemas: self.schemas.unwrap_or_default(),
            }),
        })
    }
}
