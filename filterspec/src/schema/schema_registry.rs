use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};

use super::FieldSchema;

/// Holder of the current [`FieldSchema`].
///
/// Callers take a snapshot at the start of a request and use it for the
/// whole request. A reload replaces the schema whole, so a request never
/// sees half of an old schema and half of a new one.
///
/// # Examples
///
/// ```rust
/// use filterspec::schema::{FieldKind, FieldSchema, FieldSpec, SchemaRegistry};
///
/// let registry = SchemaRegistry::new(FieldSchema::default());
/// let before = registry.snapshot();
///
/// let reloaded = FieldSchema::builder()
///     .field("status", FieldSpec::new(FieldKind::String))
///     .build()
///     .unwrap();
/// registry.swap(reloaded);
///
/// assert!(before.lookup("status").is_none());
/// assert!(registry.snapshot().lookup("status").is_some());
/// ```
#[derive(Clone)]
pub struct SchemaRegistry {
    inner: Arc<SchemaRegistryInner>,
}

struct SchemaRegistryInner {
    current: Atomic<Arc<FieldSchema>>,
    generation: AtomicU64,
}

impl SchemaRegistry {
    pub fn new(schema: FieldSchema) -> Self {
        SchemaRegistry::from_arc(Arc::new(schema))
    }

    pub fn from_arc(schema: Arc<FieldSchema>) -> Self {
        SchemaRegistry {
            inner: Arc::new(SchemaRegistryInner {
                current: atomic(schema),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The schema in effect right now.
    pub fn snapshot(&self) -> Arc<FieldSchema> {
        self.inner.current.read_with(|current| current.clone())
    }

    /// Replaces the schema and returns the previous one. Snapshots taken
    /// before the swap keep the previous schema alive.
    pub fn swap(&self, schema: FieldSchema) -> Arc<FieldSchema> {
        let schema = Arc::new(schema);
        let field_count = schema.len();
        let previous = self
            .inner
            .current
            .write_with(|current| std::mem::replace(current, schema));
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!(
            "Schema swapped to generation {} with {} fields",
            generation,
            field_count
        );
        previous
    }

    /// Number of swaps since creation.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        SchemaRegistry::from_arc(FieldSchema::empty())
    }
}
