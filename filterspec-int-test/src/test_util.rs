use filterspec::config::Limits;
use filterspec::errors::{ErrorKind, FilterError, FilterResult};
use filterspec::operator::Operator;
use filterspec::rule::{and, field, not, or, Rule};
use filterspec::schema::{FieldKind, FieldSchema, FieldSpec, SchemaRegistry};
use filterspec::FilterCompiler;
use std::time::Instant;

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test body fails, and a failure is reported
/// with the phase it happened in and how long the run took.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> FilterResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> FilterResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> FilterResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| match before() {
        Ok(ctx) => match test(ctx.clone()) {
            Ok(_) => after(ctx).map_err(|e| format!("After run failed: {:?}", e)),
            Err(e) => {
                let _ = after(ctx);
                Err(format!("Test failed: {:?}", e))
            }
        },
        Err(e) => Err(format!("Before run failed: {:?}", e)),
    });

    let elapsed = start_time.elapsed();
    let error = match result {
        Ok(Ok(_)) => return,
        Ok(Err(e)) => e,
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            format!("Panic: {}", err_msg)
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Took {:?}", elapsed);
    eprintln!("{}", error);
    eprintln!("=====================================================\n");
    panic!("{}", error);
}

#[derive(Clone)]
pub struct TestContext {
    registry: SchemaRegistry,
    compiler: FilterCompiler,
}

impl TestContext {
    pub fn new(registry: SchemaRegistry, compiler: FilterCompiler) -> Self {
        Self { registry, compiler }
    }

    pub fn compiler(&self) -> FilterCompiler {
        self.compiler.clone()
    }

    pub fn registry(&self) -> SchemaRegistry {
        self.registry.clone()
    }
}

/// Schema of a monitored host, the one most scenarios run against.
///
/// - `cpu.load` is a literal dotted name, `mem.used` a nested path
/// - `name` only permits equality and regex
/// - `ports` is an array of `{number, proto}` elements
pub fn monitoring_schema() -> FilterResult<FieldSchema> {
    let ports = FieldSchema::builder()
        .field("number", FieldSpec::new(FieldKind::Number))
        .field("proto", FieldSpec::new(FieldKind::String))
        .build()?;

    FieldSchema::builder()
        .field("status", FieldSpec::new(FieldKind::String))
        .field("name", FieldSpec::new(FieldKind::String).with_operators([Operator::Eq, Operator::Regex]))
        .field("age", FieldSpec::new(FieldKind::Number))
        .field("cpu.load", FieldSpec::new(FieldKind::Number))
        .field("mem.used", FieldSpec::new(FieldKind::Number).nested())
        .field("active", FieldSpec::new(FieldKind::Boolean))
        .field("created", FieldSpec::new(FieldKind::Timestamp))
        .field("tags", FieldSpec::new(FieldKind::Array))
        .field("ports", FieldSpec::new(FieldKind::Array).with_elements(ports))
        .build()
}

pub fn create_test_context() -> FilterResult<TestContext> {
    create_test_context_with(Limits::default())
}

pub fn create_test_context_with(limits: Limits) -> FilterResult<TestContext> {
    let registry = SchemaRegistry::new(monitoring_schema()?);
    let compiler = FilterCompiler::builder()
        .limits(limits)
        .schema_registry(registry.clone())
        .build()?;
    Ok(TestContext::new(registry, compiler))
}

pub fn cleanup(_ctx: TestContext) -> FilterResult<()> {
    Ok(())
}

/// A chain of `depth` levels: `depth - 1` NOT combinators around one atom.
pub fn nested_not(depth: usize) -> Rule {
    let mut rule = field("age").gt(1);
    for _ in 1..depth {
        rule = not(rule);
    }
    rule
}

/// A chain of `depth` levels built from single-child ANDs around one atom.
pub fn nested_and(depth: usize) -> Rule {
    let mut rule = field("status").eq("running");
    for _ in 1..depth {
        rule = and(vec![rule]);
    }
    rule
}

/// One AND holding `count` atoms.
pub fn wide_and(count: usize) -> Rule {
    and((0..count).map(|i| field("age").gt(i as i64)).collect())
}

/// One OR holding `count` atoms.
pub fn wide_or(count: usize) -> Rule {
    or((0..count).map(|i| field("age").eq(i as i64)).collect())
}

/// Fails the surrounding test unless `result` is an error of `kind`.
pub fn assert_kind<T: std::fmt::Debug>(result: FilterResult<T>, kind: ErrorKind) -> FilterError {
    match result {
        Ok(value) => panic!("expected {:?}, got Ok({:?})", kind, value),
        Err(err) => {
            assert_eq!(err.kind(), &kind, "unexpected error: {}", err);
            err
        }
    }
}
