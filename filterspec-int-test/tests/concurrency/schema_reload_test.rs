//! A shared compiler keeps working while its schema is swapped underneath.

use filterspec::errors::ErrorKind;
use filterspec::rule::{and, field};
use filterspec::schema::{FieldKind, FieldSchema, FieldSpec};
use filterspec_int_test::test_util::{assert_kind, cleanup, create_test_context, monitoring_schema, run_test};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn schema_without_status() -> FieldSchema {
    FieldSchema::builder()
        .field("age", FieldSpec::new(FieldKind::Number))
        .field("cpu.load", FieldSpec::new(FieldKind::Number))
        .build()
        .expect("schema builds")
}

#[test]
fn test_swap_changes_what_is_allowed() {
    run_test(
        create_test_context,
        |ctx| {
            let compiler = ctx.compiler();
            let registry = ctx.registry();
            let rule = field("status").eq("running");

            compiler.validate(&rule)?;
            let previous = registry.swap(schema_without_status());
            assert!(previous.lookup("status").is_some());
            assert_eq!(registry.generation(), 1);
            assert_kind(compiler.validate(&rule), ErrorKind::FieldNotAllowed);

            registry.swap(monitoring_schema()?);
            compiler.validate(&rule)?;
            assert_eq!(registry.generation(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_snapshot_outlives_swap() {
    run_test(
        create_test_context,
        |ctx| {
            let registry = ctx.registry();
            let snapshot = registry.snapshot();
            registry.swap(schema_without_status());

            assert!(snapshot.lookup("status").is_some());
            assert!(registry.snapshot().lookup("status").is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_compile_during_reload() {
    run_test(
        create_test_context,
        |ctx| {
            let stop = Arc::new(AtomicBool::new(false));
            // cpu.load is in both schemas, status only in one
            let stable = and(vec![field("cpu.load").gt(50), field("age").lt(90)]);
            let flapping = field("status").eq("running");

            let reloader = {
                let registry = ctx.registry();
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    let mut swaps = 0u64;
                    while !stop.load(Ordering::Relaxed) {
                        if swaps % 2 == 0 {
                            registry.swap(schema_without_status());
                        } else if let Ok(schema) = monitoring_schema() {
                            registry.swap(schema);
                        }
                        swaps += 1;
                        thread::yield_now();
                    }
                    swaps
                })
            };

            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let compiler = ctx.compiler();
                    let stable = stable.clone();
                    let flapping = flapping.clone();
                    thread::spawn(move || {
                        for _ in 0..500 {
                            // must always compile, whichever schema is current
                            let filter = compiler.compile(&stable).map_err(|e| e.to_string())?;
                            if filter.len() != 1 {
                                return Err(format!("unexpected filter {}", filter));
                            }
                            // either compiles or is cleanly rejected, never an internal error
                            if let Err(e) = compiler.compile(&flapping) {
                                if e.kind() != &ErrorKind::FieldNotAllowed {
                                    return Err(e.to_string());
                                }
                            }
                        }
                        Ok::<(), String>(())
                    })
                })
                .collect();

            for worker in workers {
                let result = worker.join().expect("worker panicked");
                assert_eq!(result, Ok(()));
            }
            stop.store(true, Ordering::Relaxed);
            let swaps = reloader.join().expect("reloader panicked");
            assert_eq!(ctx.registry().generation(), swaps);
            Ok(())
        },
        cleanup,
    )
}
