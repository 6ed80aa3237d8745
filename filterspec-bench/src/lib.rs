//! filterspec Benchmark Library
//!
//! Provides generated schemas, rule trees and documents for benchmarking the
//! parse, validate and compile pipeline and the field name codec.

pub mod config;
pub mod data_gen;

/// Installs `env_logger` once for a bench binary. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
