//! Benchmark configuration

use filterspec::config::Limits;

/// Benchmark category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkCategory {
    Parse,
    Validate,
    Compile,
    Pipeline,
    Codec,
    Concurrency,
}

impl std::fmt::Display for BenchmarkCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchmarkCategory::Parse => write!(f, "Parse"),
            BenchmarkCategory::Validate => write!(f, "Validate"),
            BenchmarkCategory::Compile => write!(f, "Compile"),
            BenchmarkCategory::Pipeline => write!(f, "Pipeline"),
            BenchmarkCategory::Codec => write!(f, "Codec"),
            BenchmarkCategory::Concurrency => write!(f, "Concurrency"),
        }
    }
}

/// Configuration for benchmark runs
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Atom counts of the generated rule trees
    pub atom_counts: Vec<usize>,
    /// Maximum nesting depth of the generated rule trees
    pub max_depth: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            atom_counts: vec![1, 10, 50, 100],
            max_depth: 5,
        }
    }
}

impl BenchmarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quick config with smaller trees for fast testing
    pub fn quick() -> Self {
        Self {
            atom_counts: vec![1, 10],
            ..Default::default()
        }
    }

    /// Limits that every generated tree fits in.
    pub fn limits(&self) -> Limits {
        let max_conditions = self.atom_counts.iter().copied().max().unwrap_or(1).max(1);
        Limits {
            max_depth: self.max_depth,
            max_conditions,
            // flat levels of a generated tree can hold every atom in one OR
            max_or_rules: 0,
            ..Limits::default()
        }
    }
}
