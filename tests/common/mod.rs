//! Shared test harness for YAML-described validation cases.
//!
//! Cases live under `tests/cases/` and look like:
//!
//! ```yaml
//! - name: "koch curve, one round"
//!   grammar:
//!     axiom: F
//!     rules: "F:F+F-F-F+F"
//!   depth: 1
//!   candidate: "F+F-F-F+F"
//!   expect: accepted
//!   reason: no_transition   # optional, rejected cases only
//!   free_constants: false   # optional
//!   step_limit: 10          # optional
//!   skip: false             # optional
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lsys::automaton::{
    AutomatonBuilder, ConstantMatching, PdaValidator, Rejection, ValidatorConfig, Verdict,
};
use lsys::grammar::definition::LsystemDefinition;
use serde::Deserialize;
use walkdir::WalkDir;

// =============================================================================
// CORE TYPES
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationCase {
    pub name: String,
    pub grammar: LsystemDefinition,
    pub depth: u32,
    pub candidate: String,
    pub expect: Expectation,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub free_constants: bool,
    #[serde(default)]
    pub step_limit: Option<u64>,
    #[serde(default)]
    pub skip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Accepted,
    Rejected,
}

// =============================================================================
// DISCOVERY AND LOADING
// =============================================================================

/// All YAML files under `root`, sorted for stable reporting.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

pub fn load_test_cases(path: &Path) -> Vec<ValidationCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse YAML in {}: {}", path.display(), e))
}

pub fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cases")
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Short name of a rejection reason, as written in case files.
pub fn reason_name(reason: &Rejection) -> &'static str {
    match reason {
        Rejection::InvalidSymbol { .. } => "invalid_symbol",
        Rejection::NoTransition { .. } => "no_transition",
        Rejection::Incomplete { .. } => "incomplete",
        Rejection::StepLimitExceeded { .. } => "step_limit",
    }
}

/// Runs one case, describing the mismatch on failure.
pub fn run_case(case: &ValidationCase) -> Result<(), String> {
    let grammar = case
        .grammar
        .grammar()
        .map_err(|e| format!("grammar does not build: {e}"))?;
    let mode = if case.free_constants {
        ConstantMatching::Free
    } else {
        ConstantMatching::Anchored
    };
    let table = AutomatonBuilder::new(&grammar, case.depth)
        .constant_matching(mode)
        .build();
    let config = ValidatorConfig {
        step_limit: case.step_limit,
        record_trace: false,
    };
    let verdict = PdaValidator::with_config(&table, config).validate(&case.candidate);

    match (case.expect, &verdict) {
        (Expectation::Accepted, Verdict::Accepted) => Ok(()),
        (Expectation::Rejected, Verdict::Rejected(reason)) => match &case.reason {
            Some(expected) if expected != reason_name(reason) => {
                Err(format!("expected {expected}, got {reason}"))
            }
            _ => Ok(()),
        },
        (expected, actual) => Err(format!("expected {expected:?}, got {actual}")),
    }
}
