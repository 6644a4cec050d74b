#![warn(missing_docs)]
//! # mediaguard-contract-tests
//!
//! Loads the frozen JSON schemas and fixtures under `contracts/` so the
//! validation tests share one lookup path.

use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde_json::Value;

/// Returns the workspace `contracts/` directory.
pub fn contracts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../contracts")
}

/// Returns the path of `contracts/<name>.schema.json`.
pub fn schema_path(name: &str) -> PathBuf {
    contracts_dir().join(format!("{name}.schema.json"))
}

/// Returns the path of `contracts/fixtures/<name>.valid.json`.
pub fn fixture_path(name: &str) -> PathBuf {
    contracts_dir()
        .join("fixtures")
        .join(format!("{name}.valid.json"))
}

/// Reads and parses one JSON file.
///
/// # Panics
/// Panics when the file is missing or not JSON; contract files are test
/// inputs and must exist.
pub fn load_json(path: &Path) -> Value {
    let raw = std::fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("{} should be readable: {error}", path.display()));
    serde_json::from_str(&raw)
        .unwrap_or_else(|error| panic!("{} should be valid json: {error}", path.display()))
}

/// Compiles the named schema.
///
/// # Panics
/// Panics when the schema does not compile.
pub fn compile_validator(name: &str) -> JSONSchema {
    let schema = load_json(&schema_path(name));
    JSONSchema::compile(&schema)
        .unwrap_or_else(|error| panic!("schema '{name}' should compile: {error}"))
}

/// Collects validation error messages for `instance`.
pub fn validation_errors(validator: &JSONSchema, instance: &Value) -> Vec<String> {
    match validator.validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|error| error.to_string()).collect(),
    }
}
