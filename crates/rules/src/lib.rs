//! Custom feature source: declarative match rules evaluated against the host.
//!
//! This crate provides:
//! - YAML schema for feature specs with strict (unknown-field rejecting) decoding
//! - Leaf probes for PCI/USB ids, kernel modules, CPU flags, kernel config, hostname
//! - The match algebra (AND within a rule set, OR across alternatives)
//! - A loader for the mounted custom config directory, with change watching
//! - Config merging (built-in, runtime, directory) and the `custom` feature source

pub mod defaults;
pub mod evaluator;
pub mod loader;
pub mod merge;
pub mod probes;
pub mod schema;
pub mod source;

pub use source::{CustomConfig, CustomSource, SOURCE_NAME};
