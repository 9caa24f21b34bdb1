//! Filesystem loader for dynamically supplied feature specs.
//!
//! Reads the custom config directory (typically a mounted ConfigMap) and
//! decodes each file as a list of feature specs. A watcher can signal
//! directory changes so the worker rediscovers early.

mod core;
mod error;
mod watcher;


pub use self::core::SpecLoader;
pub use self::error::{LoadError, LoadReport, LoadResult, LoadStatus, Result};
pub use self::watcher::watch_dir;
