//! Core [`SpecLoader`] struct: reads feature specs from a mounted config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::schema::FeatureSpec;

use super::error::{LoadError, LoadReport, LoadResult, LoadStatus, Result};

/// Loads custom feature specs from a directory of YAML files.
///
/// Every regular, non-hidden file is decoded as a strict YAML list of
/// [`FeatureSpec`]. Subdirectories are not descended into. Files are visited
/// in file-name order so the merged list is reproducible.
#[derive(Debug, Clone)]
pub struct SpecLoader {
    config_dir: PathBuf,
}

impl SpecLoader {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Scan the directory and load every eligible file.
    ///
    /// Never fails: a missing directory yields an empty report, and any other
    /// directory error is logged and treated as zero contribution. Per-file
    /// errors are recorded in the report and logged.
    pub fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();

        let entries = match fs::read_dir(&self.config_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.config_dir.display(), "custom config directory does not exist");
                return report;
            }
            Err(e) => {
                error!(path = %self.config_dir.display(), error = %e, "unable to access custom config directory");
                return report;
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => {
                    error!(path = %self.config_dir.display(), error = %e, "failed to list custom config directory");
                    return report;
                }
            }
        }
        paths.sort();

        for path in paths {
            let status = self.load_entry(&path);
            report.results.push(LoadResult { path, status });
        }

        info!(
            path = %self.config_dir.display(),
            loaded = report.loaded_files(),
            failed = report.failed_files(),
            skipped = report.skipped_entries(),
            "scanned custom config directory"
        );
        report
    }

    fn load_entry(&self, path: &Path) -> LoadStatus {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if hidden {
            debug!(path = %path.display(), "skipping hidden file");
            return LoadStatus::Skipped {
                reason: "hidden file".to_string(),
            };
        }

        // Follows symlinks: ConfigMap mounts expose files as links into `..data`.
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {
                debug!(path = %path.display(), "skipping directory");
                return LoadStatus::Skipped {
                    reason: "directory".to_string(),
                };
            }
            Ok(meta) if !meta.is_file() => {
                return LoadStatus::Skipped {
                    reason: "not a regular file".to_string(),
                };
            }
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not stat custom config file");
                return LoadStatus::Failed {
                    error: LoadError::Io(e).to_string(),
                };
            }
        }

        match self.load_file(path) {
            Ok(specs) => {
                debug!(path = %path.display(), count = specs.len(), "loaded custom feature specs");
                LoadStatus::Loaded { specs }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not parse custom config file");
                LoadStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Read and strictly decode one file into its list of specs.
    pub fn load_file(&self, path: &Path) -> Result<Vec<FeatureSpec>> {
        let contents = fs::read_to_string(path)?;
        let specs = FeatureSpec::parse_list(&contents)?;

        for spec in &specs {
            spec.validate().map_err(LoadError::Validation)?;
        }
        Ok(specs)
    }
}
