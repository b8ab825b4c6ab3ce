//! # File I/O Module
//!
//! Project input files in, estimate reports out.
//!
//! - **Version validation**: project files carry a schema version
//! - **Atomic saves**: reports are written to a `.tmp` file, synced, then renamed
//!
//! A report is the project JSON with its result slots filled. Loading a
//! report back as a project ignores those slots, so every run starts clean.
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::file_io::{load_project, report_path_for, save_report};
//! use std::path::Path;
//!
//! let input = Path::new("house.json");
//! let project = load_project(input)?;
//! save_report(&project, &report_path_for(input))?;
//! # Ok::<(), estimate_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, ProjectInputs, SCHEMA_VERSION};

/// Save a report with atomic write semantics.
///
/// 1. Serialize project to JSON
/// 2. Write to `<path>.tmp`
/// 3. Sync to disk
/// 4. Rename over `path`
pub fn save_report(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let tmp_error = |operation: &str, e: std::io::Error| {
        CalcError::file_error(operation, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| tmp_error("create temp file", e))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| tmp_error("write temp file", e))?;

    tmp_file
        .sync_all()
        .map_err(|e| tmp_error("sync temp file", e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), "saved estimate report");
    Ok(())
}

/// Load a project input file.
///
/// # Returns
///
/// * `Ok(Project)` - inputs loaded, results empty
/// * `Err(CalcError::VersionMismatch)` - file version is incompatible
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;

    tracing::debug!(path = %path.display(), project = %project.meta.id, "loaded project");
    Ok(project)
}

/// Load either a full project file or a bare inputs object.
///
/// A file without a `meta` header is read as [`ProjectInputs`] and wrapped in
/// a fresh project with empty client and site labels.
pub fn load_project_or_inputs(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    if value.get("meta").is_some() {
        return load_project(path);
    }

    let inputs: ProjectInputs =
        serde_json::from_value(value).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid project inputs in {}: {}", path.display(), e),
        })?;
    tracing::debug!(path = %path.display(), "loaded bare project inputs");
    Ok(Project::new("", "", inputs))
}

/// `house.json` → `house.report.json`
pub fn report_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    input.with_file_name(format!("{}.report.json", stem))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Major must match; on 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parts = |version: &str| -> Vec<u32> {
        version.split('.').filter_map(|p| p.parse().ok()).collect()
    };
    let file_parts = parts(file_version);
    let current_parts = parts(SCHEMA_VERSION);

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
