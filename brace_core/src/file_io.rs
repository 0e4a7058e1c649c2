//! # File I/O Module
//!
//! Project files are pretty-printed JSON of [`Project`].
//!
//! - **Atomic saves**: write to `<file>.tmp`, fsync, rename over the target
//! - **Version validation**: the file's schema version must be readable by
//!   this build
//! - **Derived totals**: level totals are recomputed on load, so a hand-edited
//!   file cannot carry inconsistent totals
//!
//! ## Example
//!
//! ```rust,no_run
//! use brace_core::file_io::{load_project, save_project};
//! use brace_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Smith Residence");
//! let path = Path::new("smith.json");
//!
//! save_project(&project, path)?;
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.meta.project_name, "Smith Residence");
//! # Ok::<(), brace_core::errors::CalcError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// `<file>.tmp` next to the target
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save a project with atomic write semantics.
///
/// 1. Serialize the project to JSON
/// 2. Write to a temporary file next to the target
/// 3. Sync to disk
/// 4. Rename over the target
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "project saved");
    Ok(())
}

/// Load a project and refresh its level totals.
///
/// # Errors
///
/// * `FileError` - the file cannot be read
/// * `SerializationError` - the file is not a valid project
/// * `VersionMismatch` - the schema version is not supported
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let mut project: Project = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid project file {}: {}", path.display(), e),
    })?;

    validate_version(&project.meta.version)?;
    project.recalculate_level_weights();

    tracing::debug!(
        path = %path.display(),
        levels = project.levels.len(),
        assemblies = project.assemblies.len(),
        "project loaded"
    );
    Ok(project)
}

/// Major versions must match; within 0.x a newer minor version is rejected.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("brace_test_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_tmp_path_appends_extension() {
        assert_eq!(
            tmp_path_for(Path::new("/jobs/smith.json")),
            Path::new("/jobs/smith.json.tmp")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let mut project = Project::new("Round Trip");
        project.meta.job_number = "J-042".into();
        let level = project.levels[0].id;
        project.place_predefined_part(level, "Floor - NZS3604").unwrap();
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded, project);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_project_path("atomic");
        save_project(&Project::new("Atomic"), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_refreshes_level_totals() {
        let path = temp_project_path("totals");
        let mut project = Project::new("Totals");
        let level = project.levels[0].id;
        project.place_predefined_part(level, "Floor - NZS3604").unwrap();
        project.levels[0].total_level_weight_kn = 999.0;
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert!((loaded.levels[0].total_level_weight_kn - 22.5).abs() < 1e-9);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_errors() {
        let missing = temp_project_path("missing");
        assert_eq!(load_project(&missing).unwrap_err().error_code(), "FILE_ERROR");

        let garbage = temp_project_path("garbage");
        fs::write(&garbage, "{ not json").unwrap();
        assert_eq!(load_project(&garbage).unwrap_err().error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&garbage);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
