//! Bulk import and write-back drivers
//!
//! This module implements the two filesystem collaborators around the parser:
//! importing a folder of schema source files, and writing generated schema
//! text back to its source files with a backup of each original. Per-item
//! failures are collected into the report rather than aborting the batch.

use crate::error::{ModelForgeError, Result};
use crate::parser::{parse_model_definition, title_label, Dialect, Parent, Schema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Suffix appended to backup copies before overwriting
const BACKUP_SUFFIX: &str = ".backup";

/// One deduplicated parent-menu entry discovered during import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub name: String,
    pub label: String,
}

/// A schema imported from a file, with its origin for later write-back
#[derive(Debug, Clone, Serialize)]
pub struct ImportedModel {
    pub schema: Schema,
    pub source_file: PathBuf,
}

/// Result of a folder import
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    /// Successfully imported models
    pub models: Vec<ImportedModel>,
    /// Parent menus aggregated across results, deduplicated by name
    pub parent_menus: Vec<MenuEntry>,
    /// File names that could not be read or parsed
    pub failed_files: Vec<String>,
    /// Number of candidate files scanned
    pub total_files: usize,
}

impl ImportReport {
    /// Human-readable summary line
    pub fn message(&self) -> String {
        let mut message = format!("Imported {} models", self.models.len());
        if !self.parent_menus.is_empty() {
            message.push_str(&format!(
                ", discovered {} parent menus",
                self.parent_menus.len()
            ));
        }
        if !self.failed_files.is_empty() {
            message.push_str(&format!(
                "\nFailed files ({}): {}",
                self.failed_files.len(),
                self.failed_files.join(", ")
            ));
        }
        message
    }
}

/// Import every schema source file in a folder.
///
/// Candidate files are `.py` files not starting with `__`. Each is parsed
/// with the literal/JSON dialect forced; unreadable files land in
/// `failed_files` and never abort the batch.
pub fn import_folder(folder: &Path) -> Result<ImportReport> {
    if !folder.exists() {
        return Err(ModelForgeError::NotFound(format!(
            "folder does not exist: {}",
            folder.display()
        )));
    }
    if !folder.is_dir() {
        return Err(ModelForgeError::InvalidInput(format!(
            "path is not a folder: {}",
            folder.display()
        )));
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_schema_source(path))
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        return Err(ModelForgeError::NotFound(format!(
            "no schema source files in folder: {}",
            folder.display()
        )));
    }

    let mut report = ImportReport {
        total_files: candidates.len(),
        ..ImportReport::default()
    };

    for path in candidates {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed to read schema source");
                report.failed_files.push(file_name);
                continue;
            }
        };

        // The literal/JSON path never yields a multi-schema outcome
        let outcome = parse_model_definition(&content, Some(Dialect::LiteralOrJson));
        for schema in outcome.into_schemas() {
            collect_parent(&schema.parent, &mut report.parent_menus);
            report.models.push(ImportedModel {
                schema,
                source_file: path.clone(),
            });
        }
    }

    Ok(report)
}

fn is_schema_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".py") && !name.starts_with("__")
}

/// Record a schema's parent menu, deduplicating by name.
fn collect_parent(parent: &Parent, menus: &mut Vec<MenuEntry>) {
    let entry = match parent {
        Parent::Name(name) if !name.is_empty() => MenuEntry {
            name: name.clone(),
            label: title_label(name),
        },
        Parent::Menu { name, label } if !name.is_empty() => MenuEntry {
            name: name.clone(),
            label: label.clone().unwrap_or_else(|| title_label(name)),
        },
        _ => return,
    };
    if !menus.iter().any(|m| m.name == entry.name) {
        menus.push(entry);
    }
}

/// One write-back request
#[derive(Debug, Clone, Deserialize)]
pub struct SyncItem {
    /// File to overwrite
    pub file_path: PathBuf,
    /// New schema source text
    pub content: String,
    /// Model name used in the report details
    pub model_name: String,
}

/// Result of a write-back batch
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub success_count: usize,
    pub failed_count: usize,
    /// One line per item, in input order
    pub details: Vec<String>,
}

impl SyncReport {
    /// Human-readable summary line
    pub fn message(&self) -> String {
        format!(
            "Sync finished: {} succeeded, {} failed",
            self.success_count, self.failed_count
        )
    }
}

/// Write generated schema text back to its source files.
///
/// Each original is copied to `<path>.backup` before being overwritten. The
/// parser is never invoked here.
pub fn write_back(items: &[SyncItem]) -> SyncReport {
    let mut report = SyncReport::default();

    for item in items {
        match write_one(item) {
            Ok(()) => {
                report.success_count += 1;
                report
                    .details
                    .push(format!("✓ {}: synced", item.model_name));
            }
            Err(err) => {
                warn!(file = %item.file_path.display(), error = %err, "write-back failed");
                report.failed_count += 1;
                report
                    .details
                    .push(format!("✗ {}: {}", item.model_name, err));
            }
        }
    }

    report
}

fn write_one(item: &SyncItem) -> Result<()> {
    if item.content.is_empty() {
        return Err(ModelForgeError::InvalidInput(
            "missing schema content".to_string(),
        ));
    }
    if !item.file_path.exists() {
        return Err(ModelForgeError::NotFound(format!(
            "file does not exist: {}",
            item.file_path.display()
        )));
    }

    let mut backup_path = item.file_path.clone().into_os_string();
    backup_path.push(BACKUP_SUFFIX);
    fs::copy(&item.file_path, PathBuf::from(backup_path))?;

    fs::write(&item.file_path, &item.content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_import_folder_collects_models_and_menus() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("user.py"),
            "schema = {\n  'name': 'user',\n  'parent': 'system',\n  'fields': [],\n}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("role.py"),
            "schema = {\n  'name': 'role',\n  'parent': {'name': 'system', 'label': 'System'},\n  'fields': [],\n}\n",
        )
        .unwrap();
        fs::write(dir.path().join("__init__.py"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();

        let report = import_folder(dir.path()).unwrap();
        assert_eq!(report.total_files, 2);
        assert_eq!(report.models.len(), 2);
        assert!(report.failed_files.is_empty());

        // "system" appears twice but is deduplicated
        assert_eq!(
            report.parent_menus,
            vec![MenuEntry {
                name: "system".to_string(),
                label: "System".to_string()
            }]
        );
    }

    #[test]
    fn test_bare_parent_label_is_title_cased() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("profile.py"),
            "schema = {\n  'name': 'profile',\n  'parent': 'user_center',\n  'fields': [],\n}\n",
        )
        .unwrap();

        let report = import_folder(dir.path()).unwrap();
        // Underscores become spaces: "user_center" -> "User Center"
        assert_eq!(
            report.parent_menus,
            vec![MenuEntry {
                name: "user_center".to_string(),
                label: "User Center".to_string()
            }]
        );
    }

    #[test]
    fn test_import_missing_folder() {
        assert!(import_folder(Path::new("/nonexistent/folder")).is_err());
    }

    #[test]
    fn test_import_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_folder(dir.path()).is_err());
    }

    #[test]
    fn test_write_back_creates_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("model.py");
        fs::write(&target, "old content").unwrap();

        let report = write_back(&[SyncItem {
            file_path: target.clone(),
            content: "new content".to_string(),
            model_name: "model".to_string(),
        }]);

        assert_eq!(report.success_count, 1);
        assert_eq!(report.failed_count, 0);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new content");
        assert_eq!(
            fs::read_to_string(dir.path().join("model.py.backup")).unwrap(),
            "old content"
        );
    }

    #[test]
    fn test_write_back_reports_per_item_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.py");
        fs::write(&good, "x").unwrap();

        let report = write_back(&[
            SyncItem {
                file_path: good,
                content: "y".to_string(),
                model_name: "good".to_string(),
            },
            SyncItem {
                file_path: dir.path().join("missing.py"),
                content: "y".to_string(),
                model_name: "missing".to_string(),
            },
            SyncItem {
                file_path: dir.path().join("empty.py"),
                content: String::new(),
                model_name: "empty".to_string(),
            },
        ]);

        assert_eq!(report.success_count, 1);
        assert_eq!(report.failed_count, 2);
        assert_eq!(report.details.len(), 3);
        assert!(report.details[0].starts_with('✓'));
        assert!(report.details[1].starts_with('✗'));
    }
}
