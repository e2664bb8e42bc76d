//! Project detector
//!
//! Walks the project tree (honoring .gitignore), maps file extensions to
//! languages, and splits each language's files into production source and
//! test files. The resulting [`ProjectInfo`] is the single input the
//! analysis engine works from.

use crate::extract::is_test_file;
use crate::models::{Language, LanguageInfo, ProjectInfo};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Vendored and generated trees that never count as project source.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    "target",
    ".tox",
    ".nox",
];

/// Inventory the project under `root`.
pub fn detect_project(root: &Path) -> Result<ProjectInfo> {
    let root = root
        .canonicalize()
        .with_context(|| format!("project root {} not accessible", root.display()))?;

    let mut by_language: FxHashMap<Language, LanguageInfo> = FxHashMap::default();
    let mut total_files = 0usize;
    let mut total_loc = 0usize;

    let walker = WalkBuilder::new(&root)
        .hidden(false)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !SKIP_DIRS.contains(&name))
                .unwrap_or(true)
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "walk error");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.into_path();
        let Some(language) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
        else {
            continue;
        };

        let loc = match std::fs::read_to_string(&path) {
            Ok(content) if !content.contains('\0') => content.lines().count(),
            Ok(_) => {
                warn!(path = %path.display(), "skipping binary file");
                continue;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };

        let info = by_language
            .entry(language)
            .or_insert_with(|| LanguageInfo::new(language));
        total_files += 1;
        total_loc += loc;
        if is_test_file(&path, language) {
            info.test_files.push(path);
        } else {
            info.total_loc += loc;
            info.files.push(path);
        }
    }

    let mut languages: Vec<LanguageInfo> = by_language.into_values().collect();
    // Largest language first; deterministic output for equal sizes.
    languages.sort_by(|a, b| {
        b.total_loc
            .cmp(&a.total_loc)
            .then_with(|| a.language.as_str().cmp(b.language.as_str()))
    });
    for info in &mut languages {
        info.files.sort();
        info.test_files.sort();
    }

    let name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string();

    debug!(
        name = %name,
        languages = languages.len(),
        files = total_files,
        loc = total_loc,
        "project detected"
    );

    Ok(ProjectInfo {
        root_path: root,
        name,
        languages,
        total_files,
        total_loc,
    })
}
