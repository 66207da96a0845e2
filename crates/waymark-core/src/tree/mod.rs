//! Directory tree rendering.
//!
//! Produces a `tree`-style text view of a directory together with aggregate
//! counts:
//!
//! ```text
//! project/
//! ├── src/
//! │   ├── lib.rs (2.4 KB)
//! │   └── main.rs (312 B)
//! └── Cargo.toml (540 B)
//! ```
//!
//! Entries are sorted by name at every level and filtered by
//! [`EntryFilter`]. Descending past `max_depth` renders `...` in place of the
//! directory's contents.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{FsResultExt, Result, WorkflowError},
    params::TreeDirectory,
};

pub mod filter;

pub use filter::{EntryFilter, DEFAULT_EXCLUDES};

const MID: &str = "├── ";
const LAST: &str = "└── ";
const BAR: &str = "│   ";
const BLANK: &str = "    ";

/// Aggregate counts over the rendered entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeStats {
    pub directories: usize,
    pub files: usize,
    /// Sum of rendered file sizes in bytes
    pub total_size: u64,
    /// Entries rejected by any filter, each counted once
    pub excluded_items: usize,
}

/// A rendered tree and its statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeReport {
    /// Directory that was rendered, as requested
    pub path: String,
    pub tree: String,
    pub stats: TreeStats,
}

/// Renders the tree for `target`, labelling it with `label`.
///
/// # Errors
///
/// Returns `WorkflowError::NotFound` if `target` is not a directory and
/// `WorkflowError::InvalidInput` for malformed glob patterns.
pub fn render_tree(target: &Path, label: &str, params: &TreeDirectory) -> Result<TreeReport> {
    if !target.is_dir() {
        return Err(WorkflowError::path_not_found(target));
    }

    let filter = EntryFilter::from_params(params)?;
    let mut renderer = Renderer {
        filter,
        max_depth: params.max_depth,
        lines: vec![format!("{}/", root_name(target))],
        stats: TreeStats::default(),
    };

    let entries = sorted_entries(target).fs_context(target)?;
    renderer.render_entries(target, entries, "", 0);

    Ok(TreeReport {
        path: label.to_string(),
        tree: renderer.lines.join("\n"),
        stats: renderer.stats,
    })
}

/// Human-scaled size: bytes below 1 KiB, else KiB with one decimal.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

struct Renderer {
    filter: EntryFilter,
    max_depth: usize,
    lines: Vec<String>,
    stats: TreeStats,
}

struct Entry {
    name: String,
    is_dir: bool,
}

impl Renderer {
    fn render_dir(&mut self, dir: &Path, prefix: &str, depth: usize) {
        if depth > self.max_depth {
            self.lines.push(format!("{prefix}..."));
            return;
        }
        match sorted_entries(dir) {
            Ok(entries) => self.render_entries(dir, entries, prefix, depth),
            Err(e) => debug!("Skipping unreadable directory {}: {e}", dir.display()),
        }
    }

    fn render_entries(&mut self, dir: &Path, entries: Vec<Entry>, prefix: &str, depth: usize) {
        let mut visible = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.filter.admits(&entry.name, entry.is_dir) {
                visible.push(entry);
            } else {
                self.stats.excluded_items += 1;
            }
        }

        let count = visible.len();
        for (index, entry) in visible.into_iter().enumerate() {
            let is_last = index + 1 == count;
            let connector = if is_last { LAST } else { MID };
            let path = dir.join(&entry.name);

            if entry.is_dir {
                self.stats.directories += 1;
                self.lines.push(format!("{prefix}{connector}{}/", entry.name));
                let child_prefix = format!("{prefix}{}", if is_last { BLANK } else { BAR });
                self.render_dir(&path, &child_prefix, depth + 1);
            } else {
                self.stats.files += 1;
                let size = match fs::metadata(&path) {
                    Ok(meta) => {
                        self.stats.total_size += meta.len();
                        format_size(meta.len())
                    }
                    Err(_) => "unknown".to_string(),
                };
                self.lines
                    .push(format!("{prefix}{connector}{} ({size})", entry.name));
            }
        }
    }
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn root_name(target: &Path) -> String {
    target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.display().to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn render(dir: &Path, params: TreeDirectory) -> TreeReport {
        render_tree(dir, "", &params).expect("Failed to render tree")
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn test_hidden_entry_is_counted_as_excluded() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("visible.txt"), "hello").unwrap();
        fs::write(temp_dir.path().join(".secret"), "x").unwrap();

        let report = render(temp_dir.path(), TreeDirectory::default());
        assert_eq!(report.stats.files, 1);
        assert_eq!(report.stats.excluded_items, 1);
        assert_eq!(report.stats.total_size, 5);
        assert!(report.tree.ends_with("└── visible.txt (5 B)"));
    }

    #[test]
    fn test_connectors_and_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/inner")).unwrap();
        fs::write(root.join("a/inner/deep.txt"), "").unwrap();
        fs::write(root.join("a/x.txt"), "").unwrap();
        fs::write(root.join("b.txt"), "").unwrap();

        let report = render(root, TreeDirectory::default());
        let lines: Vec<_> = report.tree.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec![
                "├── a/",
                "│   ├── inner/",
                "│   │   └── deep.txt (0 B)",
                "│   └── x.txt (0 B)",
                "└── b.txt (0 B)",
            ]
        );
        assert_eq!(report.stats.directories, 2);
        assert_eq!(report.stats.files, 3);
    }

    #[test]
    fn test_depth_limit_renders_ellipsis() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("one/two/three")).unwrap();
        fs::write(root.join("one/two/three/buried.txt"), "data").unwrap();

        let report = render(
            root,
            TreeDirectory {
                max_depth: 1,
                ..Default::default()
            },
        );
        let lines: Vec<_> = report.tree.lines().skip(1).collect();
        assert_eq!(lines, vec!["└── one/", "    └── two/", "        ..."]);
        assert!(!report.tree.contains("buried.txt"));
        assert_eq!(report.stats.files, 0);
    }

    #[test]
    fn test_empty_directory_is_success() {
        let temp_dir = TempDir::new().unwrap();
        let report = render(temp_dir.path(), TreeDirectory::default());
        assert_eq!(report.tree.lines().count(), 1);
        assert!(report.tree.ends_with('/'));
        assert_eq!(report.stats, TreeStats::default());
    }

    #[test]
    fn test_files_hidden_when_requested() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("README.md"), "# hi").unwrap();

        let report = render(
            temp_dir.path(),
            TreeDirectory {
                show_files: false,
                ..Default::default()
            },
        );
        assert_eq!(report.stats.files, 0);
        assert_eq!(report.stats.directories, 1);
        assert_eq!(report.stats.excluded_items, 1);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = render_tree(
            &temp_dir.path().join("nope"),
            "nope",
            &TreeDirectory::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
