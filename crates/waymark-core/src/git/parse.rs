//! Line parsers for git porcelain and log output.

use super::{
    Branch, BranchKind, BranchList, Commit, FileChange, FileDiff, Hunk, LineCounts,
    StatusChanges, UntrackedFile,
};

/// Separates commits in the custom log format.
pub const RECORD_SEP: &str = "%x1e";
/// Separates fields of one commit in the custom log format.
pub const UNIT_SEP: &str = "%x1f";

const RECORD: char = '\x1e';
const UNIT: char = '\x1f';

/// Parses `git status --porcelain=v1 -b` into the branch name and changes.
pub fn parse_status(output: &str) -> (String, StatusChanges) {
    let mut branch = String::new();
    let mut changes = StatusChanges::default();

    for line in output.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            branch = branch_from_header(header);
            continue;
        }
        if let Some(path) = line.strip_prefix("?? ") {
            changes.untracked.push(UntrackedFile {
                file: path.trim().to_string(),
            });
            continue;
        }

        let mut codes = line.chars();
        let (Some(index), Some(worktree)) = (codes.next(), codes.next()) else {
            continue;
        };
        let Some(path) = line.get(3..).map(str::trim).filter(|p| !p.is_empty()) else {
            continue;
        };
        let file = path
            .split_once(" -> ")
            .map_or(path, |(_, new)| new)
            .to_string();

        if index != ' ' && index != '?' {
            changes.staged.push(FileChange {
                status: index.to_string(),
                file: file.clone(),
            });
        }
        if worktree != ' ' && worktree != '?' {
            changes.not_staged.push(FileChange {
                status: worktree.to_string(),
                file,
            });
        }
    }

    (branch, changes)
}

fn branch_from_header(header: &str) -> String {
    let header = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
        .unwrap_or(header);
    let end = header.find("...").or_else(|| header.find(' '));
    match end {
        Some(end) => header[..end].to_string(),
        None => header.to_string(),
    }
}

/// Parses log output produced with the `RECORD_SEP`/`UNIT_SEP` format.
pub fn parse_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD)
        .filter_map(|record| {
            let mut lines = record.lines();
            let header = lines.next()?;
            let fields: Vec<&str> = header.split(UNIT).collect();
            let [hash, author_name, author_email, date, message] = fields.as_slice() else {
                return None;
            };
            Some(Commit {
                hash: hash.to_string(),
                author_name: author_name.to_string(),
                author_email: author_email.to_string(),
                date: date.to_string(),
                message: message.to_string(),
                stats: lines
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

/// Parses `git branch` output, with or without `-a`.
pub fn parse_branches(output: &str) -> BranchList {
    let mut current_branch = None;
    let mut branches = Vec::new();

    for line in output.lines() {
        if line.len() < 3 || line.contains(" -> ") {
            continue;
        }
        let is_current = line.starts_with('*');
        let name = line[2..].trim();
        if name.is_empty() {
            continue;
        }
        let (name, kind) = match name.strip_prefix("remotes/") {
            Some(remote) => (remote, BranchKind::Remote),
            None => (name, BranchKind::Local),
        };
        if is_current {
            current_branch = Some(name.to_string());
        }
        branches.push(Branch {
            name: name.to_string(),
            is_current,
            kind,
        });
    }

    BranchList {
        current_branch,
        branches,
    }
}

/// Parses unified diff output into per-file hunks and line counts.
pub fn parse_diff(output: &str) -> Vec<FileDiff> {
    let mut files: Vec<FileDiff> = Vec::new();

    for line in output.lines() {
        if let Some(paths) = line.strip_prefix("diff --git ") {
            let (old_file, new_file) = split_diff_paths(paths);
            files.push(FileDiff {
                old_file,
                new_file,
                changes: LineCounts::default(),
                hunks: Vec::new(),
            });
            continue;
        }
        let Some(file) = files.last_mut() else {
            continue;
        };
        if line.starts_with("@@") {
            file.hunks.push(Hunk {
                header: line.to_string(),
                lines: Vec::new(),
            });
            continue;
        }
        // Lines before the first hunk are file headers.
        let Some(hunk) = file.hunks.last_mut() else {
            continue;
        };
        if line.starts_with('+') {
            file.changes.insertions += 1;
        } else if line.starts_with('-') {
            file.changes.deletions += 1;
        }
        hunk.lines.push(line.to_string());
    }

    files
}

fn split_diff_paths(paths: &str) -> (String, String) {
    match paths.split_once(" b/") {
        Some((old, new)) => (
            old.strip_prefix("a/").unwrap_or(old).to_string(),
            new.to_string(),
        ),
        None => (paths.to_string(), paths.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classifies_entries() {
        let output = "## main...origin/main [ahead 1]\n\
                      M  staged.rs\n \
                      M unstaged.rs\n\
                      MM both.rs\n\
                      R  old.rs -> new.rs\n\
                      ?? notes.txt\n";
        let (branch, changes) = parse_status(output);
        assert_eq!(branch, "main");

        let staged: Vec<_> = changes.staged.iter().map(|c| c.file.as_str()).collect();
        assert_eq!(staged, vec!["staged.rs", "both.rs", "new.rs"]);

        let not_staged: Vec<_> = changes.not_staged.iter().map(|c| c.file.as_str()).collect();
        assert_eq!(not_staged, vec!["unstaged.rs", "both.rs"]);
        assert_eq!(changes.not_staged[0].status, "M");

        assert_eq!(changes.untracked.len(), 1);
        assert_eq!(changes.untracked[0].file, "notes.txt");
    }

    #[test]
    fn test_status_branch_without_commits() {
        let (branch, changes) = parse_status("## No commits yet on trunk\n");
        assert_eq!(branch, "trunk");
        assert!(changes.staged.is_empty());
    }

    #[test]
    fn test_branch_current_marker_and_remotes() {
        let output = "* main\n  feature/x\n  remotes/origin/HEAD -> origin/main\n  remotes/origin/main\n";
        let list = parse_branches(output);
        assert_eq!(list.current_branch.as_deref(), Some("main"));
        assert_eq!(list.branches.len(), 3);
        assert!(list.branches[0].is_current);
        assert_eq!(list.branches[1].kind, BranchKind::Local);
        assert_eq!(list.branches[2].name, "origin/main");
        assert_eq!(list.branches[2].kind, BranchKind::Remote);
    }

    #[test]
    fn test_log_records_and_stats() {
        let output = "\x1eabc123\x1fAda\x1fada@example.com\x1f2024-05-01T10:00:00+00:00\x1fAdd parser\n\
                      \n src/lib.rs | 4 ++--\n 1 file changed, 2 insertions(+), 2 deletions(-)\n\
                      \x1edef456\x1fGrace\x1fgrace@example.com\x1f2024-04-30T09:00:00+00:00\x1fInitial commit\n";
        let commits = parse_log(output);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "abc123");
        assert_eq!(commits[0].author_email, "ada@example.com");
        assert_eq!(commits[0].stats.len(), 2);
        assert_eq!(commits[1].message, "Initial commit");
        assert!(commits[1].stats.is_empty());
    }

    #[test]
    fn test_diff_hunks_and_counts() {
        let output = "diff --git a/src/lib.rs b/src/lib.rs\n\
                      index 1111111..2222222 100644\n\
                      --- a/src/lib.rs\n\
                      +++ b/src/lib.rs\n\
                      @@ -1,3 +1,3 @@\n \
                      fn main() {\n\
                      -    old();\n\
                      +    new();\n\
                      +    extra();\n \
                      }\n\
                      diff --git a/README.md b/README.md\n\
                      @@ -1 +0,0 @@\n\
                      -# Title\n";
        let files = parse_diff(output);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].old_file, "src/lib.rs");
        assert_eq!(files[0].new_file, "src/lib.rs");
        assert_eq!(files[0].changes.insertions, 2);
        assert_eq!(files[0].changes.deletions, 1);
        assert_eq!(files[0].hunks.len(), 1);
        assert_eq!(files[0].hunks[0].header, "@@ -1,3 +1,3 @@");
        assert_eq!(files[0].hunks[0].lines.len(), 5);
        assert_eq!(files[1].changes.deletions, 1);
    }

    #[test]
    fn test_unrecognized_lines_are_dropped() {
        assert!(parse_diff("warning: something odd\n").is_empty());
        assert!(parse_log("not a log line\n").is_empty());
        let (_, changes) = parse_status("x\n");
        assert_eq!(changes, StatusChanges::default());
    }
}
