//! Information gathering: typed sources and their collection.

use std::fs;
use std::path::Path;

use log::{debug, info};
use walkdir::WalkDir;

use super::{now, resolve_against, Workflow};
use crate::{
    error::Result,
    models::{
        GatherSummary, GatheredInformation, Instruction, InstructionStatus, SearchMatch,
        SourceContent, SourceResult, WorkflowStep,
    },
    params::{split_command_line, GatherInformation, SourceSpec},
    runner::CommandRunner,
};

/// A source descriptor resolved into the one thing it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRequest {
    /// Full text of a file
    File { path: String },
    /// Sorted entry names of a directory
    Directory { path: String },
    /// Stdout of a whitespace-split command line
    Command { query: String },
    /// Files under the project root containing a literal string
    Search { query: String },
    /// Unknown type, or a known type missing its required field
    Unsupported { source_type: String },
}

impl SourceRequest {
    /// Resolves a raw descriptor. Required fields must be non-empty.
    pub fn from_spec(spec: &SourceSpec) -> Self {
        let path = spec.path.clone().filter(|p| !p.is_empty());
        let query = spec.query.clone().filter(|q| !q.is_empty());

        match (spec.source_type.as_deref(), path, query) {
            (Some("file"), Some(path), _) => SourceRequest::File { path },
            (Some("directory"), Some(path), _) => SourceRequest::Directory { path },
            (Some("command"), _, Some(query)) => SourceRequest::Command { query },
            (Some("search"), _, Some(query)) => SourceRequest::Search { query },
            (source_type, _, _) => SourceRequest::Unsupported {
                source_type: source_type.unwrap_or("none").to_string(),
            },
        }
    }

    /// Collects content from this source. Failures are recorded in the
    /// result rather than returned.
    pub fn collect(&self, root: &Path, runner: &dyn CommandRunner, result: &mut SourceResult) {
        match self {
            SourceRequest::File { path } => {
                let target = resolve_against(root, path);
                if !target.is_file() {
                    result.error = Some(format!("File not found: {path}"));
                    return;
                }
                match fs::read_to_string(&target) {
                    Ok(text) => {
                        result.content = Some(SourceContent::Text(text));
                        result.success = true;
                    }
                    Err(e) => result.error = Some(e.to_string()),
                }
            }
            SourceRequest::Directory { path } => {
                let target = resolve_against(root, path);
                if !target.is_dir() {
                    result.error = Some(format!("Directory not found: {path}"));
                    return;
                }
                match list_entries(&target) {
                    Ok(entries) => {
                        result.content = Some(SourceContent::Entries(entries));
                        result.success = true;
                    }
                    Err(e) => result.error = Some(e.to_string()),
                }
            }
            SourceRequest::Command { query } => {
                let output = runner.run(&split_command_line(query), root);
                result.content = Some(SourceContent::Text(output.stdout));
                result.success = output.success;
                if !output.success {
                    result.error = Some(output.stderr);
                }
            }
            SourceRequest::Search { query } => {
                let (matches, skipped) = search_literal(root, query);
                debug!(
                    "Search for {query:?} matched {} files, skipped {skipped}",
                    matches.len()
                );
                result.content = Some(SourceContent::Matches(matches));
                result.skipped_files = skipped;
                result.success = true;
            }
            SourceRequest::Unsupported { source_type } => {
                result.error = Some(format!("Unsupported source type: {source_type}"));
            }
        }
    }
}

impl Workflow {
    /// Collects every source and records the results on the instruction.
    ///
    /// Individual source failures never fail the call; they are reported
    /// per source.
    pub async fn gather_information(&self, params: &GatherInformation) -> Result<Instruction> {
        let params = params.clone();
        self.blocking(move |this| {
            let mut instruction = this.store.load(&params.instruction_id)?;

            let sources: Vec<SourceResult> = params
                .sources
                .iter()
                .map(|spec| this.collect_source(spec))
                .collect();
            let summary = GatherSummary::from_results(&sources);
            info!(
                "Gathered {}/{} sources for instruction {}",
                summary.successful_sources, summary.total_sources, instruction.id
            );

            instruction.gathered_information = Some(GatheredInformation {
                sources,
                summary,
                gathered_at: now(),
            });
            instruction.advance(
                InstructionStatus::InformationGathered,
                WorkflowStep::InformationGathering,
            );
            this.store.commit(&mut instruction)?;
            Ok(instruction)
        })
        .await
    }

    fn collect_source(&self, spec: &SourceSpec) -> SourceResult {
        let mut result = SourceResult::new(
            spec.source_type.clone(),
            spec.path.clone().unwrap_or_default(),
            spec.query.clone().unwrap_or_default(),
        );
        SourceRequest::from_spec(spec).collect(&self.root, self.runner.as_ref(), &mut result);
        result
    }
}

fn list_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?.file_name().to_string_lossy().into_owned());
    }
    entries.sort();
    Ok(entries)
}

/// Walks `root` and returns files whose UTF-8 text contains `query`, plus
/// the number of entries that could not be read as text.
fn search_literal(root: &Path, query: &str) -> (Vec<SearchMatch>, usize) {
    let mut matches = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {e}");
                skipped += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(text) = fs::read_to_string(entry.path()) else {
            skipped += 1;
            continue;
        };
        if text.contains(query) {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            matches.push(SearchMatch {
                path: relative.display().to_string(),
                line_count: text.lines().count(),
            });
        }
    }

    (matches, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(source_type: Option<&str>, path: Option<&str>, query: Option<&str>) -> SourceSpec {
        SourceSpec {
            source_type: source_type.map(str::to_string),
            path: path.map(str::to_string),
            query: query.map(str::to_string),
        }
    }

    #[test]
    fn test_from_spec_resolves_known_types() {
        assert_eq!(
            SourceRequest::from_spec(&spec(Some("file"), Some("a.txt"), None)),
            SourceRequest::File {
                path: "a.txt".to_string()
            }
        );
        assert_eq!(
            SourceRequest::from_spec(&spec(Some("search"), None, Some("needle"))),
            SourceRequest::Search {
                query: "needle".to_string()
            }
        );
    }

    #[test]
    fn test_from_spec_missing_field_is_unsupported() {
        assert_eq!(
            SourceRequest::from_spec(&spec(Some("command"), Some("ls"), Some(""))),
            SourceRequest::Unsupported {
                source_type: "command".to_string()
            }
        );
        assert_eq!(
            SourceRequest::from_spec(&spec(Some("web"), None, Some("rust"))),
            SourceRequest::Unsupported {
                source_type: "web".to_string()
            }
        );
        assert_eq!(
            SourceRequest::from_spec(&spec(None, None, None)),
            SourceRequest::Unsupported {
                source_type: "none".to_string()
            }
        );
    }
}
