//! Results of the information gathering phase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A file whose text contained the searched-for literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchMatch {
    pub path: String,
    pub line_count: usize,
}

/// Content captured from a single source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SourceContent {
    /// File text or command stdout
    Text(String),
    /// Immediate entry names of a directory
    Entries(Vec<String>),
    /// Files matched by a search
    Matches(Vec<SearchMatch>),
}

/// Outcome of gathering from one source descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceResult {
    pub source_type: Option<String>,
    #[serde(default)]
    pub source_path: String,
    #[serde(default)]
    pub source_query: String,
    pub content: Option<SourceContent>,
    pub success: bool,
    pub error: Option<String>,
    /// Files a search could not read as text
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped_files: usize,
}

impl SourceResult {
    pub(crate) fn new(source_type: Option<String>, path: String, query: String) -> Self {
        Self {
            source_type,
            source_path: path,
            source_query: query,
            content: None,
            success: false,
            error: None,
            skipped_files: 0,
        }
    }
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Aggregate counts over all gathered sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatherSummary {
    pub total_sources: usize,
    pub successful_sources: usize,
    pub source_types: BTreeMap<String, usize>,
    #[serde(default)]
    pub skipped_files: usize,
}

impl GatherSummary {
    /// Summarize a batch of source results.
    pub fn from_results(results: &[SourceResult]) -> Self {
        let mut summary = Self {
            total_sources: results.len(),
            ..Self::default()
        };
        for result in results {
            if result.success {
                summary.successful_sources += 1;
            }
            summary.skipped_files += result.skipped_files;
            let key = result
                .source_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            *summary.source_types.entry(key).or_insert(0) += 1;
        }
        summary
    }
}

/// Everything collected by the gathering phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatheredInformation {
    pub sources: Vec<SourceResult>,
    pub summary: GatherSummary,
    pub gathered_at: i64,
}
