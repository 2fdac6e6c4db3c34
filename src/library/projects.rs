use std::collections::HashMap;

use crate::models::{DocumentationRecord, ProjectSummary};

/// Builds one summary per entry in `project_names`, most documents first.
///
/// Records are grouped once up front. A name with no matching records still
/// yields a summary (count zero, no last update), and records whose project is
/// absent from `project_names` are not summarized. Equal counts keep the order
/// of `project_names`.
pub fn summarize_projects<S: AsRef<str>>(
    records: &[DocumentationRecord],
    project_names: &[S],
) -> Vec<ProjectSummary> {
    let mut by_project: HashMap<&str, Vec<&DocumentationRecord>> = HashMap::new();
    for record in records {
        by_project
            .entry(record.project_name.as_str())
            .or_default()
            .push(record);
    }

    let mut summaries: Vec<ProjectSummary> = project_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            summarize(name, by_project.get(name).map(Vec::as_slice).unwrap_or_default())
        })
        .collect();

    // `sort_by` is stable.
    summaries.sort_by(|a, b| b.document_count.cmp(&a.document_count));
    summaries
}

fn summarize(name: &str, records: &[&DocumentationRecord]) -> ProjectSummary {
    ProjectSummary {
        name: name.to_string(),
        document_count: records.len(),
        last_updated: records.iter().map(|r| r.updated_at).max(),
        endpoints: records.iter().map(|r| r.api_endpoint.clone()).collect(),
        total_lines: records.iter().map(|r| r.source_line_count()).sum(),
    }
}
