use crate::models::{DocumentationRecord, ProjectSelector};

/// Narrows records by free-text query and project, keeping input order.
///
/// The query is matched case-insensitively as a substring of the project
/// name, the endpoint, or the generated documentation. It is not trimmed, so
/// `" "` only matches fields that contain a space. An empty query matches
/// everything.
pub fn filter_records<'a, I>(
    records: I,
    query: &str,
    selector: &ProjectSelector,
) -> Vec<&'a DocumentationRecord>
where
    I: IntoIterator<Item = &'a DocumentationRecord>,
{
    let query_lower = query.to_lowercase();

    records
        .into_iter()
        .filter(|record| selector.matches(&record.project_name))
        .filter(|record| query_lower.is_empty() || matches_text(record, &query_lower))
        .collect()
}

fn matches_text(record: &DocumentationRecord, query_lower: &str) -> bool {
    [
        &record.project_name,
        &record.api_endpoint,
        &record.generated_documentation,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(query_lower))
}
