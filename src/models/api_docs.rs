use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned record identifier.
pub type DocId = i64;

/// One generated-documentation artifact, validated at the client boundary.
///
/// Deserialization goes through [`RawDocumentationRecord`] so that nothing
/// loosely-typed reaches the filter or aggregation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDocumentationRecord")]
pub struct DocumentationRecord {
    pub id: DocId,
    pub project_name: String,
    pub api_endpoint: String,
    pub generated_documentation: String,
    pub source_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DocumentationRecord {
    /// Newline count plus one; an empty snippet has no lines.
    pub fn source_line_count(&self) -> usize {
        if self.source_code.is_empty() {
            0
        } else {
            self.source_code.matches('\n').count() + 1
        }
    }
}

/// Wire shape as the backend sends it, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocumentationRecord {
    id: Option<DocId>,
    project_name: Option<String>,
    api_endpoint: Option<String>,
    #[serde(default)]
    generated_documentation: Option<String>,
    #[serde(default)]
    source_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("record {0} has a blank projectName")]
    BlankProjectName(DocId),
    #[error("record {id} was updated ({updated_at}) before it was created ({created_at})")]
    UpdatedBeforeCreated {
        id: DocId,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    },
}

impl TryFrom<RawDocumentationRecord> for DocumentationRecord {
    type Error = RecordError;

    fn try_from(raw: RawDocumentationRecord) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(RecordError::MissingField("id"))?;
        let project_name = raw
            .project_name
            .ok_or(RecordError::MissingField("projectName"))?;
        if project_name.trim().is_empty() {
            return Err(RecordError::BlankProjectName(id));
        }
        let api_endpoint = raw
            .api_endpoint
            .ok_or(RecordError::MissingField("apiEndpoint"))?;
        let created_at = raw.created_at.ok_or(RecordError::MissingField("createdAt"))?;
        let updated_at = raw.updated_at.ok_or(RecordError::MissingField("updatedAt"))?;
        if created_at > updated_at {
            return Err(RecordError::UpdatedBeforeCreated {
                id,
                created_at,
                updated_at,
            });
        }

        Ok(Self {
            id,
            project_name,
            api_endpoint,
            generated_documentation: raw.generated_documentation.unwrap_or_default(),
            source_code: raw.source_code.unwrap_or_default(),
            created_at,
            updated_at,
        })
    }
}

/// Accepts the backend's offset-less `LocalDateTime` form as well as RFC 3339,
/// the latter normalized to UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(with_offset.naive_utc()));
    }

    text.parse::<NaiveDateTime>()
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", text, e)))
}

/// Body of `POST /api/docs/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocRequest {
    pub project_name: String,
    pub api_endpoint: String,
    pub source_code: String,
}

impl GenerateDocRequest {
    pub fn new(
        project_name: impl Into<String>,
        api_endpoint: impl Into<String>,
        source_code: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            api_endpoint: api_endpoint.into(),
            source_code: source_code.into(),
        }
    }

    /// Returns the wire name of the first blank field, if any.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("projectName", &self.project_name),
            ("apiEndpoint", &self.api_endpoint),
            ("sourceCode", &self.source_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Per-project statistics derived from the current record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub document_count: usize,
    pub last_updated: Option<NaiveDateTime>,
    pub endpoints: Vec<String>,
    pub total_lines: usize,
}

/// Library-wide totals shown above the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryTotals {
    pub total_projects: usize,
    pub total_docs: usize,
    pub total_endpoints: usize,
    pub total_lines: usize,
}

impl LibraryTotals {
    pub fn from_summaries(summaries: &[ProjectSummary]) -> Self {
        summaries.iter().fold(
            Self {
                total_projects: summaries.len(),
                ..Self::default()
            },
            |mut totals, summary| {
                totals.total_docs += summary.document_count;
                totals.total_endpoints += summary.endpoints.len();
                totals.total_lines += summary.total_lines;
                totals
            },
        )
    }
}

/// Which project the library view is narrowed to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectSelector {
    #[default]
    All,
    Named(String),
}

impl ProjectSelector {
    pub const ALL: &'static str = "all";

    pub fn matches(&self, project_name: &str) -> bool {
        match self {
            ProjectSelector::All => true,
            ProjectSelector::Named(name) => name == project_name,
        }
    }
}

impl From<&str> for ProjectSelector {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == Self::ALL {
            ProjectSelector::All
        } else {
            ProjectSelector::Named(value.to_string())
        }
    }
}

impl std::fmt::Display for ProjectSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectSelector::All => f.write_str(Self::ALL),
            ProjectSelector::Named(name) => f.write_str(name),
        }
    }
}
