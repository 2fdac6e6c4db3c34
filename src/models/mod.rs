pub mod api_docs;

pub use api_docs::{
    DocId, DocumentationRecord, GenerateDocRequest, LibraryTotals, ProjectSelector,
    ProjectSummary, RecordError,
};
