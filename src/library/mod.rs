pub mod filter;
pub mod projects;

pub use filter::filter_records;
pub use projects::summarize_projects;

use tracing::{debug, warn};

use crate::client::DocsClient;
use crate::error::{ClientError, ClientResult, Mutation};
use crate::models::{
    DocId, DocumentationRecord, GenerateDocRequest, LibraryTotals, ProjectSelector,
    ProjectSummary,
};

/// One view's copy of the documentation corpus.
///
/// Mutations go through the client and are followed by a full re-fetch of the
/// records and project names; nothing is patched locally. A failed call leaves
/// the held state as it was.
#[derive(Debug)]
pub struct Library {
    client: DocsClient,
    records: Vec<DocumentationRecord>,
    project_names: Vec<String>,
}

impl Library {
    /// An empty library. Call [`Library::refresh`] to populate it.
    pub fn new(client: DocsClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            project_names: Vec::new(),
        }
    }

    pub async fn load(client: DocsClient) -> ClientResult<Self> {
        let mut library = Self::new(client);
        library.refresh().await?;
        Ok(library)
    }

    pub fn records(&self) -> &[DocumentationRecord] {
        &self.records
    }

    pub fn project_names(&self) -> &[String] {
        &self.project_names
    }

    /// Replaces the held records and names only when both fetches succeed.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let (records, project_names) = tokio::try_join!(
            self.client.list_all(),
            self.client.list_project_names()
        )?;

        debug!(
            records = records.len(),
            projects = project_names.len(),
            "library refreshed"
        );
        self.records = records;
        self.project_names = project_names;
        Ok(())
    }

    /// Generates documentation, then re-fetches.
    ///
    /// When the generate succeeds but the re-fetch does not, the error is
    /// `RefreshFailed` carrying the stored record.
    pub async fn generate(
        &mut self,
        request: &GenerateDocRequest,
    ) -> ClientResult<DocumentationRecord> {
        let record = self.client.generate(request).await?;
        match self.refresh().await {
            Ok(()) => Ok(record),
            Err(source) => Err(refresh_failed(Mutation::Generated(Box::new(record)), source)),
        }
    }

    pub async fn delete(&mut self, id: DocId) -> ClientResult<()> {
        self.client.delete(id).await?;
        self.refresh()
            .await
            .map_err(|source| refresh_failed(Mutation::Deleted(id), source))
    }

    /// Fresh fetch of one project's records, independent of the held list.
    pub async fn project_records(
        &self,
        project_name: &str,
    ) -> ClientResult<Vec<DocumentationRecord>> {
        self.client.list_by_project(project_name).await
    }

    pub fn filtered(
        &self,
        query: &str,
        selector: &ProjectSelector,
    ) -> Vec<&DocumentationRecord> {
        filter_records(&self.records, query, selector)
    }

    pub fn summaries(&self) -> Vec<ProjectSummary> {
        summarize_projects(&self.records, &self.project_names)
    }

    pub fn totals(&self) -> LibraryTotals {
        LibraryTotals::from_summaries(&self.summaries())
    }
}

fn refresh_failed(mutation: Mutation, source: ClientError) -> ClientError {
    warn!(%mutation, error = %source, "library refresh after mutation failed");
    ClientError::RefreshFailed {
        mutation,
        source: Box::new(source),
    }
}
