pub mod docs_client;

pub use docs_client::DocsClient;
