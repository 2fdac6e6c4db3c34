//! Client-side management of AI-generated API documentation.
//!
//! [`client::DocsClient`] talks to the documentation backend. The
//! [`library`] module filters and aggregates the fetched records without any
//! further I/O.

pub mod client;
pub mod config;
pub mod error;
pub mod library;
pub mod models;

pub use client::DocsClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, Mutation};
pub use library::{Library, filter_records, summarize_projects};
