use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_toolkit::models::{
    DocId, DocumentationRecord, GenerateDocRequest, LibraryTotals, ProjectSelector,
    ProjectSummary,
};
use doc_toolkit::{ClientConfig, DocsClient, Library};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "doc-toolkit")]
#[command(about = "Generate, browse and manage AI-generated API documentation")]
struct Cli {
    /// Backend base URL (overrides DOCS_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the documentation backend is reachable
    Health,
    /// Generate documentation for a source snippet
    Generate {
        #[arg(short, long)]
        project: String,
        #[arg(short, long)]
        endpoint: String,
        /// File holding the snippet; read from stdin when omitted
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// Search the documentation library
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = ProjectSelector::ALL)]
        project: String,
    },
    /// Show a single documentation record
    Show { id: DocId },
    /// Permanently delete a documentation record
    Delete {
        id: DocId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Per-project statistics
    Projects {
        /// Also list the documentation of this project
        #[arg(short, long)]
        select: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    info!(base_url = %config.base_url, "using documentation backend");

    let client = DocsClient::new(&config)?;

    match cli.command {
        Commands::Health => {
            let payload = client
                .health()
                .await
                .context("documentation backend is not reachable")?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Generate {
            project,
            endpoint,
            source,
        } => {
            let source_code = read_source(source)?;
            let request = GenerateDocRequest::new(project, endpoint, source_code);
            let record = client
                .generate(&request)
                .await
                .context("failed to generate documentation")?;

            if cli.json {
                print_json(&record)?;
            } else {
                print_record(&record);
            }
        }
        Commands::List { query, project } => {
            let library = Library::load(client).await?;
            let selector = ProjectSelector::from(project.as_str());
            let matches = library.filtered(&query, &selector);

            if cli.json {
                print_json(&matches)?;
            } else {
                println!(
                    "Documentation in {} ({} of {})",
                    selector,
                    matches.len(),
                    library.records().len()
                );
                if matches.is_empty() {
                    println!("  No documentation found.");
                }
                for record in matches {
                    print_record_line(record);
                }
            }
        }
        Commands::Show { id } => {
            let record = client.get_by_id(id).await?;
            if cli.json {
                print_json(&record)?;
            } else {
                print_record(&record);
            }
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete documentation {}? This cannot be undone.", id))? {
                println!("Aborted.");
                return Ok(());
            }

            let mut library = Library::new(client);
            library.delete(id).await?;
            println!(
                "Deleted documentation {}. {} record(s) remain.",
                id,
                library.records().len()
            );
        }
        Commands::Projects { select } => {
            let library = Library::load(client).await?;
            let summaries = library.summaries();
            let totals = LibraryTotals::from_summaries(&summaries);

            let selected = match &select {
                Some(name) => Some(library.project_records(name).await?),
                None => None,
            };

            if cli.json {
                print_json(&ProjectsReport {
                    totals: &totals,
                    projects: &summaries,
                    selected: selected.as_deref(),
                })?;
            } else {
                print_totals(&totals);
                for summary in &summaries {
                    print_summary(summary);
                }
                if let (Some(name), Some(records)) = (&select, &selected) {
                    println!();
                    println!("{} ({} documents)", name, records.len());
                    for record in records {
                        print_record_line(record);
                    }
                }
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectsReport<'a> {
    totals: &'a LibraryTotals,
    projects: &'a [ProjectSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<&'a [DocumentationRecord]>,
}

fn read_source(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read source from stdin")?;
            Ok(buffer)
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_time(time: &chrono::NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

fn print_record(record: &DocumentationRecord) {
    println!("#{} {} {}", record.id, record.project_name, record.api_endpoint);
    println!(
        "created {} | updated {} | {} source line(s)",
        format_time(&record.created_at),
        format_time(&record.updated_at),
        record.source_line_count()
    );
    println!();
    println!("{}", record.generated_documentation);
}

fn print_record_line(record: &DocumentationRecord) {
    println!(
        "  #{:<5} {:<24} {:<32} {}",
        record.id,
        record.project_name,
        record.api_endpoint,
        format_time(&record.updated_at)
    );
}

fn print_totals(totals: &LibraryTotals) {
    println!(
        "{} project(s), {} document(s), {} endpoint(s), {} line(s) of source",
        totals.total_projects, totals.total_docs, totals.total_endpoints, totals.total_lines
    );
}

fn print_summary(summary: &ProjectSummary) {
    let updated = summary
        .last_updated
        .as_ref()
        .map(format_time)
        .unwrap_or_else(|| "never".to_string());
    println!(
        "  {:<24} {:>4} doc(s) {:>6} line(s)  last updated {}",
        summary.name, summary.document_count, summary.total_lines, updated
    );
    if !summary.endpoints.is_empty() {
        println!("      {}", summary.endpoints.join(", "));
    }
}
