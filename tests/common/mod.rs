//! In-process stand-in for the documentation backend, served by warp on an
//! ephemeral port. It follows the REST contract closely enough to exercise
//! the client: upsert on (project, endpoint), 404 envelopes for unknown ids,
//! and switchable listing failures.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use doc_toolkit::models::{DocumentationRecord, GenerateDocRequest};
use doc_toolkit::{ClientConfig, DocsClient};
use serde_json::json;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

/// Any snippet containing this marker makes the stub's "AI service" fail.
pub const FAILING_SOURCE: &str = "// trigger-ai-failure";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingMode {
    #[default]
    Normal,
    /// `/all` answers 500 with the backend's error envelope.
    ServerError,
    /// `/all` answers 200 with a record that has a blank project name.
    Corrupt,
}

#[derive(Debug, Default)]
pub struct StubState {
    pub records: Vec<DocumentationRecord>,
    pub listing: ListingMode,
    next_id: i64,
}

pub type SharedState = Arc<Mutex<StubState>>;

pub struct StubBackend {
    pub addr: SocketAddr,
    pub state: SharedState,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = SharedState::default();
        let (addr, server) =
            warp::serve(routes(state.clone())).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        Self { addr, state }
    }

    pub fn client(&self) -> DocsClient {
        let config = ClientConfig::default()
            .with_base_url(&format!("http://{}", self.addr))
            .unwrap();
        DocsClient::new(&config).unwrap()
    }

    pub fn set_listing(&self, mode: ListingMode) {
        self.state.lock().unwrap().listing = mode;
    }

    pub fn stored_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }
}

fn routes(
    state: SharedState,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone + Send + Sync + 'static {
    let with_state = warp::any().map(move || state.clone());

    let health = warp::path!("api" / "docs" / "test")
        .and(warp::get())
        .map(|| {
            warp::reply::json(&json!({
                "message": "AI Developer Toolkit API is running!",
                "version": "1.0.0",
                "features": "API Documentation Generator"
            }))
            .into_response()
        });

    let generate = warp::path!("api" / "docs" / "generate")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state.clone())
        .map(|request: GenerateDocRequest, state: SharedState| generate(request, &state));

    let all = warp::path!("api" / "docs" / "all")
        .and(warp::get())
        .and(with_state.clone())
        .map(|state: SharedState| list_all(&state));

    let by_project = warp::path!("api" / "docs" / "project" / String)
        .and(warp::get())
        .and(with_state.clone())
        .map(|name: String, state: SharedState| {
            let state = state.lock().unwrap();
            let records: Vec<&DocumentationRecord> = state
                .records
                .iter()
                .filter(|r| r.project_name == name)
                .collect();
            warp::reply::json(&records).into_response()
        });

    let projects = warp::path!("api" / "docs" / "projects")
        .and(warp::get())
        .and(with_state.clone())
        .map(|state: SharedState| {
            let state = state.lock().unwrap();
            let mut names: Vec<&str> = Vec::new();
            for record in &state.records {
                if !names.contains(&record.project_name.as_str()) {
                    names.push(&record.project_name);
                }
            }
            warp::reply::json(&names).into_response()
        });

    let get_by_id = warp::path!("api" / "docs" / i64)
        .and(warp::get())
        .and(with_state.clone())
        .map(|id: i64, state: SharedState| {
            let state = state.lock().unwrap();
            match state.records.iter().find(|r| r.id == id) {
                Some(record) => warp::reply::json(record).into_response(),
                None => not_found(id),
            }
        });

    let delete = warp::path!("api" / "docs" / i64)
        .and(warp::delete())
        .and(with_state)
        .map(|id: i64, state: SharedState| {
            let mut state = state.lock().unwrap();
            match state.records.iter().position(|r| r.id == id) {
                Some(index) => {
                    state.records.remove(index);
                    warp::reply::json(&json!({"message": "Documentation deleted successfully"}))
                        .into_response()
                }
                None => not_found(id),
            }
        });

    health
        .or(generate)
        .unify()
        .or(all)
        .unify()
        .or(by_project)
        .unify()
        .or(projects)
        .unify()
        .or(get_by_id)
        .unify()
        .or(delete)
        .unify()
}

fn generate(request: GenerateDocRequest, state: &SharedState) -> Response {
    if request.source_code.contains(FAILING_SOURCE) {
        return error_envelope(
            StatusCode::SERVICE_UNAVAILABLE,
            "AI Service Unavailable",
            "AI provider did not respond",
        );
    }

    let mut state = state.lock().unwrap();
    let now = Utc::now().naive_utc();
    let documentation = format!(
        "## {}\n\nGenerated for {} ({} bytes of source)",
        request.api_endpoint,
        request.project_name,
        request.source_code.len()
    );

    let existing = state.records.iter().position(|r| {
        r.project_name == request.project_name && r.api_endpoint == request.api_endpoint
    });
    let record = match existing {
        Some(index) => {
            let record = &mut state.records[index];
            record.source_code = request.source_code;
            record.generated_documentation = documentation;
            record.updated_at = now;
            record.clone()
        }
        None => {
            state.next_id += 1;
            let record = DocumentationRecord {
                id: state.next_id,
                project_name: request.project_name,
                api_endpoint: request.api_endpoint,
                generated_documentation: documentation,
                source_code: request.source_code,
                created_at: now,
                updated_at: now,
            };
            state.records.push(record.clone());
            record
        }
    };

    warp::reply::json(&record).into_response()
}

fn list_all(state: &SharedState) -> Response {
    let state = state.lock().unwrap();
    match state.listing {
        ListingMode::Normal => warp::reply::json(&state.records).into_response(),
        ListingMode::ServerError => error_envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An unexpected error occurred",
        ),
        ListingMode::Corrupt => warp::reply::json(&json!([{
            "id": 99,
            "projectName": "",
            "apiEndpoint": "/broken",
            "createdAt": "2024-05-01T10:00:00",
            "updatedAt": "2024-05-01T10:00:00"
        }]))
        .into_response(),
    }
}

fn not_found(id: i64) -> Response {
    error_envelope(
        StatusCode::NOT_FOUND,
        "Resource Not Found",
        &format!("Documentation not found with id: {}", id),
    )
}

fn error_envelope(status: StatusCode, error: &str, message: &str) -> Response {
    let body = json!({
        "timestamp": Utc::now().naive_utc(),
        "status": status.as_u16(),
        "error": error,
        "message": message,
        "path": "/api/docs"
    });
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}
