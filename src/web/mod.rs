//! Local web page front-end.
//!
//! `GET /` serves a single page with a file input; the page posts the raw CSV
//! to `POST /process`, which runs the shared batch pipeline and answers with a
//! small JSON status. Runs are serialized: a second upload waits for the first
//! to finish writing before it starts.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::StringRejection},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinError;

use crate::app::pipeline::run_batch_reader;
use crate::classify::RiskClassifier;
use crate::error::AppError;
use crate::report::format_batch_summary;

const INDEX_HTML: &str = include_str!("static/index.html");

/// Largest accepted upload. Larger bodies get a JSON failure, not a bare 413.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared server state.
#[derive(Clone)]
pub struct WebState {
    inner: Arc<Inner>,
    run_lock: Arc<Mutex<()>>,
    upload_limit: usize,
}

struct Inner {
    classifier: RiskClassifier,
    output: PathBuf,
}

impl WebState {
    pub fn new(classifier: RiskClassifier, output: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner { classifier, output }),
            run_lock: Arc::new(Mutex::new(())),
            upload_limit: MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit = bytes;
        self
    }
}

/// JSON body returned by `POST /process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ProcessResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: None,
        }
    }
}

pub fn router(state: WebState) -> Router {
    let limit = state.upload_limit;
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/process", post(process))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

async fn process(
    State(state): State<WebState>,
    body: Result<String, StringRejection>,
) -> (StatusCode, Json<ProcessResponse>) {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(status = %rejection.status(), reason = %rejection.body_text(), "upload rejected");
            let message = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                format!("Error: file is larger than the upload limit ({} bytes).", state.upload_limit)
            } else {
                format!("Error: {}", rejection.body_text())
            };
            return (rejection.status(), Json(ProcessResponse::failure(message)));
        }
    };

    if body.trim().is_empty() {
        return (StatusCode::OK, Json(ProcessResponse::failure("Please select a CSV file first!")));
    }

    let inner = Arc::clone(&state.inner);
    let result = run_exclusive(Arc::clone(&state.run_lock), move || {
        run_batch_reader(&inner.classifier, body.as_bytes(), &inner.output)
    })
    .await;

    let response = match result {
        Ok(Ok(report)) => ProcessResponse {
            success: true,
            message: format_batch_summary(&report),
            count: Some(report.count),
        },
        Ok(Err(err)) => {
            tracing::error!(%err, "upload batch failed");
            ProcessResponse::failure(format!("Error: {err}"))
        }
        Err(err) => {
            tracing::error!(%err, "batch task panicked");
            ProcessResponse::failure("Error: processing task failed")
        }
    };
    (StatusCode::OK, Json(response))
}

/// Run `job` on the blocking pool while holding `lock`.
///
/// The guard moves into the blocking task, so it stays held until the job
/// returns even if the awaiting request is dropped.
async fn run_exclusive<T, F>(lock: Arc<Mutex<()>>, job: F) -> Result<T, JoinError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let guard = lock.lock_owned().await;
    tokio::task::spawn_blocking(move || {
        let _guard = guard;
        job()
    })
    .await
}

/// Bind `127.0.0.1:<port>` and serve until the process is stopped.
pub fn serve(classifier: RiskClassifier, output: PathBuf, port: u16, open: bool) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(async move {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::new(2, format!("Failed to bind {addr}: {e}")))?;

        let url = format!("http://{addr}");
        println!("Risk profiler running at {url} (Ctrl-C to stop)");
        tracing::info!(%addr, output = %output.display(), "web server listening");

        if open {
            open_browser(&url);
        }

        axum::serve(listener, router(WebState::new(classifier, output)))
            .await
            .map_err(|e| AppError::new(4, format!("Web server error: {e}")))
    })
}

/// Best effort; a missing browser only logs a warning.
fn open_browser(url: &str) {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    } else {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };

    if let Err(err) = cmd.spawn() {
        tracing::warn!(%err, %url, "could not launch a browser");
    }
}
