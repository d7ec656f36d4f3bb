use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const INDEX_FILE: &str = "index.html";

/// Static file server for the star quiz viewer bundle.
#[derive(Debug, Parser)]
#[command(name = "sky_server")]
struct Args {
    /// Directory holding index.html, the wasm bundle and stars.json.
    #[arg(long, env = "STARQUIZ_ROOT", default_value = "crates/apps/viewer_web/www")]
    root: PathBuf,

    #[arg(long, env = "STARQUIZ_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
}

#[derive(Clone)]
struct AppState {
    root: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if !args.root.is_dir() {
        warn!("static root {:?} is not a directory", args.root);
    }

    let app = router(AppState { root: args.root });

    info!("sky server listening on http://{}", args.addr);
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, app).await
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(get_static)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_static(State(state): State<AppState>, uri: Uri) -> Response {
    match resolve_path(&state.root, uri.path()) {
        Some(path) => {
            let content_type = content_type_for(&path);
            serve_file(&path, content_type).await
        }
        None => {
            warn!("rejected path {}", uri.path());
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
    }
}

/// Maps a request path onto `root`. Directory paths get `index.html`;
/// anything that would escape `root` yields `None`.
fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for part in request_path.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part.contains('\\') {
            return None;
        }
        match Path::new(part).components().next() {
            Some(Component::Normal(_)) => path.push(part),
            _ => return None,
        }
    }
    if request_path.is_empty() || request_path.ends_with('/') {
        path.push(INDEX_FILE);
    }
    Some(path)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

async fn serve_file(path: &Path, content_type: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
            );
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
        Err(err) => {
            error!("file read failed: {path:?} -> {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Server error: {err}")).into_response()
        }
    }
}
