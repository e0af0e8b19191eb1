use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::resolve::resolve;
use crate::{
    Config, FileLookup, GuessMime, MimeTypeDetector, RangedResponse, RequestedInterval, ServeError,
};

/// Body of the liveness endpoint.
pub const HEALTH_MESSAGE: &str = "Video streaming is working";

/// Shared state of the routes: where files come from and how they are typed.
pub struct AppState<L> {
    pub lookup: L,
    pub mime: Arc<dyn MimeTypeDetector>,
}

impl<L: FileLookup> AppState<L> {
    pub fn new(lookup: L) -> Self {
        AppState { lookup, mime: Arc::new(GuessMime) }
    }

    pub fn with_mime(mut self, mime: impl MimeTypeDetector + 'static) -> Self {
        self.mime = Arc::new(mime);
        self
    }
}

/// Builds the liveness route at the mount path and the streaming route
/// below it. The liveness route also answers with a trailing slash.
pub fn router<L: FileLookup>(state: AppState<L>, config: &Config) -> Router {
    let routes = Router::new()
        .route("/", get(health))
        .route("/{filename}", get(stream_file::<L>))
        .with_state(Arc::new(state));

    let router = match config.mount_path() {
        Some(path) => Router::new()
            .route(&format!("{path}/"), get(health))
            .nest(&path, routes),
        None => routes,
    };
    let router = router.layer(TraceLayer::new_for_http());

    if config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn stream_file<L: FileLookup>(
    State(state): State<Arc<AppState<L>>>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<RangedResponse<L::Body>, ServeError> {
    if !state.lookup.exists(&filename).await {
        return Err(ServeError::NotFound);
    }
    let total = state.lookup.length(&filename).await?;

    let outcome = resolve(RequestedInterval::from_headers(&headers), total);
    tracing::debug!(
        file = %filename,
        range = ?headers.get(header::RANGE),
        total,
        ?outcome,
        "resolved range",
    );

    let window = outcome.window()?;
    let stream = state.lookup.read_range(&filename, window.start, window.end).await?;
    let content_type = state.mime.detect(&filename);

    Ok(if outcome.is_partial() {
        RangedResponse::Partial { window, stream, content_type }
    } else {
        RangedResponse::Full { window, stream, content_type }
    })
}
