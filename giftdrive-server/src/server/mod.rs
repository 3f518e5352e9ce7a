mod admin;
pub mod auth;
mod config;
mod dto;
mod public;

use axum::http::{HeaderName, HeaderValue};
use axum::middleware;
use axum::response::Response as AxumResponse;
use axum::{
    Router,
    http::{Method, StatusCode, header},
    routing::{get, post},
};
pub use config::{AdminConfig, AppConfig, ConfigError};
use giftdrive_shared::api::{ErrorResp, endpoints as ep};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;
use uuid::Uuid;

use crate::storage::{StorageError, Store};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Self {
        Self {
            config,
            store,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancelled once the process starts shutting down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

#[derive(Clone, Debug)]
struct ReqId(pub String);

pub fn router(state: AppState) -> Router {
    // Trace with request context (method, path, request_id)
    let trace = TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
        let request_id = req
            .extensions()
            .get::<ReqId>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id,
            admin = tracing::field::Empty,
        )
    });

    let app = Router::new()
        .route("/healthz", get(health))
        .route(ep::PARTIES, get(public::list_parties))
        .route("/parties/{id}", get(public::get_party))
        .route(ep::PLEDGE, post(public::pledge))
        .route(ep::ADMIN_LOGIN, post(auth::login))
        .route(ep::ADMIN_LOGOUT, post(auth::logout))
        .route(
            ep::ADMIN_PARTY,
            get(admin::list_parties)
                .post(admin::create_party)
                .put(admin::update_party)
                .delete(admin::delete_party),
        )
        .route(
            ep::ADMIN_CHILD,
            get(admin::list_children)
                .post(admin::create_child)
                .put(admin::update_child)
                .delete(admin::delete_child),
        )
        .route(
            ep::ADMIN_WISHLIST,
            get(admin::list_wishlist)
                .post(admin::create_wishlist_item)
                .put(admin::update_wishlist_item)
                .delete(admin::delete_wishlist_item),
        )
        .route(ep::ADMIN_EXPORT, get(admin::export))
        .with_state(state.clone())
        .layer(trace)
        .layer(middleware::from_fn(add_security_headers))
        .layer(middleware::from_fn(add_request_id));

    // Optionally add CORS for dev if configured
    if let Some(origin) = &state.config.dev_cors_origin {
        let hv = header::HeaderValue::from_str(origin)
            .unwrap_or(header::HeaderValue::from_static("http://localhost:5173"));
        let cors = CorsLayer::new()
            .allow_origin(hv)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_DISPOSITION]);
        app.layer(cors)
    } else {
        app
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn add_request_id(
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Result<AxumResponse, AppError> {
    let hdr = HeaderName::from_static("x-request-id");
    // Use provided x-request-id if present, else generate
    let rid = req
        .headers()
        .get(&hdr)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(ReqId(rid.clone()));
    let mut resp = next.run(req).await;
    if let Ok(hv) = HeaderValue::from_str(&rid) {
        resp.headers_mut().insert(hdr, hv);
    }
    Ok(resp)
}

async fn add_security_headers(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Result<AxumResponse, AppError> {
    let mut resp = next.run(req).await;

    let headers = resp.headers_mut();
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("SAMEORIGIN"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    // HSTS is only honored on HTTPS; harmless otherwise
    headers.insert(
        HeaderName::from_static("strict-transport-security"),
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    // Everything here is live data (pledge status, exports)
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));

    Ok(resp)
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    AlreadyPledged(String),
    Internal(String),
}

impl AppError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        Self::BadRequest(msg.into())
    }
    fn unauthorized() -> Self {
        Self::Unauthorized
    }
    fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }
    fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { entity, .. } => AppError::not_found(format!("{entity} not found")),
            StorageError::AlreadyPledged(_) => {
                AppError::AlreadyPledged("This child has already been pledged for".into())
            }
            StorageError::InvalidInput(m) => AppError::bad_request(m),
            other => AppError::internal(other),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg, kind, detail) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m, "bad_request", None),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid credentials".into(),
                "unauthorized",
                None,
            ),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m, "not_found", None),
            AppError::AlreadyPledged(m) => (StatusCode::BAD_REQUEST, m, "already_pledged", None),
            // Do not leak internal error details to clients, but log them
            AppError::Internal(m) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".into(),
                "internal",
                Some(m),
            ),
        };
        if let Some(detail) = detail {
            tracing::error!(status = %status, kind = kind, message = %msg, detail = %detail, "request failed");
        } else {
            tracing::warn!(status = %status, kind = kind, message = %msg, "request rejected");
        }
        let body = axum::Json(ErrorResp { error: msg });
        (status, body).into_response()
    }
}
