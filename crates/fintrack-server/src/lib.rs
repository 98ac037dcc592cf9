//! Fintrack Web Server
//!
//! Axum-based REST API for the Fintrack personal finance application.
//!
//! Security features:
//! - Session token authentication (tokens stored hashed, never plaintext)
//! - Login rate limiting with a lockout window
//! - Restrictive CORS policy
//! - Sanitized error responses (internals logged, never returned)

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use fintrack_core::db::Database;
use fintrack_core::models::User;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// The authenticated user for one request, attached by the auth middleware
///
/// Handlers take this as an `Extension` so the identity is always explicit
/// in the signature, never read from ambient state.
#[derive(Clone)]
pub struct CurrentUser(pub Arc<User>);

impl CurrentUser {
    /// Error unless this user is an admin
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.is_admin {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin access required"))
        }
    }
}

/// Authentication middleware - validates the bearer session token
///
/// On success the owning user is attached to the request as `CurrentUser`.
/// Expired tokens and deactivated users are rejected the same way as
/// missing ones.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        warn!(path = %request.uri().path(), "Unauthorized request - no session token");
        return unauthorized_response();
    };

    match state.db.validate_session(&token) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(Arc::new(user)));
            next.run(request).await
        }
        Ok(None) => {
            warn!(path = %request.uri().path(), "Unauthorized request - invalid session token");
            unauthorized_response()
        }
        Err(e) => {
            error!(error = %e, "Session validation failed");
            AppError::internal("An internal error occurred").into_response()
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // Routes reachable without a session
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/setup-admin", post(handlers::setup_admin));

    let protected_routes = Router::new()
        // Auth
        .route("/auth/logout", post(handlers::logout))
        .route("/me", get(handlers::get_me))
        .route("/me/credentials", put(handlers::update_credentials))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/recent", get(handlers::recent_transactions))
        .route("/transactions/search", get(handlers::search_transactions))
        .route("/transactions/export", get(handlers::export_transactions))
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route("/budgets/status", get(handlers::budget_status))
        .route(
            "/budgets/:id",
            put(handlers::update_budget).delete(handlers::delete_budget),
        )
        // Savings goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/goals/:id",
            get(handlers::get_goal).delete(handlers::delete_goal),
        )
        .route("/goals/:id/progress", put(handlers::update_goal_progress))
        .route("/goals/:id/status", put(handlers::set_goal_status))
        // Reports
        .route("/reports/summary", get(handlers::report_summary))
        .route("/reports/categories", get(handlers::report_categories))
        .route("/reports/hourly", get(handlers::report_hourly))
        .route("/reports/monthly", get(handlers::report_monthly))
        .route("/balance", get(handlers::get_balance))
        // Insights
        .route("/insights", get(handlers::get_insights))
        // Settings
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        // Admin
        .route("/admin/users", get(handlers::admin_list_users))
        .route("/admin/users/:id/toggle", post(handlers::admin_toggle_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    // Stale sessions accumulate between restarts; clear them up front
    match db.purge_expired_sessions() {
        Ok(purged) if purged > 0 => info!(purged, "Purged expired sessions"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn forbidden(msg: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

/// Map core errors onto HTTP statuses
///
/// Domain variants carry their message through; infrastructure errors are
/// sanitized to a generic 500 and logged instead.
impl From<fintrack_core::Error> for AppError {
    fn from(err: fintrack_core::Error) -> Self {
        use fintrack_core::Error as CoreError;
        match err {
            CoreError::NotFound(msg) => Self::not_found(&msg),
            CoreError::Conflict(msg) => Self::conflict(&msg),
            CoreError::InvalidData(msg) | CoreError::Password(msg) => Self::bad_request(&msg),
            CoreError::Unauthorized(msg) => Self::unauthorized(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
