//! HTTP server for the Gwydion API.
//!
//! # Components
//!
//! - **Routes**: authorization flow, calendar scheduling, text generation,
//!   content retrieval, and bot registry endpoints under `/api`
//! - **Sessions**: cookie-keyed per-browser state holding the in-flight
//!   authorization nonce and stored credentials
//! - **Gateway**: calendar access that persists silently refreshed tokens
//! - **OpenAPI**: interactive docs at `/api/docs`
//!
//! # Example
//!
//! ```ignore
//! use gwydion_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::new().with_cors_origin("http://localhost:3000");
//! let server = Server::new(oauth, backend, wiki, config);
//! server.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody, Result};
pub use middleware::SESSION_COOKIE;
pub use session::{SessionId, SessionStore};
pub use state::{AppState, Bot, BotRegistry, NewBot};

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use gwydion_content::WikiClient;
use gwydion_llm::SharedBackend;
use gwydion_oauth::OAuthConfig;

/// The Gwydion HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server from its parts.
    pub fn new(
        oauth: OAuthConfig,
        backend: SharedBackend,
        wiki: WikiClient,
        config: ServerConfig,
    ) -> Self {
        Self {
            state: AppState::new(oauth, backend, wiki, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            // Landing page and health live outside the CORS'd API surface
            .route("/", get(routes::index))
            .merge(routes::health_routes())
            // Interactive API docs
            .merge(routes::swagger_ui())
            .nest("/api", self.api_routes())
            // Session identity for every route
            .layer(from_fn(middleware::session_middleware))
            // Request logging (outer, sees the final status)
            .layer(from_fn_with_state(
                self.state.clone(),
                middleware::request_logging_middleware,
            ))
            // TraceLayer for detailed HTTP tracing
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// API routes.
    fn api_routes(&self) -> Router<AppState> {
        Router::new()
            // Authorization flow
            .route("/authorize", get(routes::authorize_handler))
            .route("/callback", get(routes::callback_handler))
            // Calendar scheduling
            .route("/create-event", post(routes::create_event_handler))
            .route(
                "/schedule-workflow",
                post(routes::schedule_workflow_handler),
            )
            // Text analysis
            .route("/summarize", post(routes::summarize_handler))
            .route("/highlight", post(routes::highlight_handler))
            .route(
                "/sentiment-analysis",
                post(routes::sentiment_analysis_handler),
            )
            .route("/automate-task", post(routes::automate_task_handler))
            // Curriculum generation
            .route("/generate-topics", post(routes::generate_topics_handler))
            .route(
                "/generate-subtopics",
                post(routes::generate_subtopics_handler),
            )
            .route("/generate-modules", post(routes::generate_modules_handler))
            .route(
                "/generate-overview",
                post(routes::generate_overview_handler),
            )
            .route("/generate-quiz", post(routes::generate_quiz_handler))
            // Free-form generation
            .route("/query", post(routes::query_handler))
            .route(
                "/generate-workflow",
                post(routes::generate_workflow_handler),
            )
            // Content
            .route(
                "/retrieve-content",
                post(routes::retrieve_content_handler),
            )
            .route("/upload-file", post(routes::upload_file_handler))
            // Bots
            .route("/my-bots", get(routes::my_bots_handler))
            .route("/create-bot", post(routes::create_bot_handler))
            .layer(self.cors_layer())
    }

    /// CORS layer scoped to the API routes.
    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        match self.state.config.cors_origin.parse::<HeaderValue>() {
            Ok(origin) => layer.allow_origin(origin),
            Err(_) => {
                tracing::warn!(
                    origin = %self.state.config.cors_origin,
                    "Invalid CORS origin, browser calls will be refused"
                );
                layer
            }
        }
    }

    /// Run the server until the process is stopped.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.state.config.bind_address;
        let router = self.router();

        let listener = TcpListener::bind(addr).await?;
        info!(address = %addr, "Server listening");

        axum::serve(listener, router).await
    }
}
