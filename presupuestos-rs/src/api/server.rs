//! HTTP server wiring for the JSON API and the web pages

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{handlers, web};
use crate::api::handlers::AppState;
use crate::ledger::LedgerManager;
use crate::storage::AttachmentStorage;

/// Maximum accepted request body, sized for quote attachments
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// HTTP server for the quote ledger
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new server
    pub fn new(ledger: LedgerManager, attachments: AttachmentStorage, addr: String) -> Self {
        let state = Arc::new(AppState {
            ledger,
            attachments,
        });

        Self { state, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let api_routes = Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/presupuestos",
                get(handlers::list_quotes).post(handlers::create_quote),
            )
            .route("/presupuestos/:id", delete(handlers::delete_quote))
            .route(
                "/proveedores",
                get(handlers::list_suppliers).post(handlers::create_supplier),
            )
            .route("/proveedores/:id", delete(handlers::delete_supplier))
            .route(
                "/productos",
                get(handlers::list_products).post(handlers::create_product),
            )
            .route("/centros_costos", get(handlers::list_cost_centers));

        let web_routes = Router::new()
            .route("/", get(web::index))
            .route(
                "/agregar_presupuesto",
                get(web::add_quote_page).post(web::add_quote_submit),
            )
            .route(
                "/proveedores",
                get(web::suppliers_page).post(web::create_supplier_submit),
            )
            .route("/presupuestos/:id/eliminar", post(web::delete_quote))
            .route("/proveedores/:id/eliminar", post(web::delete_supplier));

        Router::new()
            .nest("/api", api_routes)
            .merge(web_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .with_state(self.state.clone())
    }

    /// Start the server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting HTTP server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
