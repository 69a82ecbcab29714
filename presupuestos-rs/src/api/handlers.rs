//! JSON API request handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::LedgerError;
use crate::ledger::types::{
    CostCenter, CreateProductRequest, CreateQuoteRequest, CreateSupplierRequest, Product, Quote,
    QuoteLine, Supplier,
};
use crate::ledger::LedgerManager;
use crate::storage::AttachmentStorage;

/// Shared application state
pub struct AppState {
    pub ledger: LedgerManager,
    pub attachments: AttachmentStorage,
}

/// Response with error details
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

/// Map a ledger error onto a status code and JSON body. Bad references and
/// malformed input are the client's fault; everything else is ours.
fn error_response(err: LedgerError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        LedgerError::Validation(_) | LedgerError::NotFound(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("Request failed: {}", err);
    (status, Json(ApiError::new(&err.to_string())))
}

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/presupuestos?buscar= - List quotes, optionally filtered
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<QuoteLine>>, (StatusCode, Json<ApiError>)> {
    let buscar = params.get("buscar").map(|s| s.as_str());
    state
        .ledger
        .list_quotes(buscar)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/presupuestos - Create a quote
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<Quote>), (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .create_quote(&request)
        .await
        .map(|quote| (StatusCode::CREATED, Json(quote)))
        .map_err(error_response)
}

/// DELETE /api/presupuestos/:id - Delete a quote
pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .delete_quote(id)
        .await
        .map(|_| StatusCode::OK)
        .map_err(error_response)
}

/// GET /api/proveedores - List suppliers
pub async fn list_suppliers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Supplier>>, (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .list_suppliers()
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/proveedores - Create a supplier
pub async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<Supplier>), (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .create_supplier(&request)
        .await
        .map(|supplier| (StatusCode::CREATED, Json(supplier)))
        .map_err(error_response)
}

/// DELETE /api/proveedores/:id - Delete a supplier
pub async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .delete_supplier(id)
        .await
        .map(|_| StatusCode::OK)
        .map_err(error_response)
}

/// GET /api/productos - List products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .list_products()
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/productos - Create a product
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .create_product(&request)
        .await
        .map(|product| (StatusCode::CREATED, Json(product)))
        .map_err(error_response)
}

/// GET /api/centros_costos - List cost centers
pub async fn list_cost_centers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CostCenter>>, (StatusCode, Json<ApiError>)> {
    state
        .ledger
        .list_cost_centers()
        .await
        .map(Json)
        .map_err(error_response)
}
