use askama_axum::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::error::LedgerError;
use crate::ledger::types::{
    CostCenter, CreateQuoteRequest, CreateSupplierRequest, QuoteLine, Supplier,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    presupuestos: Vec<QuoteLine>,
    buscar: String,
}

#[derive(Template)]
#[template(path = "agregar_presupuesto.html")]
struct AddQuoteTemplate {
    proveedores: Vec<Supplier>,
    centros_costos: Vec<CostCenter>,
    fecha_hoy: String,
    error: String,
}

#[derive(Template)]
#[template(path = "proveedores.html")]
struct SuppliersTemplate {
    proveedores: Vec<Supplier>,
    success: String,
    error: String,
}

#[derive(Deserialize)]
pub struct CreateSupplierForm {
    nombre: String,
    razonsocial: String,
    contacto: String,
    cuit: String,
    rubro: String,
    ubicacion: String,
}

// Quote listing page, with optional substring search
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let buscar = params.get("buscar").cloned().unwrap_or_default();
    let filter = if buscar.trim().is_empty() {
        None
    } else {
        Some(buscar.as_str())
    };

    match state.ledger.list_quotes(filter).await {
        Ok(presupuestos) => IndexTemplate {
            presupuestos,
            buscar,
        }
        .into_response(),
        Err(e) => {
            warn!("Failed to list quotes: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}

// Add-quote form page (GET)
pub async fn add_quote_page(State(state): State<Arc<AppState>>) -> Response {
    render_add_quote(&state, String::new()).await
}

// Add-quote form submission (POST, multipart because of the attachment)
pub async fn add_quote_submit(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut proveedor_id = None;
    let mut producto = None;
    let mut precio = None;
    let mut fecha = None;
    let mut centro_costo_id = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(|s| s.to_string());

        match name.as_deref() {
            Some("proveedor_id") => {
                proveedor_id = field.text().await.ok();
            }
            Some("producto") => {
                producto = field.text().await.ok();
            }
            Some("precio") => {
                precio = field.text().await.ok();
            }
            Some("fecha") => {
                fecha = field.text().await.ok();
            }
            Some("centro_costo_id") => {
                centro_costo_id = field.text().await.ok();
            }
            Some("adjunto") => {
                let filename = field.file_name().map(|s| s.to_string());
                if let (Some(filename), Ok(bytes)) = (filename, field.bytes().await) {
                    if !filename.is_empty() && !bytes.is_empty() {
                        upload = Some((filename, bytes.to_vec()));
                    }
                }
            }
            _ => {}
        }
    }

    let proveedor_id = match proveedor_id.as_deref().map(str::parse::<i64>) {
        Some(Ok(id)) => id,
        _ => return render_add_quote(&state, "Falta el proveedor".to_string()).await,
    };
    let centro_costo_id = match centro_costo_id.as_deref().map(str::parse::<i64>) {
        Some(Ok(id)) => id,
        _ => return render_add_quote(&state, "Falta el centro de costo".to_string()).await,
    };
    let producto = match producto {
        Some(p) if !p.trim().is_empty() => p,
        _ => return render_add_quote(&state, "Falta el producto".to_string()).await,
    };
    let precio = match precio.as_deref().map(str::parse::<f64>) {
        Some(Ok(p)) => p,
        _ => return render_add_quote(&state, "Precio inválido".to_string()).await,
    };
    let fecha = fecha.unwrap_or_default();

    let adjunto = match upload {
        Some((filename, bytes)) => match state.attachments.store(&filename, &bytes).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!("Failed to store attachment: {}", e);
                return render_add_quote(&state, format!("No se pudo guardar el adjunto: {}", e))
                    .await;
            }
        },
        None => None,
    };

    let request = CreateQuoteRequest {
        proveedor_id,
        producto,
        precio,
        fecha,
        centro_costo_id,
        adjunto,
    };

    match state.ledger.create_quote(&request).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e @ (LedgerError::NotFound(_) | LedgerError::Validation(_))) => {
            render_add_quote(&state, format!("Error: {}", e)).await
        }
        Err(e) => {
            warn!("Failed to create quote: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}

// Supplier listing plus creation form
pub async fn suppliers_page(State(state): State<Arc<AppState>>) -> Response {
    render_suppliers(&state, String::new(), String::new()).await
}

// Create supplier (POST)
pub async fn create_supplier_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateSupplierForm>,
) -> Response {
    let request = CreateSupplierRequest {
        nombre: form.nombre,
        razonsocial: form.razonsocial,
        contacto: form.contacto,
        cuit: form.cuit,
        rubro: form.rubro,
        ubicacion: form.ubicacion,
    };

    match state.ledger.create_supplier(&request).await {
        Ok(supplier) => {
            render_suppliers(
                &state,
                format!("Proveedor {} creado", supplier.nombre),
                String::new(),
            )
            .await
        }
        Err(e) => {
            render_suppliers(&state, String::new(), format!("No se pudo crear: {}", e)).await
        }
    }
}

// Delete quote then return to the listing (POST)
pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.ledger.delete_quote(id).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e @ LedgerError::NotFound(_)) => {
            (StatusCode::BAD_REQUEST, format!("Error: {}", e)).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
    }
}

// Delete supplier then return to the supplier page (POST)
pub async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.ledger.delete_supplier(id).await {
        Ok(_) => Redirect::to("/proveedores").into_response(),
        Err(e @ LedgerError::NotFound(_)) => {
            (StatusCode::BAD_REQUEST, format!("Error: {}", e)).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
    }
}

async fn render_add_quote(state: &Arc<AppState>, error: String) -> Response {
    let proveedores = state.ledger.list_suppliers().await.unwrap_or_default();
    let centros_costos = state.ledger.list_cost_centers().await.unwrap_or_default();

    let template = AddQuoteTemplate {
        proveedores,
        centros_costos,
        fecha_hoy: chrono::Local::now().format("%Y-%m-%d").to_string(),
        error,
    };

    if template.error.is_empty() {
        template.into_response()
    } else {
        (StatusCode::BAD_REQUEST, template).into_response()
    }
}

async fn render_suppliers(state: &Arc<AppState>, success: String, error: String) -> Response {
    let proveedores = state.ledger.list_suppliers().await.unwrap_or_default();

    SuppliersTemplate {
        proveedores,
        success,
        error,
    }
    .into_response()
}
