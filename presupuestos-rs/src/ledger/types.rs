//! Ledger types and request structures

use serde::{Deserialize, Serialize};

/// Organizational unit to which spending is attributed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: i64,
    pub nombre: String,
    pub departamento: String,
}

/// Supplier master record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    /// Display name, unique across suppliers
    pub nombre: String,
    /// Legal name
    pub razonsocial: String,
    pub contacto: String,
    /// Tax id
    pub cuit: String,
    /// Trade category
    pub rubro: String,
    pub ubicacion: String,
}

/// Product master record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    pub categoria: String,
    pub cantidad: i64,
}

/// A stored quote row (proveedores_productos)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub proveedor_id: i64,
    pub producto_id: i64,
    pub precio: f64,
    pub fecha: String,
    pub centro_costo_id: i64,
    /// Stored attachment filename, if a document was uploaded
    pub adjunto: Option<String>,
}

/// A quote joined with supplier/product/cost-center names, as shown in listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLine {
    pub id: i64,
    pub fecha: String,
    pub producto: String,
    pub precio: f64,
    pub proveedor: String,
    pub centro_costo: String,
    pub adjunto: Option<String>,
}

/// Fields for creating a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupplierRequest {
    pub nombre: String,
    pub razonsocial: String,
    pub contacto: String,
    pub cuit: String,
    pub rubro: String,
    pub ubicacion: String,
}

/// Fields for creating a product explicitly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub nombre: String,
    pub categoria: String,
    pub cantidad: i64,
}

/// Fields for creating a quote
///
/// The supplier and cost center are referenced by id and must exist. The
/// product is referenced by name and is created on the fly when unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuoteRequest {
    pub proveedor_id: i64,
    pub producto: String,
    pub precio: f64,
    pub fecha: String,
    pub centro_costo_id: i64,
    pub adjunto: Option<String>,
}
