//! Ledger manager for CRUD operations over the quote tables

use crate::error::{LedgerError, Result};
use crate::ledger::types::{
    CostCenter, CreateProductRequest, CreateQuoteRequest, CreateSupplierRequest, Product, Quote,
    QuoteLine, Supplier,
};
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

/// The nine cost centers seeded on first run. Seeding is keyed by `nombre`,
/// so re-running it never duplicates rows.
const COST_CENTER_SEED: &[(&str, &str)] = &[
    ("Administración Central", "Administración"),
    ("Compras y Abastecimiento", "Compras"),
    ("Ventas Mayoristas", "Comercial"),
    ("Planta de Producción", "Producción"),
    ("Logística y Depósito", "Logística"),
    ("Mantenimiento Edilicio", "Mantenimiento"),
    ("Sistemas", "Tecnología"),
    ("Recursos Humanos", "Recursos Humanos"),
    ("Marketing", "Comercial"),
];

/// Manages quote ledger persistence
#[derive(Clone)]
pub struct LedgerManager {
    db: SqlitePool,
}

impl LedgerManager {
    /// Create a new ledger manager
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the ledger tables
    ///
    /// Idempotent: tables and indexes are created only if absent, and a
    /// legacy `proveedores_productos` table without the `adjunto` column is
    /// upgraded in place with an additive `ALTER TABLE`, preserving rows.
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS centros_costos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT NOT NULL,
                departamento TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS proveedores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT NOT NULL,
                razonsocial TEXT NOT NULL,
                contacto TEXT NOT NULL,
                cuit TEXT NOT NULL,
                rubro TEXT NOT NULL,
                ubicacion TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS productos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT NOT NULL,
                categoria TEXT NOT NULL,
                cantidad INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS proveedores_productos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                proveedor_id INTEGER NOT NULL,
                producto_id INTEGER NOT NULL,
                precio REAL NOT NULL,
                fecha TEXT,
                centro_costo_id INTEGER NOT NULL,
                adjunto TEXT
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        // Databases created before attachments existed lack the adjunto
        // column. Add it in place instead of dropping the table.
        let columns = sqlx::query("PRAGMA table_info(proveedores_productos)")
            .fetch_all(&self.db)
            .await?;
        let has_adjunto = columns.iter().any(|row| {
            row.try_get::<String, _>("name")
                .map(|name| name == "adjunto")
                .unwrap_or(false)
        });
        if !has_adjunto {
            info!("Adding adjunto column to proveedores_productos");
            sqlx::query("ALTER TABLE proveedores_productos ADD COLUMN adjunto TEXT")
                .execute(&self.db)
                .await?;
        }

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_centros_costos_nombre ON centros_costos(nombre)",
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_proveedores_nombre ON proveedores(nombre)",
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_productos_nombre ON productos(nombre)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Seed the fixed cost center list, skipping names that already exist
    pub async fn seed_cost_centers(&self) -> Result<()> {
        for (nombre, departamento) in COST_CENTER_SEED {
            sqlx::query(
                "INSERT OR IGNORE INTO centros_costos (nombre, departamento) VALUES (?, ?)",
            )
            .bind(nombre)
            .bind(departamento)
            .execute(&self.db)
            .await?;
        }
        Ok(())
    }

    /// List all cost centers
    pub async fn list_cost_centers(&self) -> Result<Vec<CostCenter>> {
        let rows = sqlx::query("SELECT id, nombre, departamento FROM centros_costos ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(row_to_cost_center).collect()
    }

    /// List all suppliers
    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        let rows = sqlx::query(
            "SELECT id, nombre, razonsocial, contacto, cuit, rubro, ubicacion FROM proveedores ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(row_to_supplier).collect()
    }

    /// Create a supplier
    ///
    /// A duplicate `nombre` aborts the write with the underlying constraint
    /// violation.
    pub async fn create_supplier(&self, request: &CreateSupplierRequest) -> Result<Supplier> {
        if request.nombre.trim().is_empty() {
            return Err(LedgerError::Validation(
                "supplier nombre must not be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO proveedores (nombre, razonsocial, contacto, cuit, rubro, ubicacion)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.nombre)
        .bind(&request.razonsocial)
        .bind(&request.contacto)
        .bind(&request.cuit)
        .bind(&request.rubro)
        .bind(&request.ubicacion)
        .execute(&self.db)
        .await
        .map_err(|e| {
            warn!("Failed to insert supplier {}: {}", request.nombre, e);
            e
        })?;

        Ok(Supplier {
            id: result.last_insert_rowid(),
            nombre: request.nombre.clone(),
            razonsocial: request.razonsocial.clone(),
            contacto: request.contacto.clone(),
            cuit: request.cuit.clone(),
            rubro: request.rubro.clone(),
            ubicacion: request.ubicacion.clone(),
        })
    }

    /// Delete a supplier by id
    ///
    /// No cascade: quotes referencing the supplier are kept and simply drop
    /// out of join listings.
    pub async fn delete_supplier(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM proveedores WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound(format!("supplier {}", id)));
        }
        Ok(())
    }

    /// Look up a supplier id by name. Convenience helper only; the stable
    /// interface convention is the numeric id.
    pub async fn supplier_id_by_name(&self, nombre: &str) -> Result<i64> {
        let row = sqlx::query("SELECT id FROM proveedores WHERE nombre = ?")
            .bind(nombre)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => Ok(row.try_get("id")?),
            None => Err(LedgerError::NotFound(format!("supplier '{}'", nombre))),
        }
    }

    /// List all products
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT id, nombre, categoria, cantidad FROM productos ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(row_to_product).collect()
    }

    /// Create a product explicitly
    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product> {
        if request.nombre.trim().is_empty() {
            return Err(LedgerError::Validation(
                "product nombre must not be empty".to_string(),
            ));
        }

        let result = sqlx::query("INSERT INTO productos (nombre, categoria, cantidad) VALUES (?, ?, ?)")
            .bind(&request.nombre)
            .bind(&request.categoria)
            .bind(request.cantidad)
            .execute(&self.db)
            .await
            .map_err(|e| {
                warn!("Failed to insert product {}: {}", request.nombre, e);
                e
            })?;

        Ok(Product {
            id: result.last_insert_rowid(),
            nombre: request.nombre.clone(),
            categoria: request.categoria.clone(),
            cantidad: request.cantidad,
        })
    }

    /// Resolve a product by name, creating it with empty category and zero
    /// quantity when absent. Returns the product id.
    async fn resolve_or_create_product(&self, nombre: &str) -> Result<i64> {
        let row = sqlx::query("SELECT id FROM productos WHERE nombre = ?")
            .bind(nombre)
            .fetch_optional(&self.db)
            .await?;

        if let Some(row) = row {
            return Ok(row.try_get("id")?);
        }

        info!("Auto-creating product '{}'", nombre);
        let result = sqlx::query("INSERT INTO productos (nombre, categoria, cantidad) VALUES (?, '', 0)")
            .bind(nombre)
            .execute(&self.db)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// List quotes joined with supplier, product and cost center names
    ///
    /// With a filter, only rows whose supplier or product name contains the
    /// substring (case-insensitive) are returned.
    pub async fn list_quotes(&self, filter: Option<&str>) -> Result<Vec<QuoteLine>> {
        const BASE_QUERY: &str = r#"
            SELECT pp.id, pp.fecha, pr.nombre AS producto, pp.precio,
                   p.nombre AS proveedor, cc.nombre AS centro_costo, pp.adjunto
            FROM proveedores_productos pp
            JOIN proveedores p ON pp.proveedor_id = p.id
            JOIN productos pr ON pp.producto_id = pr.id
            JOIN centros_costos cc ON pp.centro_costo_id = cc.id
        "#;

        let rows = match filter {
            Some(f) if !f.trim().is_empty() => {
                let pattern = format!("%{}%", f.trim());
                let query = format!(
                    "{} WHERE p.nombre LIKE ? OR pr.nombre LIKE ? ORDER BY pp.id",
                    BASE_QUERY
                );
                sqlx::query(&query)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_all(&self.db)
                    .await?
            }
            _ => {
                let query = format!("{} ORDER BY pp.id", BASE_QUERY);
                sqlx::query(&query).fetch_all(&self.db).await?
            }
        };

        rows.into_iter().map(row_to_quote_line).collect()
    }

    /// Create a quote
    ///
    /// The supplier and cost center must exist; the product is created on
    /// the fly when its name is unknown.
    pub async fn create_quote(&self, request: &CreateQuoteRequest) -> Result<Quote> {
        if request.producto.trim().is_empty() {
            return Err(LedgerError::Validation(
                "product nombre must not be empty".to_string(),
            ));
        }
        if !request.precio.is_finite() || request.precio < 0.0 {
            return Err(LedgerError::Validation(format!(
                "precio must be a non-negative number, got {}",
                request.precio
            )));
        }

        let supplier = sqlx::query("SELECT id FROM proveedores WHERE id = ?")
            .bind(request.proveedor_id)
            .fetch_optional(&self.db)
            .await?;
        if supplier.is_none() {
            return Err(LedgerError::NotFound(format!(
                "supplier {}",
                request.proveedor_id
            )));
        }

        let cost_center = sqlx::query("SELECT id FROM centros_costos WHERE id = ?")
            .bind(request.centro_costo_id)
            .fetch_optional(&self.db)
            .await?;
        if cost_center.is_none() {
            return Err(LedgerError::NotFound(format!(
                "cost center {}",
                request.centro_costo_id
            )));
        }

        let producto_id = self.resolve_or_create_product(request.producto.trim()).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO proveedores_productos (proveedor_id, producto_id, precio, fecha, centro_costo_id, adjunto)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.proveedor_id)
        .bind(producto_id)
        .bind(request.precio)
        .bind(&request.fecha)
        .bind(request.centro_costo_id)
        .bind(&request.adjunto)
        .execute(&self.db)
        .await?;

        Ok(Quote {
            id: result.last_insert_rowid(),
            proveedor_id: request.proveedor_id,
            producto_id,
            precio: request.precio,
            fecha: request.fecha.clone(),
            centro_costo_id: request.centro_costo_id,
            adjunto: request.adjunto.clone(),
        })
    }

    /// Get a stored quote row by id
    pub async fn get_quote(&self, id: i64) -> Result<Option<Quote>> {
        let row = sqlx::query(
            r#"
            SELECT id, proveedor_id, producto_id, precio, fecha, centro_costo_id, adjunto
            FROM proveedores_productos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_quote(row)?)),
            None => Ok(None),
        }
    }

    /// Delete a quote by id
    pub async fn delete_quote(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM proveedores_productos WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound(format!("quote {}", id)));
        }
        Ok(())
    }
}

fn row_to_cost_center(row: sqlx::sqlite::SqliteRow) -> Result<CostCenter> {
    Ok(CostCenter {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        departamento: row.try_get("departamento")?,
    })
}

fn row_to_supplier(row: sqlx::sqlite::SqliteRow) -> Result<Supplier> {
    Ok(Supplier {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        razonsocial: row.try_get("razonsocial")?,
        contacto: row.try_get("contacto")?,
        cuit: row.try_get("cuit")?,
        rubro: row.try_get("rubro")?,
        ubicacion: row.try_get("ubicacion")?,
    })
}

fn row_to_product(row: sqlx::sqlite::SqliteRow) -> Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        categoria: row.try_get("categoria")?,
        cantidad: row.try_get("cantidad")?,
    })
}

fn row_to_quote(row: sqlx::sqlite::SqliteRow) -> Result<Quote> {
    Ok(Quote {
        id: row.try_get("id")?,
        proveedor_id: row.try_get("proveedor_id")?,
        producto_id: row.try_get("producto_id")?,
        precio: row.try_get("precio")?,
        fecha: row.try_get("fecha").unwrap_or_default(),
        centro_costo_id: row.try_get("centro_costo_id")?,
        adjunto: row.try_get("adjunto").unwrap_or_default(),
    })
}

fn row_to_quote_line(row: sqlx::sqlite::SqliteRow) -> Result<QuoteLine> {
    Ok(QuoteLine {
        id: row.try_get("id")?,
        fecha: row.try_get("fecha").unwrap_or_default(),
        producto: row.try_get("producto")?,
        precio: row.try_get("precio")?,
        proveedor: row.try_get("proveedor")?,
        centro_costo: row.try_get("centro_costo")?,
        adjunto: row.try_get("adjunto").unwrap_or_default(),
    })
}
