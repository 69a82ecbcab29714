//! Integration tests for the quote ledger store

use presupuestos_rs::error::LedgerError;
use presupuestos_rs::ledger::types::{CreateQuoteRequest, CreateSupplierRequest};
use presupuestos_rs::ledger::LedgerManager;
use sqlx::SqlitePool;

/// Helper to create an in-memory database for testing
async fn setup_test_ledger() -> LedgerManager {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

    let ledger = LedgerManager::new(pool);
    ledger.init_db().await.unwrap();
    ledger.seed_cost_centers().await.unwrap();

    ledger
}

fn acme() -> CreateSupplierRequest {
    CreateSupplierRequest {
        nombre: "Acme".to_string(),
        razonsocial: "Acme S.A.".to_string(),
        contacto: "ventas@acme.test".to_string(),
        cuit: "30-1".to_string(),
        rubro: "Ferreteria".to_string(),
        ubicacion: "Rosario".to_string(),
    }
}

fn quote_for(proveedor_id: i64, producto: &str, centro_costo_id: i64) -> CreateQuoteRequest {
    CreateQuoteRequest {
        proveedor_id,
        producto: producto.to_string(),
        precio: 12.50,
        fecha: "2024-01-01".to_string(),
        centro_costo_id,
        adjunto: None,
    }
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let ledger = setup_test_ledger().await;

    let centers = ledger.list_cost_centers().await.unwrap();
    assert_eq!(centers.len(), 9);

    // Seeding again must not duplicate anything
    ledger.seed_cost_centers().await.unwrap();
    let centers = ledger.list_cost_centers().await.unwrap();
    assert_eq!(centers.len(), 9);
}

#[tokio::test]
async fn test_init_db_is_idempotent() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    ledger
        .create_quote(&quote_for(supplier.id, "Bolt", 1))
        .await
        .unwrap();

    // Re-running schema setup must not lose any data
    ledger.init_db().await.unwrap();
    ledger.seed_cost_centers().await.unwrap();

    assert_eq!(ledger.list_suppliers().await.unwrap().len(), 1);
    assert_eq!(ledger.list_quotes(None).await.unwrap().len(), 1);
    assert_eq!(ledger.list_cost_centers().await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_create_quote_appears_in_listing() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    ledger
        .create_quote(&quote_for(supplier.id, "Bolt", 1))
        .await
        .unwrap();

    let centers = ledger.list_cost_centers().await.unwrap();
    let center_1 = centers.iter().find(|c| c.id == 1).unwrap();

    let quotes = ledger.list_quotes(None).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].proveedor, "Acme");
    assert_eq!(quotes[0].producto, "Bolt");
    assert_eq!(quotes[0].precio, 12.50);
    assert_eq!(quotes[0].fecha, "2024-01-01");
    assert_eq!(quotes[0].centro_costo, center_1.nombre);
}

#[tokio::test]
async fn test_unknown_product_is_auto_created_once() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    assert!(ledger.list_products().await.unwrap().is_empty());

    let quote = ledger
        .create_quote(&quote_for(supplier.id, "Tornillos", 1))
        .await
        .unwrap();

    let products = ledger.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].nombre, "Tornillos");
    assert_eq!(products[0].categoria, "");
    assert_eq!(products[0].cantidad, 0);
    assert_eq!(quote.producto_id, products[0].id);

    // A second quote for the same product must reuse the row
    ledger
        .create_quote(&quote_for(supplier.id, "Tornillos", 1))
        .await
        .unwrap();
    assert_eq!(ledger.list_products().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_supplier_is_rejected() {
    let ledger = setup_test_ledger().await;

    let result = ledger.create_quote(&quote_for(999, "Bolt", 1)).await;
    assert!(matches!(result, Err(LedgerError::NotFound(_))));
    assert!(ledger.list_quotes(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_cost_center_is_rejected() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    let result = ledger.create_quote(&quote_for(supplier.id, "Bolt", 999)).await;
    assert!(matches!(result, Err(LedgerError::NotFound(_))));
    assert!(ledger.list_quotes(None).await.unwrap().is_empty());
    // References are checked before product resolution, so the rejected
    // quote leaves no stray auto-created product behind
    assert!(ledger.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_supplier_orphans_quotes() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    let quote = ledger
        .create_quote(&quote_for(supplier.id, "Bolt", 1))
        .await
        .unwrap();

    ledger.delete_supplier(supplier.id).await.unwrap();

    // No cascade: the row is still there, but the join listing omits it
    assert!(ledger.get_quote(quote.id).await.unwrap().is_some());
    assert!(ledger.list_quotes(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_supplier_name_is_rejected() {
    let ledger = setup_test_ledger().await;

    ledger.create_supplier(&acme()).await.unwrap();
    let result = ledger.create_supplier(&acme()).await;
    assert!(matches!(result, Err(LedgerError::Database(_))));
    assert_eq!(ledger.list_suppliers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_filter_matches_supplier_or_product() {
    let ledger = setup_test_ledger().await;

    let ferreteria = ledger
        .create_supplier(&CreateSupplierRequest {
            nombre: "Ferreteria Sur".to_string(),
            ..acme()
        })
        .await
        .unwrap();
    let pinturas = ledger
        .create_supplier(&CreateSupplierRequest {
            nombre: "Pinturas Norte".to_string(),
            ..acme()
        })
        .await
        .unwrap();

    ledger
        .create_quote(&quote_for(ferreteria.id, "Bulones", 1))
        .await
        .unwrap();
    ledger
        .create_quote(&quote_for(pinturas.id, "Latex", 2))
        .await
        .unwrap();

    // Match against the supplier name, case-insensitive
    let hits = ledger.list_quotes(Some("ferre")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].producto, "Bulones");

    // Match against the product name
    let hits = ledger.list_quotes(Some("LATEX")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].proveedor, "Pinturas Norte");

    let hits = ledger.list_quotes(Some("zzz")).await.unwrap();
    assert!(hits.is_empty());

    // A blank filter behaves like no filter
    let hits = ledger.list_quotes(Some("  ")).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_delete_quote() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    let quote = ledger
        .create_quote(&quote_for(supplier.id, "Bolt", 1))
        .await
        .unwrap();

    ledger.delete_quote(quote.id).await.unwrap();
    assert!(ledger.list_quotes(None).await.unwrap().is_empty());
    assert!(ledger.get_quote(quote.id).await.unwrap().is_none());

    let result = ledger.delete_quote(quote.id).await;
    assert!(matches!(result, Err(LedgerError::NotFound(_))));
}

#[tokio::test]
async fn test_supplier_id_by_name_helper() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    assert_eq!(ledger.supplier_id_by_name("Acme").await.unwrap(), supplier.id);

    let result = ledger.supplier_id_by_name("Desconocido").await;
    assert!(matches!(result, Err(LedgerError::NotFound(_))));
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    let mut request = quote_for(supplier.id, "Bolt", 1);
    request.precio = -1.0;

    let result = ledger.create_quote(&request).await;
    assert!(matches!(result, Err(LedgerError::Validation(_))));
}

#[tokio::test]
async fn test_duplicate_quotes_are_allowed() {
    let ledger = setup_test_ledger().await;

    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    ledger
        .create_quote(&quote_for(supplier.id, "Bolt", 1))
        .await
        .unwrap();
    ledger
        .create_quote(&quote_for(supplier.id, "Bolt", 1))
        .await
        .unwrap();

    // It is a history ledger: same supplier/product/date twice is fine
    assert_eq!(ledger.list_quotes(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_legacy_table_is_migrated_in_place() {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

    // A database from before attachments existed: no adjunto column
    sqlx::query(
        r#"
        CREATE TABLE proveedores_productos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            proveedor_id INTEGER NOT NULL,
            producto_id INTEGER NOT NULL,
            precio REAL NOT NULL,
            fecha TEXT,
            centro_costo_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO proveedores_productos (proveedor_id, producto_id, precio, fecha, centro_costo_id) VALUES (1, 1, 5.0, '2023-06-01', 1)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let ledger = LedgerManager::new(pool);
    ledger.init_db().await.unwrap();

    // The legacy row survived the migration and the new column reads as NULL
    let quote = ledger.get_quote(1).await.unwrap().unwrap();
    assert_eq!(quote.precio, 5.0);
    assert_eq!(quote.fecha, "2023-06-01");
    assert!(quote.adjunto.is_none());

    // And new rows can carry an attachment
    ledger.seed_cost_centers().await.unwrap();
    let supplier = ledger.create_supplier(&acme()).await.unwrap();
    let mut request = quote_for(supplier.id, "Bolt", 1);
    request.adjunto = Some("abc_factura.pdf".to_string());
    let quote = ledger.create_quote(&request).await.unwrap();
    assert_eq!(
        ledger.get_quote(quote.id).await.unwrap().unwrap().adjunto,
        Some("abc_factura.pdf".to_string())
    );
}
