//! Add a supplier to the ledger database

use presupuestos_rs::ledger::types::CreateSupplierRequest;
use presupuestos_rs::ledger::LedgerManager;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 7 {
        eprintln!(
            "Usage: {} <nombre> <razonsocial> <contacto> <cuit> <rubro> <ubicacion>",
            args[0]
        );
        eprintln!(
            "Example: {} Acme \"Acme S.A.\" ventas@acme.test 30-11111111-1 Ferreteria Rosario",
            args[0]
        );
        std::process::exit(1);
    }

    let request = CreateSupplierRequest {
        nombre: args[1].clone(),
        razonsocial: args[2].clone(),
        contacto: args[3].clone(),
        cuit: args[4].clone(),
        rubro: args[5].clone(),
        ubicacion: args[6].clone(),
    };

    println!("Adding supplier: {}", request.nombre);

    let options = SqliteConnectOptions::from_str("sqlite://empresa.db")?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    let ledger = LedgerManager::new(pool);
    ledger.init_db().await?;
    let supplier = ledger.create_supplier(&request).await?;

    println!("Supplier added successfully");
    println!("   Id: {}", supplier.id);
    println!("   Nombre: {}", supplier.nombre);

    Ok(())
}
