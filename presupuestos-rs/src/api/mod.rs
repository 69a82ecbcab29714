//! HTTP surface for the quote ledger
//!
//! JSON endpoints under `/api` plus the server-rendered pages.

pub mod handlers;
pub mod server;
pub mod web;

pub use server::ApiServer;
