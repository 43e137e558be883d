//! tool_catalog
//!
//! 画像付きアイテムを持つ「ツール」のカタログサービス。
//! 画像はクライアントとは base64 の data URI、ストアとは生バイト列でやり取りする。

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sqlite; // SQLite backend
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{CatalogError, CatalogResult};
pub use services::CatalogService;
pub use sqlite::SqliteToolStore;

// Ensure .env is loaded for tests before anything else runs in the test process.
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}
