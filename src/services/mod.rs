//! サービス層
//!
//! HTTP 層から独立したビジネスロジック。

pub mod catalog_service;

pub use catalog_service::{CatalogService, ToolKey};
