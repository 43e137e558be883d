//! カタログ操作のエラー分類
//!
//! `NotFound` / `Conflict` は呼び出し側が回復可能な想定内の結果、
//! `MalformedPayload` / `StoreFailure` は汎用的な失敗として扱う。

use thiserror::Error;

/// ストア由来の不透明なエラー
pub type BoxedStoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// 画像ペイロードが base64 としてデコードできない
    #[error("malformed image payload: {0}")]
    MalformedPayload(String),

    /// name / acronym の重複
    #[error("conflict: {0}")]
    Conflict(String),

    /// キーに一致するレコードが無い
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store failure: {0}")]
    StoreFailure(#[source] BoxedStoreError),
}

impl CatalogError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// name / acronym 重複時の共通エラー
    pub fn duplicate() -> Self {
        Self::Conflict("a tool with the same name or acronym already exists".to_string())
    }

    pub fn store(err: impl Into<BoxedStoreError>) -> Self {
        Self::StoreFailure(err.into())
    }

    /// 呼び出し側が回復可能な結果か (NotFound / Conflict)
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Conflict(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::store(err)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
