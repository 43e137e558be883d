//! 永続化層の抽象 (ドキュメントストア風の契約)
//!
//! 実装は `crate::sqlite::SqliteToolStore` を参照。

use crate::error::CatalogResult;
use crate::models::{NewTool, StoredTool, ToolId};

/// レコード検索条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolFilter {
    All,
    Id(ToolId),
    Name(String),
    /// name または acronym のどちらかが一致
    NameOrAcronym { name: String, acronym: String },
}

/// ツールレコードのストア。
///
/// 各メソッドは単一の読み取りまたは単一の書き込みで、書き込みは全か無か。
/// 一意制約違反は `CatalogError::Conflict`、それ以外の障害は `StoreFailure` で返す。
pub trait ToolStore: Send + Sync {
    fn find(&self, filter: &ToolFilter) -> CatalogResult<Vec<StoredTool>>;

    fn find_one(&self, filter: &ToolFilter) -> CatalogResult<Option<StoredTool>>;

    /// 新規レコードを保存し、採番済みの ID を含めて返す
    fn insert(&self, tool: NewTool) -> CatalogResult<StoredTool>;

    /// 一致したレコードの全フィールドを置き換え、更新後のレコードを返す
    fn find_one_and_update(
        &self,
        filter: &ToolFilter,
        fields: NewTool,
    ) -> CatalogResult<Option<StoredTool>>;

    /// 一致したレコードを削除し、削除したレコードを返す
    fn find_one_and_remove(&self, filter: &ToolFilter) -> CatalogResult<Option<StoredTool>>;
}
