//! CatalogService
//!
//! ツールレコードの CRUD を提供するビジネスロジック層。
//! 書き込み前にアイテムをストレージ形へ、読み出し後にワイヤー形へ変換する。
//! HTTP 層から独立しており、ストアは明示的に注入する。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::codec::{items_to_storage, items_to_wire};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewTool, StoredTool, Tool, ToolId, ToolInput};
use crate::store::{ToolFilter, ToolStore};

/// 単一レコードを指すキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKey {
    Id(ToolId),
    Name(String),
}

impl ToolKey {
    fn filter(&self) -> ToolFilter {
        match self {
            ToolKey::Id(id) => ToolFilter::Id(id.clone()),
            ToolKey::Name(name) => ToolFilter::Name(name.clone()),
        }
    }

    fn not_found(&self) -> CatalogError {
        match self {
            ToolKey::Id(id) => CatalogError::NotFound(format!("no tool with id {id}")),
            ToolKey::Name(name) => CatalogError::NotFound(format!("no tool named {name}")),
        }
    }
}

/// 永続化レコードをワイヤー形に変換
fn to_wire_tool(tool: StoredTool) -> Tool {
    Tool {
        items: items_to_wire(&tool.items),
        id: tool.id,
        name: tool.name,
        acronym: tool.acronym,
        category: tool.category,
    }
}

/// 入力をストレージ形の書き込みペイロードに変換
fn to_new_tool(input: ToolInput) -> CatalogResult<NewTool> {
    let items = items_to_storage(&input.items)?;
    Ok(NewTool {
        name: input.name,
        acronym: input.acronym,
        category: input.category,
        items,
    })
}

/// カタログサービス
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ToolStore>,
}

impl CatalogService {
    /// 新しいCatalogServiceインスタンスを作成
    pub fn new(store: Arc<dyn ToolStore>) -> Self {
        Self { store }
    }

    /// 全ツールを取得 (ページングなし)
    pub fn list(&self) -> CatalogResult<Vec<Tool>> {
        let tools = self.store.find(&ToolFilter::All)?;
        debug!(target: "catalog", count = tools.len(), "listed tools");
        Ok(tools.into_iter().map(to_wire_tool).collect())
    }

    /// ツールを作成
    ///
    /// name か acronym が既存レコードと一致すれば `Conflict` (書き込みなし)。
    /// この事前チェックは高速パスで、同時作成に対してはストアの一意制約が最終的に弾く。
    pub fn create(&self, input: ToolInput) -> CatalogResult<Tool> {
        let duplicate = ToolFilter::NameOrAcronym {
            name: input.name.clone(),
            acronym: input.acronym.clone(),
        };
        if let Some(existing) = self.store.find_one(&duplicate)? {
            warn!(
                target: "catalog",
                name = %input.name,
                acronym = %input.acronym,
                existing = %existing.id,
                "duplicate tool rejected"
            );
            return Err(CatalogError::duplicate());
        }

        let saved = self.store.insert(to_new_tool(input)?)?;
        info!(
            target: "catalog",
            id = %saved.id,
            name = %saved.name,
            items = saved.items.len(),
            "tool created"
        );
        Ok(to_wire_tool(saved))
    }

    pub fn get(&self, key: &ToolKey) -> CatalogResult<Tool> {
        self.store
            .find_one(&key.filter())?
            .map(to_wire_tool)
            .ok_or_else(|| key.not_found())
    }

    /// name / acronym / category / items を丸ごと置き換える。
    /// 更新時は一意性の事前チェックを行わない。
    pub fn update(&self, key: &ToolKey, input: ToolInput) -> CatalogResult<Tool> {
        let fields = to_new_tool(input)?;
        let updated = self
            .store
            .find_one_and_update(&key.filter(), fields)?
            .ok_or_else(|| key.not_found())?;
        info!(
            target: "catalog",
            id = %updated.id,
            name = %updated.name,
            items = updated.items.len(),
            "tool updated"
        );
        Ok(to_wire_tool(updated))
    }

    pub fn delete(&self, key: &ToolKey) -> CatalogResult<Tool> {
        let removed = self
            .store
            .find_one_and_remove(&key.filter())?
            .ok_or_else(|| key.not_found())?;
        info!(target: "catalog", id = %removed.id, name = %removed.name, "tool deleted");
        Ok(to_wire_tool(removed))
    }

    pub fn get_by_id(&self, id: &str) -> CatalogResult<Tool> {
        self.get(&ToolKey::Id(id.into()))
    }

    pub fn get_by_name(&self, name: &str) -> CatalogResult<Tool> {
        self.get(&ToolKey::Name(name.to_string()))
    }

    pub fn update_by_id(&self, id: &str, input: ToolInput) -> CatalogResult<Tool> {
        self.update(&ToolKey::Id(id.into()), input)
    }

    pub fn update_by_name(&self, name: &str, input: ToolInput) -> CatalogResult<Tool> {
        self.update(&ToolKey::Name(name.to_string()), input)
    }

    pub fn delete_by_id(&self, id: &str) -> CatalogResult<Tool> {
        self.delete(&ToolKey::Id(id.into()))
    }

    pub fn delete_by_name(&self, name: &str) -> CatalogResult<Tool> {
        self.delete(&ToolKey::Name(name.to_string()))
    }
}
