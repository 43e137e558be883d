//! SQLite ストアモジュール
//!
//! `rusqlite` を使って `ToolStore` を実装します。
//!
//! # 特色
//! - Windows でもビルドしやすいように `bundled` フィーチャを利用
//! - `tools` と `tool_items` の 2 テーブル構成。アイテムは `position` 順で保持
//! - 画像は BLOB カラムに生バイトで保存、任意フィールドは JSON テキストで保存
//! - `name` / `acronym` の UNIQUE 制約が重複防止の最終防衛線 (違反は `Conflict`)
//! - 書き込みは 1 トランザクションで完結
//!
//! # 代表的な使い方
//! ```no_run
//! use tool_catalog::sqlite::SqliteToolStore;
//! use tool_catalog::store::{ToolFilter, ToolStore};
//!
//! # fn demo() -> color_eyre::Result<()> {
//! let store = SqliteToolStore::open_or_create("catalog.sqlite")?; // ファイルが無ければ作成
//! for tool in store.find(&ToolFilter::All)? {
//!     println!("{} ({} items)", tool.name, tool.items.len());
//! }
//! # Ok(()) }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{ItemFields, NewTool, StoredImage, StoredItem, StoredTool, ToolId};
use crate::store::{ToolFilter, ToolStore};

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || (e.code == rusqlite::ErrorCode::ConstraintViolation
                        && msg.as_deref().is_some_and(|m| m.starts_with("UNIQUE"))) =>
            {
                debug!(target: "sqlite", "unique constraint violated: {:?}", msg);
                CatalogError::duplicate()
            }
            _ => CatalogError::store(err),
        }
    }
}

/// SQLite ストア。内部で `rusqlite::Connection` を保持します。
pub struct SqliteToolStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteToolStore {
    /// DB を開き、存在しなければ新規作成。
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let p = path.as_ref().to_path_buf();
        let conn = Connection::open(&p)?;
        Self::with_connection(conn, p)
    }

    /// メモリ上 (永続化なし) の DB を作成 (主にテスト用途)
    pub fn in_memory() -> CatalogResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, PathBuf::from(":memory:"))
    }

    fn with_connection(conn: Connection, path: PathBuf) -> CatalogResult<Self> {
        Self::ensure_schema(&conn)?;
        info!(target: "sqlite", "opened tool store at {:?}", path);
        Ok(Self { conn: Mutex::new(conn), path })
    }

    /// スキーマを作成 (存在しない場合のみ)
    fn ensure_schema(conn: &Connection) -> CatalogResult<()> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS tools (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                acronym TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                created_at_epoch_ms INTEGER NOT NULL,
                modified_at_epoch_ms INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tool_items (
                tool_id TEXT NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                fields TEXT NOT NULL,
                image_data BLOB,
                image_content_type TEXT,
                PRIMARY KEY (tool_id, position)
            );
            "#,
        )?;
        Ok(())
    }

    /// 現在時刻 (ms since epoch)
    fn now_ms() -> CatalogResult<i64> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(CatalogError::store)?;
        Ok(elapsed.as_millis() as i64)
    }

    fn lock(&self) -> CatalogResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::store("sqlite connection mutex poisoned"))
    }

    /// 保存済みツール数
    pub fn count(&self) -> CatalogResult<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM tools", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// DB ファイルのパス
    pub fn db_file_path(&self) -> &Path {
        &self.path
    }
}

/// 検索条件を WHERE 句とバインド値に変換
fn where_clause(filter: &ToolFilter) -> (&'static str, Vec<&str>) {
    match filter {
        ToolFilter::All => ("1 = 1", vec![]),
        ToolFilter::Id(id) => ("id = ?1", vec![id.as_str()]),
        ToolFilter::Name(name) => ("name = ?1", vec![name.as_str()]),
        ToolFilter::NameOrAcronym { name, acronym } => {
            ("name = ?1 OR acronym = ?2", vec![name.as_str(), acronym.as_str()])
        }
    }
}

fn select_tools(
    conn: &Connection,
    filter: &ToolFilter,
    limit: Option<usize>,
) -> CatalogResult<Vec<StoredTool>> {
    let (clause, args) = where_clause(filter);
    let mut sql =
        format!("SELECT id, name, acronym, category FROM tools WHERE {clause} ORDER BY rowid ASC");
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }
    let mut stmt = conn.prepare(&sql)?;
    let iter = stmt.query_map(params_from_iter(args.iter()), |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;
    let mut heads = Vec::new();
    for r in iter {
        heads.push(r?);
    }

    let mut out = Vec::with_capacity(heads.len());
    for (id, name, acronym, category) in heads {
        let items = select_items(conn, &id)?;
        out.push(StoredTool {
            id: ToolId(id),
            name,
            acronym,
            category,
            items,
        });
    }
    Ok(out)
}

fn select_items(conn: &Connection, tool_id: &str) -> CatalogResult<Vec<StoredItem>> {
    let mut stmt = conn.prepare(
        r#"SELECT fields, image_data, image_content_type FROM tool_items
           WHERE tool_id = ?1 ORDER BY position ASC"#,
    )?;
    let iter = stmt.query_map(params![tool_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<Vec<u8>>>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for r in iter {
        let (fields, data, content_type) = r?;
        let fields: ItemFields = serde_json::from_str(&fields)?;
        let image = data.map(|data| StoredImage { data, content_type });
        out.push(StoredItem { fields, image });
    }
    Ok(out)
}

fn insert_items(conn: &Connection, tool_id: &str, items: &[StoredItem]) -> CatalogResult<()> {
    let mut stmt = conn.prepare(
        r#"INSERT INTO tool_items(tool_id, position, fields, image_data, image_content_type)
           VALUES (?1, ?2, ?3, ?4, ?5)"#,
    )?;
    for (position, item) in items.iter().enumerate() {
        let fields = serde_json::to_string(&item.fields)?;
        let (data, content_type) = match &item.image {
            Some(image) => (Some(image.data.as_slice()), image.content_type.as_deref()),
            None => (None, None),
        };
        stmt.execute(params![tool_id, position as i64, fields, data, content_type])?;
    }
    Ok(())
}

impl ToolStore for SqliteToolStore {
    fn find(&self, filter: &ToolFilter) -> CatalogResult<Vec<StoredTool>> {
        let conn = self.lock()?;
        select_tools(&conn, filter, None)
    }

    fn find_one(&self, filter: &ToolFilter) -> CatalogResult<Option<StoredTool>> {
        let conn = self.lock()?;
        Ok(select_tools(&conn, filter, Some(1))?.into_iter().next())
    }

    fn insert(&self, tool: NewTool) -> CatalogResult<StoredTool> {
        let id = ToolId::generate();
        let now = Self::now_ms()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"INSERT INTO tools(id, name, acronym, category,
                                 created_at_epoch_ms, modified_at_epoch_ms)
               VALUES (?1, ?2, ?3, ?4, ?5, ?5)"#,
            params![id.as_str(), tool.name, tool.acronym, tool.category, now],
        )?;
        insert_items(&tx, id.as_str(), &tool.items)?;
        tx.commit()?;
        debug!(target: "sqlite", "insert id={} items={}", id, tool.items.len());
        Ok(StoredTool {
            id,
            name: tool.name,
            acronym: tool.acronym,
            category: tool.category,
            items: tool.items,
        })
    }

    fn find_one_and_update(
        &self,
        filter: &ToolFilter,
        fields: NewTool,
    ) -> CatalogResult<Option<StoredTool>> {
        let now = Self::now_ms()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let (clause, args) = where_clause(filter);
        let id: Option<String> = tx
            .query_row(
                &format!("SELECT id FROM tools WHERE {clause} ORDER BY rowid ASC LIMIT 1"),
                params_from_iter(args.iter()),
                |row| row.get(0),
            )
            .optional()?;
        let Some(id) = id else {
            return Ok(None);
        };

        tx.execute(
            r#"UPDATE tools SET name = ?2, acronym = ?3, category = ?4, modified_at_epoch_ms = ?5
               WHERE id = ?1"#,
            params![id, fields.name, fields.acronym, fields.category, now],
        )?;
        tx.execute("DELETE FROM tool_items WHERE tool_id = ?1", params![id])?;
        insert_items(&tx, &id, &fields.items)?;
        tx.commit()?;
        debug!(target: "sqlite", "update id={} items={}", id, fields.items.len());
        Ok(Some(StoredTool {
            id: ToolId(id),
            name: fields.name,
            acronym: fields.acronym,
            category: fields.category,
            items: fields.items,
        }))
    }

    fn find_one_and_remove(&self, filter: &ToolFilter) -> CatalogResult<Option<StoredTool>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let Some(tool) = select_tools(&tx, filter, Some(1))?.into_iter().next() else {
            return Ok(None);
        };
        tx.execute("DELETE FROM tool_items WHERE tool_id = ?1", params![tool.id.as_str()])?;
        tx.execute("DELETE FROM tools WHERE id = ?1", params![tool.id.as_str()])?;
        tx.commit()?;
        debug!(target: "sqlite", "remove id={}", tool.id);
        Ok(Some(tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str, acronym: &str, n_items: u8) -> NewTool {
        let items = (0..n_items)
            .map(|i| {
                let mut fields = ItemFields::new();
                fields.insert("label".into(), json!(format!("item-{i}")));
                StoredItem {
                    fields,
                    image: Some(StoredImage {
                        data: vec![i, 0xff, 0x00],
                        content_type: Some("image/png".into()),
                    }),
                }
            })
            .collect();
        NewTool {
            name: name.into(),
            acronym: acronym.into(),
            category: "Security".into(),
            items,
        }
    }

    #[test]
    fn insert_then_find_keeps_item_order_and_bytes() -> CatalogResult<()> {
        let store = SqliteToolStore::in_memory()?;
        let saved = store.insert(tool("Scanner", "SCN", 3))?;
        let found = store.find_one(&ToolFilter::Id(saved.id.clone()))?.expect("present");
        assert_eq!(found, saved);
        assert_eq!(found.items[2].image.as_ref().unwrap().data, vec![2, 0xff, 0x00]);
        assert_eq!(found.items[1].fields.get("label"), Some(&json!("item-1")));
        Ok(())
    }

    #[test]
    fn unique_name_or_acronym_maps_to_conflict() -> CatalogResult<()> {
        let store = SqliteToolStore::in_memory()?;
        store.insert(tool("Scanner", "SCN", 0))?;
        let same_name = store.insert(tool("Scanner", "OTHER", 0));
        assert!(matches!(same_name, Err(CatalogError::Conflict(_))));
        let same_acronym = store.insert(tool("Other", "SCN", 0));
        assert!(matches!(same_acronym, Err(CatalogError::Conflict(_))));
        assert_eq!(store.count()?, 1);
        Ok(())
    }

    #[test]
    fn update_replaces_items() -> CatalogResult<()> {
        let store = SqliteToolStore::in_memory()?;
        let saved = store.insert(tool("Scanner", "SCN", 3))?;
        let updated = store
            .find_one_and_update(&ToolFilter::Name("Scanner".into()), tool("Scanner2", "SC2", 1))?
            .expect("present");
        assert_eq!(updated.id, saved.id);
        let found = store.find_one(&ToolFilter::Id(saved.id))?.expect("present");
        assert_eq!(found.name, "Scanner2");
        assert_eq!(found.items.len(), 1);
        Ok(())
    }

    #[test]
    fn remove_returns_record_and_deletes_items() -> CatalogResult<()> {
        let store = SqliteToolStore::in_memory()?;
        let saved = store.insert(tool("Scanner", "SCN", 2))?;
        let removed = store.find_one_and_remove(&ToolFilter::Id(saved.id.clone()))?;
        assert_eq!(removed, Some(saved.clone()));
        assert_eq!(store.find_one_and_remove(&ToolFilter::Id(saved.id))?, None);
        let conn = store.lock()?;
        let orphans: i64 =
            conn.query_row("SELECT COUNT(*) FROM tool_items", [], |row| row.get(0))?;
        assert_eq!(orphans, 0);
        Ok(())
    }

    #[test]
    fn empty_image_stays_an_empty_blob() -> CatalogResult<()> {
        let store = SqliteToolStore::in_memory()?;
        let mut new = tool("Blank", "BLK", 1);
        new.items[0].image = Some(StoredImage { data: vec![], content_type: None });
        new.items.push(StoredItem::default());
        let saved = store.insert(new)?;

        let found = store.find_one(&ToolFilter::Id(saved.id))?.expect("present");
        // 空の画像は NULL ではなく長さ 0 の BLOB として戻る
        let image = found.items[0].image.as_ref().expect("empty image kept");
        assert!(image.data.is_empty());
        assert_eq!(image.content_type, None);
        // 画像なしのアイテムは画像なしのまま
        assert_eq!(found.items[1].image, None);
        Ok(())
    }

    #[test]
    fn missing_keys_yield_none() -> CatalogResult<()> {
        let store = SqliteToolStore::in_memory()?;
        assert_eq!(store.find_one(&ToolFilter::Name("nope".into()))?, None);
        let updated = store.find_one_and_update(&ToolFilter::Id("nope".into()), tool("a", "b", 0))?;
        assert_eq!(updated, None);
        assert!(store.find(&ToolFilter::All)?.is_empty());
        Ok(())
    }
}
