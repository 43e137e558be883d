//! ツールカタログのデータモデル
//!
//! 画像は 2 つの形を持つ:
//! - ワイヤー形 (`WireImage`): クライアントとやり取りする base64 文字列 + MIME
//! - ストレージ形 (`StoredImage`): 永続化される生バイト列 + content-type
//!
//! 永続化されたレコードは常にストレージ形、呼び出し側に返すレコードは常にワイヤー形。

use std::fmt::{self, Display, Formatter};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// アイテムに付随する任意フィールド (そのまま素通しする)
pub type ItemFields = Map<String, Value>;

/// ストアが採番する不透明な ID (12 バイト乱数の 16 進表現)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(pub String);

impl ToolId {
    pub fn generate() -> Self {
        let bytes: [u8; 12] = rand::thread_rng().gen();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ToolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// ワイヤー形の画像。出力時は `typeFile` を省略する。
///
/// `data` は受け取った JSON 値をそのまま保持し、文字列かどうかの判定はコーデックで行う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(rename = "typeFile", default, skip_serializing_if = "Option::is_none")]
    pub type_file: Option<String>,
}

impl WireImage {
    /// base64 文字列を持つ出力用の画像
    pub fn from_base64(payload: String) -> Self {
        Self { data: Some(Value::String(payload)), type_file: None }
    }

    /// `data` が文字列ならその中身
    pub fn data_str(&self) -> Option<&str> {
        self.data.as_ref().and_then(Value::as_str)
    }
}

/// ワイヤー形のアイテム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<WireImage>,
    #[serde(flatten)]
    pub fields: ItemFields,
}

/// ストレージ形の画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// ストレージ形のアイテム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredItem {
    pub fields: ItemFields,
    pub image: Option<StoredImage>,
}

/// 作成/更新リクエストのボディ (アイテムはワイヤー形)
#[derive(Debug, Clone, Deserialize)]
pub struct ToolInput {
    pub name: String,
    pub acronym: String,
    pub category: String,
    #[serde(default)]
    pub items: Vec<WireItem>,
}

/// ストアへの書き込みペイロード (アイテムはストレージ形)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTool {
    pub name: String,
    pub acronym: String,
    pub category: String,
    pub items: Vec<StoredItem>,
}

/// 永続化済みのレコード
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTool {
    pub id: ToolId,
    pub name: String,
    pub acronym: String,
    pub category: String,
    pub items: Vec<StoredItem>,
}

/// 呼び出し側に返すレコード (アイテムはワイヤー形)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    pub acronym: String,
    pub category: String,
    pub items: Vec<WireItem>,
}
