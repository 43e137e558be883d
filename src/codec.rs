//! 画像ペイロードのコーデック
//!
//! ワイヤー形 (`data:<mime>;base64,<payload>`) とストレージ形 (生バイト列 + content-type)
//! を相互変換する。どちらも入力を変更しない純粋関数。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{StoredImage, StoredItem, WireImage, WireItem};

/// data URI をメタ部 (`data:<mime>;base64`) とペイロードに分割する。
/// 最初の `,` より後ろをペイロードとみなす。
fn split_data_uri(data: &str) -> CatalogResult<(&str, &str)> {
    data.split_once(',')
        .ok_or_else(|| CatalogError::malformed("image data has no ',' separator"))
}

/// メタ部から MIME を取り出す (`data:image/png;base64` -> `image/png`)
fn mime_from_meta(meta: &str) -> Option<&str> {
    let mime = meta.strip_prefix("data:")?.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// base64 ペイロードをデコード
pub fn decode_payload(data: &str) -> CatalogResult<(Option<&str>, Vec<u8>)> {
    let (meta, payload) = split_data_uri(data)?;
    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| CatalogError::malformed(format!("invalid base64 payload: {e}")))?;
    Ok((mime_from_meta(meta), bytes))
}

/// ワイヤー形 -> ストレージ形
///
/// `typeFile` が無い場合は data URI 側の MIME を content-type に使う。
pub fn to_storage(item: &WireItem) -> CatalogResult<StoredItem> {
    let image = item
        .image
        .as_ref()
        .ok_or_else(|| CatalogError::malformed("item has no image"))?;
    let data = image
        .data
        .as_ref()
        .ok_or_else(|| CatalogError::malformed("image has no data"))?
        .as_str()
        .ok_or_else(|| CatalogError::malformed("image data is not a string"))?;
    let (declared_mime, bytes) = decode_payload(data)?;
    let content_type = image
        .type_file
        .clone()
        .or_else(|| declared_mime.map(str::to_string));

    Ok(StoredItem {
        fields: item.fields.clone(),
        image: Some(StoredImage { data: bytes, content_type }),
    })
}

/// ストレージ形 -> ワイヤー形。content-type は出力しない。
/// 画像が無いアイテムはそのまま返す。
pub fn to_wire(item: &StoredItem) -> WireItem {
    WireItem {
        fields: item.fields.clone(),
        image: item
            .image
            .as_ref()
            .map(|image| WireImage::from_base64(STANDARD.encode(&image.data))),
    }
}

/// 全アイテムに `to_storage` を順序通り適用 (1 件でも失敗すれば全体が失敗)
pub fn items_to_storage(items: &[WireItem]) -> CatalogResult<Vec<StoredItem>> {
    items.iter().map(to_storage).collect()
}

/// 全アイテムに `to_wire` を順序通り適用
pub fn items_to_wire(items: &[StoredItem]) -> Vec<WireItem> {
    items.iter().map(to_wire).collect()
}
