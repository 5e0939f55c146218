//! 機種カタログモジュール
//!
//! カタログの索引構築・照合・差し替え・組み込みデータを扱う。

pub mod index;
pub mod matcher;
pub mod seed;
pub mod shared;

pub use index::{CatalogIndex, MatchConfig};
pub use matcher::{find_match, match_text, CatalogMatch, MatchStrategy};
pub use shared::SharedIndex;

use crate::error::Result;
use crate::types::{CatalogEntry, Category};

/// JSONファイルからカタログを読み込み（`[CatalogEntry, ...]`）
pub fn from_file(path: &std::path::Path) -> Result<Vec<CatalogEntry>> {
    let content = std::fs::read_to_string(path)?;
    from_json(&content)
}

/// JSON文字列からカタログを読み込み
pub fn from_json(json: &str) -> Result<Vec<CatalogEntry>> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
    Ok(entries)
}

/// カタログ一覧の絞り込み
///
/// - `search`: 型番または機種名に含まれる（大文字小文字を区別）
/// - `category`: カテゴリ完全一致
pub fn filter_entries<'a>(
    entries: &'a [CatalogEntry],
    search: Option<&str>,
    category: Option<Category>,
) -> Vec<&'a CatalogEntry> {
    entries
        .iter()
        .filter(|e| match search {
            Some(s) if !s.is_empty() => {
                e.model_name.contains(s)
                    || e.model_code.as_deref().map(|c| c.contains(s)).unwrap_or(false)
            }
            _ => true,
        })
        .filter(|e| category.map(|c| e.category == Some(c)).unwrap_or(true))
        .collect()
}
