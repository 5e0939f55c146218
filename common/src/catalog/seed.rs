//! 組み込み機種カタログ
//!
//! 2014年以降のスマートフォン・タブレット・ウェアラブル（型番つき）。
//! カタログファイルが指定されないときの既定値として使う。

use crate::error::Result;
use crate::types::CatalogEntry;

const CATALOG_SEED_JSON: &str = include_str!("../../data/catalog_seed.json");

/// 組み込みカタログを読み込む
pub fn curated_catalog() -> Result<Vec<CatalogEntry>> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(CATALOG_SEED_JSON)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{matcher::match_text, CatalogIndex};
    use crate::types::Category;
    use std::collections::HashSet;

    #[test]
    fn test_seed_parses() {
        let entries = curated_catalog().unwrap();
        assert!(entries.len() > 200);
        assert!(entries.iter().all(|e| e.model_code.is_some()));
        assert!(entries.iter().all(|e| e.category.is_some()));
    }

    #[test]
    fn test_seed_model_names_unique() {
        let entries = curated_catalog().unwrap();
        let names: HashSet<&str> = entries.iter().map(|e| e.model_name.as_str()).collect();
        assert_eq!(names.len(), entries.len());
    }

    #[test]
    fn test_seed_covers_all_categories() {
        let entries = curated_catalog().unwrap();
        for category in Category::ALL {
            assert!(
                entries.iter().any(|e| e.category == Some(category)),
                "カテゴリがない: {}",
                category
            );
        }
    }

    #[test]
    fn test_seed_index_matches_known_code() {
        let index = CatalogIndex::from_entries(curated_catalog().unwrap());
        let entry = match_text("LCD SM-S928B BLACK", &index).unwrap();
        assert_eq!(entry.model_name, "Galaxy S24 Ultra");
    }
}
