//! 機種判定テスト
//!
//! カタログ照合・カテゴリ推定・統合の振る舞いを検証

use repair_pricer_common::catalog::seed::curated_catalog;
use repair_pricer_common::{
    detect, find_match, reconcile, CatalogEntry, CatalogIndex, Category, Detection, MatchStrategy,
    SharedIndex,
};
use std::sync::Arc;

fn tail_catalog(first: Category, second: Category) -> CatalogIndex {
    CatalogIndex::from_entries(vec![
        CatalogEntry::new("Galaxy Test One", Some("SM-S928U1"), Some(first)),
        CatalogEntry::new("Galaxy Test Two", Some("SM-A928U1"), Some(second)),
    ])
}

/// 同じ入力には常に同じ結果
#[test]
fn test_matching_is_deterministic() {
    let index = CatalogIndex::from_entries(curated_catalog().unwrap());
    let texts = ["LCD SM-S928B", "battery a546", "928 part", "Galaxy Watch band", "screw"];

    for text in texts {
        let first = detect(text, &index);
        for _ in 0..5 {
            assert_eq!(detect(text, &index), first, "text: {}", text);
        }
    }
}

/// 型番と機種名の両方を含む場合は型番が優先
#[test]
fn test_code_pattern_wins_over_name() {
    let index = CatalogIndex::from_entries(vec![
        CatalogEntry::new("Galaxy S24", Some("SM-S921B"), Some(Category::HighEnd)),
        CatalogEntry::new("Galaxy A54 5G", Some("SM-A546B"), Some(Category::MidEnd)),
    ]);

    let found = find_match("Galaxy S24 cover for SM-A546B", &index).unwrap();
    assert_eq!(found.entry.model_name, "Galaxy A54 5G");
    assert_eq!(found.strategy, MatchStrategy::Code);
}

/// 数字末尾の曖昧候補は直前の英字で絞る
#[test]
fn test_tail_disambiguation_by_lead_letter() {
    let index = tail_catalog(Category::HighEnd, Category::MidEnd);

    let a = find_match("a928 screen", &index).unwrap();
    assert_eq!(a.entry.model_name, "Galaxy Test Two");
    assert_eq!(a.strategy, MatchStrategy::TailLeadLetter);

    let s = find_match("s928 assembly", &index).unwrap();
    assert_eq!(s.entry.model_name, "Galaxy Test One");
    assert_eq!(s.strategy, MatchStrategy::TailLeadLetter);

    let bare = find_match("928 part", &index).unwrap();
    assert_eq!(bare.strategy, MatchStrategy::TailPriority);
    assert_eq!(bare.entry.model_name, "Galaxy Test One");
}

/// 英字で絞れなければ highend を優先
#[test]
fn test_tail_category_priority() {
    // midend を先に登録しても highend が選ばれる
    let index = tail_catalog(Category::MidEnd, Category::HighEnd);
    let found = find_match("928 part", &index).unwrap();
    assert_eq!(found.entry.model_name, "Galaxy Test Two");

    // 英字が一致しない場合も優先度で決める
    let found = find_match("x928 part", &index).unwrap();
    assert_eq!(found.entry.model_name, "Galaxy Test Two");
    assert_eq!(found.strategy, MatchStrategy::TailPriority);
}

#[test]
fn test_reconcile_highend_wins() {
    assert_eq!(reconcile(Some(Category::MidEnd), Some(Category::HighEnd)), Some(Category::HighEnd));
    assert_eq!(reconcile(Some(Category::HighEnd), Some(Category::MidEnd)), Some(Category::HighEnd));
}

/// 照合も推定もできなければ全項目null
#[test]
fn test_unmatched_text_is_all_null() {
    let index = tail_catalog(Category::HighEnd, Category::MidEnd);
    let detection = detect("generic screw kit 12", &index);
    assert_eq!(detection, Detection::default());

    let json = serde_json::to_value(&detection).unwrap();
    assert!(json["model_name"].is_null());
    assert!(json["model_code"].is_null());
    assert!(json["category"].is_null());
}

/// 組み込みカタログでの代表的な判定
#[test]
fn test_seed_catalog_detection() {
    let index = CatalogIndex::from_entries(curated_catalog().unwrap());

    let detection = detect("LCD assembly SM-S928B black", &index);
    assert_eq!(detection.model_name.as_deref(), Some("Galaxy S24 Ultra"));
    assert_eq!(detection.model_code.as_deref(), Some("SM-S928B/DS"));
    assert_eq!(detection.category, Some(Category::HighEnd));

    let detection = detect("back cover A546B", &index);
    assert_eq!(detection.model_name.as_deref(), Some("Galaxy A54 5G"));
    assert_eq!(detection.category, Some(Category::MidEnd));
}

/// 差し替え中も読み手は旧索引で照合を続けられる
#[test]
fn test_shared_index_swap_keeps_old_snapshot() {
    let shared = SharedIndex::new(tail_catalog(Category::HighEnd, Category::MidEnd));
    let before = shared.snapshot();

    let changed = shared.replace_if_changed(
        vec![CatalogEntry::new("Galaxy A15", Some("SM-A155F"), Some(Category::LowEnd))],
        Default::default(),
    );
    assert!(changed);

    assert_eq!(detect("a928 screen", &before).model_name.as_deref(), Some("Galaxy Test Two"));
    let after = shared.snapshot();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(detect("a155 battery", &after).model_name.as_deref(), Some("Galaxy A15"));
}
