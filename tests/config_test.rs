//! 設定・データファイルテスト
//!
//! 設定ファイルとデータファイル読み込みのエラーハンドリングを検証

use repair_pricer::cli::{PARTS_FLAG, PRICE_FORMULAS_FLAG, PRICE_PARTS_FLAG};
use repair_pricer::config::Config;
use repair_pricer::data;
use repair_pricer::error::PricerError;
use repair_pricer_common::{select_parts, Category, MatchConfig, PartFilter, PricingConfig, SearchQuery};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 設定ファイルがなければ既定値
#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.pricing.default_exchange_rate, 1450.0);
    assert_eq!(config.matching.vendor_prefix, "SM-");
    assert!(config.catalog.is_none());
}

/// 保存と読み込み
#[test]
fn test_config_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        pricing: PricingConfig { default_exchange_rate: 1380.0, ..Default::default() },
        matching: MatchConfig { vendor_prefix: "GT-".into() },
        catalog: None,
        parts: Some(PathBuf::from("/data/parts.json")),
        formulas: Some(PathBuf::from("/data/formulas.json")),
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

/// 一部の項目だけでも読み込める
#[test]
fn test_partial_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"pricing": {"default_exchange_rate": 1500}}"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.pricing.default_exchange_rate, 1500.0);
    assert_eq!(config.pricing.default_margin_pct("midend"), 2.0);
    assert_eq!(config.matching, MatchConfig::default());
}

#[test]
fn test_invalid_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, PricerError::Config(_)));
}

#[test]
fn test_missing_data_file() {
    let result = data::load_parts(Path::new("/nonexistent/path/parts.json"));
    assert!(matches!(result, Err(PricerError::FileNotFound(_))));

    let result = data::load_catalog(Some(Path::new("/nonexistent/path/catalog.json")));
    assert!(matches!(result, Err(PricerError::FileNotFound(_))));
}

#[test]
fn test_invalid_data_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("parts.json");
    std::fs::write(&path, r#"{"id": 1}"#).unwrap();

    let err = data::load_parts(&path).unwrap_err();
    assert!(matches!(err, PricerError::InvalidData(_)));
    assert!(err.to_string().contains("parts.json"));
}

/// カタログ未指定なら組み込みカタログ
#[test]
fn test_seed_catalog_fallback() {
    let entries = data::load_catalog(None).unwrap();
    assert!(!entries.is_empty());
    assert!(entries.iter().any(|e| e.model_name == "Galaxy S24 Ultra"));
}

/// 不明なカテゴリは未設定として読み込む
#[test]
fn test_catalog_file_with_unknown_category() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"[
            {"model_name": "Galaxy Z Fold5", "model_code": "SM-F946B", "category": "highend"},
            {"model_name": "Galaxy Accessory", "category": "accessory"}
        ]"#,
    )
    .unwrap();

    let entries = data::load_catalog(Some(&path)).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].category, Some(Category::HighEnd));
    assert_eq!(entries[0].brand, "Samsung");
    assert_eq!(entries[1].category, None);
}

/// PricerErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PricerError::Config("テスト設定エラー".to_string()),
        PricerError::FileNotFound("parts.json".to_string()),
        PricerError::InvalidData("formulas.json".to_string()),
        PricerError::InvalidArgument("検索語".to_string()),
        PricerError::MissingPath { what: "部品マスタ", flag: "--parts" },
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty());
    }

    let core: PricerError = repair_pricer_common::Error::NotFound("part 1".into()).into();
    assert_eq!(core.to_string(), "Not found: part 1");
}

/// 初期化は壊れた設定ファイルも既定値で上書きする
#[test]
fn test_init_overwrites_corrupt_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{bad").unwrap();
    assert!(Config::load_from(&path).is_err());

    let written = Config::init_at(&path).unwrap();
    assert_eq!(written, Config::default());
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

/// 初期化直後に読み込むと以前の値ではなく既定値
#[test]
fn test_init_replaces_previous_values() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"pricing": {"default_exchange_rate": 9}}"#).unwrap();
    assert_eq!(Config::load_from(&path).unwrap().pricing.default_exchange_rate, 9.0);

    Config::init_at(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap().pricing.default_exchange_rate, 1450.0);
}

/// パス未設定のエラーはそのサブコマンドのフラグ名を案内する
#[test]
fn test_missing_path_names_subcommand_flag() {
    let err = data::resolve_path(None, None, "価格式", PRICE_FORMULAS_FLAG).unwrap_err();
    assert!(matches!(err, PricerError::MissingPath { .. }));
    let message = err.to_string();
    assert!(message.starts_with("価格式のパスが設定されていません"));
    assert!(message.contains("`--formulas-file FILE`"));

    let message = data::resolve_path(None, None, "部品マスタ", PRICE_PARTS_FLAG)
        .unwrap_err()
        .to_string();
    assert!(message.contains("`--parts-file FILE`"));

    let message = data::resolve_path(None, None, "部品マスタ", PARTS_FLAG)
        .unwrap_err()
        .to_string();
    assert!(message.contains("`--parts FILE`"));
}

/// 引数が設定ファイルより優先
#[test]
fn test_resolve_path_precedence() {
    let configured = PathBuf::from("/config/parts.json");
    let resolved = data::resolve_path(
        Some(PathBuf::from("cli.json")),
        Some(configured.as_path()),
        "部品マスタ",
        PARTS_FLAG,
    )
    .unwrap();
    assert_eq!(resolved, PathBuf::from("cli.json"));

    let resolved = data::resolve_path(None, Some(configured.as_path()), "部品マスタ", PARTS_FLAG).unwrap();
    assert_eq!(resolved, configured);
}

/// 在庫・状態つきの部品マスタを絞り込める
#[test]
fn test_parts_file_with_stock_filter() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("parts.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 1, "code": "GH82-1", "description": "LCD S928", "map_price": 90, "status": "Active", "stock_qty": 2},
            {"id": 2, "code": "GH82-2", "description": "LCD S928", "map_price": 90, "status": "Active", "stock_qty": 0},
            {"id": 3, "code": "GH82-3", "description": "LCD A546", "map_price": 40, "status": "Active", "stock_qty": 5}
        ]"#,
    )
    .unwrap();

    let parts = data::load_parts(&path).unwrap();
    let query = SearchQuery::parse("s928").unwrap();
    let filter = PartFilter { in_stock: Some(true), ..Default::default() };
    let found = select_parts(&parts, Some(&query), &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
}
