//! データファイル読み込み
//!
//! 部品マスタ・価格式・機種カタログはいずれもJSON配列。

use crate::error::{PricerError, Result};
use repair_pricer_common::catalog::{self, seed};
use repair_pricer_common::pricing::PriceFormula;
use repair_pricer_common::{CatalogEntry, PartRecord};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(PricerError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| PricerError::InvalidData(format!("{}: {}", path.display(), e)))
}

/// 引数 → 設定ファイルの順でパスを決める
///
/// どちらもなければ、そのサブコマンドで使うフラグ名を添えたエラー
pub fn resolve_path(
    arg: Option<PathBuf>,
    configured: Option<&Path>,
    what: &'static str,
    flag: &'static str,
) -> Result<PathBuf> {
    arg.or_else(|| configured.map(Path::to_path_buf))
        .ok_or(PricerError::MissingPath { what, flag })
}

/// 部品マスタ（`[PartRecord, ...]`）
pub fn load_parts(path: &Path) -> Result<Vec<PartRecord>> {
    read_json_array(path)
}

/// 価格式（`[PriceFormula, ...]`）
pub fn load_formulas(path: &Path) -> Result<Vec<PriceFormula>> {
    read_json_array(path)
}

/// 機種カタログ（パス未指定なら組み込みカタログ）
pub fn load_catalog(path: Option<&Path>) -> Result<Vec<CatalogEntry>> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(PricerError::FileNotFound(path.display().to_string()));
            }
            catalog::from_file(path)
                .map_err(|e| PricerError::InvalidData(format!("{}: {}", path.display(), e)))
        }
        None => Ok(seed::curated_catalog()?),
    }
}

/// 価格式を正規化して保存
pub fn save_formulas(path: &Path, formulas: Vec<PriceFormula>) -> Result<()> {
    let normalized: Vec<PriceFormula> = formulas.into_iter().map(PriceFormula::normalized).collect();
    let content = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(path, content)?;
    Ok(())
}
