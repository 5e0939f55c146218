use crate::error::{PricerError, Result};
use repair_pricer_common::{MatchConfig, PricingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    /// 機種カタログJSON（未設定なら組み込みカタログ）
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// 部品マスタJSON
    #[serde(default)]
    pub parts: Option<PathBuf>,
    /// 価格式JSON
    #[serde(default)]
    pub formulas: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（ファイルがなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| PricerError::Config(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 既定値で設定ファイルを作成（既存の内容は読まずに上書き）
    pub fn init_at(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PricerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("repair-pricer").join("config.json"))
    }
}
