//! カタログ・部品の型定義
//!
//! 照合と価格計算の両方から参照される型:
//! - Category: 製品ティア
//! - CatalogEntry: 機種カタログの1行
//! - PartRecord: 部品マスタの1行

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 製品ティア
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    HighEnd,
    MidEnd,
    LowEnd,
    Tab,
    Wearable,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::HighEnd,
        Category::MidEnd,
        Category::LowEnd,
        Category::Tab,
        Category::Wearable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::HighEnd => "highend",
            Category::MidEnd => "midend",
            Category::LowEnd => "lowend",
            Category::Tab => "tab",
            Category::Wearable => "wearable",
        }
    }

    /// 数字末尾の曖昧候補を絞るときの優先度
    ///
    /// highend > tab > wearable > midend > lowend。カテゴリ未設定は最下位。
    pub fn tail_rank(category: Option<Category>) -> u8 {
        match category {
            Some(Category::HighEnd) => 5,
            Some(Category::Tab) => 4,
            Some(Category::Wearable) => 3,
            Some(Category::MidEnd) => 2,
            Some(Category::LowEnd) => 1,
            None => 0,
        }
    }

    /// タブレット・ウェアラブル（形状が明確に異なる系統）
    pub fn is_form_factor(&self) -> bool {
        matches!(self, Category::Tab | Category::Wearable)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "highend" => Ok(Category::HighEnd),
            "midend" => Ok(Category::MidEnd),
            "lowend" => Ok(Category::LowEnd),
            "tab" => Ok(Category::Tab),
            "wearable" => Ok(Category::Wearable),
            other => Err(Error::InvalidInput(format!("unknown category '{}'", other))),
        }
    }
}

/// "none"・空文字・未知の値はカテゴリなしとして読む
pub(crate) fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

fn default_brand() -> String {
    "Samsung".to_string()
}

/// 機種カタログのエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default = "default_brand")]
    pub brand: String,

    /// 機種名（一意キー）
    pub model_name: String,

    /// 型番（例: SM-S928B/DS）
    #[serde(default)]
    pub model_code: Option<String>,

    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
}

impl CatalogEntry {
    pub fn new(model_name: &str, model_code: Option<&str>, category: Option<Category>) -> Self {
        Self {
            brand: default_brand(),
            model_name: model_name.to_string(),
            model_code: model_code.map(str::to_string),
            category,
        }
    }
}

/// 部品マスタのレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: i64,

    /// 部品コード
    pub code: String,

    #[serde(default)]
    pub description: Option<String>,

    /// 定価（MAP）
    #[serde(default, alias = "map_price")]
    pub list_price: Option<f64>,

    /// 定価がないときに使う仕入値（NET）
    #[serde(default, alias = "net_price")]
    pub fallback_price: Option<f64>,

    /// 取扱状態（例: Active）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// 在庫数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_qty: Option<i64>,
}

impl PartRecord {
    /// 単価: 定価 → 仕入値 → 0
    pub fn unit_price(&self) -> f64 {
        self.list_price.or(self.fallback_price).unwrap_or(0.0)
    }

    /// 照合用テキスト（コード + 説明）
    pub fn search_text(&self) -> String {
        match self.description.as_deref() {
            Some(desc) => format!("{} {}", self.code, desc),
            None => self.code.clone(),
        }
    }
}
