//! 機種判定
//!
//! カタログ照合とカテゴリ推定を組み合わせ、テキストから機種とティアを判定する。
//!
//! ## 処理フロー
//! 1. カタログ照合（型番 → 機種名 → 数字末尾）
//! 2. テキストからカテゴリ推定
//! 3. 照合できた場合は型番・機種名を足したテキストで再推定
//! 4. 推定と照合のカテゴリを統合

use crate::catalog::{match_text, CatalogIndex};
use crate::classifier::classify;
use crate::reconcile::reconcile;
use crate::types::{Category, PartRecord};
use serde::{Deserialize, Serialize};

/// 判定結果（照合できなければすべて`None`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub model_name: Option<String>,
    pub model_code: Option<String>,
    pub category: Option<Category>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.model_name.is_none() && self.model_code.is_none() && self.category.is_none()
    }

    /// 機種での絞り込みに使うキー（`機種名||型番`、小文字）
    pub fn device_key(&self) -> String {
        format!(
            "{}||{}",
            self.model_name.as_deref().unwrap_or_default().trim(),
            self.model_code.as_deref().unwrap_or_default().trim()
        )
        .to_lowercase()
    }
}

/// テキストから機種とティアを判定する
pub fn detect(text: &str, index: &CatalogIndex) -> Detection {
    let matched = match_text(text, index);
    let mut inferred = classify(text);

    if let Some(entry) = matched {
        let enriched = format!(
            "{} {} {}",
            text,
            entry.model_code.as_deref().unwrap_or_default(),
            entry.model_name
        );
        inferred = classify(&enriched).or(inferred);
    }

    let category = reconcile(inferred, matched.and_then(|e| e.category));

    Detection {
        model_name: matched.map(|e| e.model_name.clone()),
        model_code: matched.and_then(|e| e.model_code.clone()),
        category,
    }
}

/// 判定結果つき部品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPart {
    #[serde(flatten)]
    pub part: PartRecord,
    pub detection: Detection,
}

/// 部品のコードと説明から機種を判定する
pub fn enrich(part: &PartRecord, index: &CatalogIndex) -> EnrichedPart {
    EnrichedPart {
        detection: detect(&part.search_text(), index),
        part: part.clone(),
    }
}

/// 判定結果の機種キーで絞り込む
pub fn filter_by_device<'a>(parts: &'a [EnrichedPart], device: &str) -> Vec<&'a EnrichedPart> {
    let wanted = device.trim().to_lowercase();
    parts
        .iter()
        .filter(|p| p.detection.device_key() == wanted)
        .collect()
}
