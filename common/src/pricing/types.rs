//! 価格計算の入出力型

use crate::error::{Error, Result};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 価格式（ティアごとの工賃・マージン・為替レート）
///
/// ディーラー向けの項目が未設定なら一般顧客向けの値を使う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceFormula {
    #[serde(default)]
    pub id: i64,
    pub class_name: String,

    #[serde(default)]
    pub labor_lvl1: Option<f64>,
    #[serde(default)]
    pub labor_lvl2_major: Option<f64>,
    #[serde(default)]
    pub labor_lvl2_minor: Option<f64>,
    #[serde(default)]
    pub labor_lvl3: Option<f64>,
    /// マージン（3 でも 0.03 でも可）
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub exchange_rate: Option<f64>,

    #[serde(default)]
    pub dealer_labor_lvl1: Option<f64>,
    #[serde(default)]
    pub dealer_labor_lvl2_major: Option<f64>,
    #[serde(default)]
    pub dealer_labor_lvl2_minor: Option<f64>,
    #[serde(default)]
    pub dealer_labor_lvl3: Option<f64>,
    #[serde(default)]
    pub dealer_margin: Option<f64>,
}

impl PriceFormula {
    /// 工賃（標準, ディーラー）
    pub fn labor(&self, level: LaborLevel) -> (Option<f64>, Option<f64>) {
        match level {
            LaborLevel::One => (self.labor_lvl1, self.dealer_labor_lvl1),
            LaborLevel::TwoMajor => (self.labor_lvl2_major, self.dealer_labor_lvl2_major),
            LaborLevel::TwoMinor => (self.labor_lvl2_minor, self.dealer_labor_lvl2_minor),
            LaborLevel::Three => (self.labor_lvl3, self.dealer_labor_lvl3),
        }
    }

    /// 保存前の正規化: 1未満のマージンを%に直す
    pub fn normalized(mut self) -> Self {
        self.margin = self.margin.map(to_percent);
        self.dealer_margin = self.dealer_margin.map(to_percent);
        self
    }
}

/// 1未満は割合とみなして%に変換
pub fn to_percent(value: f64) -> f64 {
    if value < 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// 工賃ティア
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaborLevel {
    One,
    TwoMajor,
    TwoMinor,
    Three,
}

impl LaborLevel {
    /// ティア未指定時に探す順序
    pub const FALLBACK_ORDER: [LaborLevel; 4] = [
        LaborLevel::TwoMajor,
        LaborLevel::TwoMinor,
        LaborLevel::One,
        LaborLevel::Three,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaborLevel::One => "1",
            LaborLevel::TwoMajor => "2_major",
            LaborLevel::TwoMinor => "2_minor",
            LaborLevel::Three => "3",
        }
    }
}

impl fmt::Display for LaborLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaborLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" => Ok(LaborLevel::One),
            "2_major" => Ok(LaborLevel::TwoMajor),
            "2_minor" => Ok(LaborLevel::TwoMinor),
            "3" => Ok(LaborLevel::Three),
            other => Err(Error::InvalidInput(format!("unknown labor level '{}'", other))),
        }
    }
}

impl Serialize for LaborLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 数値または文字列で届く値（フォーム入力・スプレッドシート由来）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Number(f64),
    Text(String),
}

impl Loose {
    /// 数値に変換（変換できない・有限でない場合は`None`）
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Loose::Number(n) => *n,
            Loose::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// 工賃ティアとして解釈（`1` / `"1"` / `"2_major"` など）
    pub fn as_labor_level(&self) -> Option<LaborLevel> {
        match self {
            Loose::Number(n) if *n == 1.0 => Some(LaborLevel::One),
            Loose::Number(n) if *n == 3.0 => Some(LaborLevel::Three),
            Loose::Number(_) => None,
            Loose::Text(s) => s.parse().ok(),
        }
    }
}

impl From<f64> for Loose {
    fn from(value: f64) -> Self {
        Loose::Number(value)
    }
}

impl From<&str> for Loose {
    fn from(value: &str) -> Self {
        Loose::Text(value.to_string())
    }
}

/// 顧客区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    #[default]
    Customer,
    Dealer,
}

impl CustomerType {
    /// "dealer"（大文字小文字無視）以外はすべて一般顧客
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "dealer" => CustomerType::Dealer,
            _ => CustomerType::Customer,
        }
    }

    pub fn is_dealer(&self) -> bool {
        matches!(self, CustomerType::Dealer)
    }
}

/// 部品の選択（数量0・未指定は1個）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSelection {
    #[serde(alias = "id")]
    pub part_id: i64,
    #[serde(default)]
    pub qty: Option<u32>,
}

impl PartSelection {
    pub fn new(part_id: i64, qty: u32) -> Self {
        Self { part_id, qty: Some(qty) }
    }

    pub fn quantity(&self) -> u32 {
        self.qty.filter(|q| *q > 0).unwrap_or(1)
    }
}

/// 価格計算リクエスト
///
/// `manual_total` があれば部品は参照しない。なければ `parts`（空でない場合）、
/// それもなければ `part_id` の1個を使う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRequest {
    #[serde(default, alias = "manual_total_map")]
    pub manual_total: Option<Loose>,
    #[serde(default)]
    pub manual_label: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<PartSelection>>,
    #[serde(default)]
    pub part_id: Option<i64>,
    pub formula_id: i64,
    #[serde(default)]
    pub labor_level: Option<Loose>,
    #[serde(default)]
    pub customer_type: Option<String>,
}

impl PriceRequest {
    pub fn customer(&self) -> CustomerType {
        CustomerType::parse_lenient(self.customer_type.as_deref())
    }

    /// 指定された工賃ティア（不正な値は指定なし扱い）
    pub fn labor_preference(&self) -> Option<LaborLevel> {
        self.labor_level.as_ref().and_then(Loose::as_labor_level)
    }

    /// 手入力の合計額（数値でなければ0）
    pub fn manual_total_value(&self) -> Option<f64> {
        self.manual_total.as_ref().map(|v| v.as_f64().unwrap_or(0.0))
    }

    /// 手入力時のラベル（空なら "Manual"）
    pub fn manual_label_or_default(&self) -> String {
        self.manual_label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Manual")
            .to_string()
    }

    /// 参照する部品の一覧
    pub fn selections(&self) -> Vec<PartSelection> {
        match &self.parts {
            Some(parts) if !parts.is_empty() => parts.clone(),
            _ => self
                .part_id
                .map(|id| vec![PartSelection::new(id, 1)])
                .unwrap_or_default(),
        }
    }
}

/// 価格計算結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceResult {
    /// 先頭の部品コード（手入力時はラベル）
    pub part_code: String,
    pub part_codes: Vec<String>,
    pub base_price: f64,
    pub labor_cost: f64,
    /// マージン額
    pub margin: f64,
    /// 実際に適用したマージン率（%）
    pub margin_pct: f64,
    pub total_map: f64,
    pub exchange_rate: f64,
    pub final_price_in_source: f64,
    pub final_price_in_target: f64,
    pub formula_class: String,
    pub labor_level_used: LaborLevel,
    /// 呼び出し側が機種判定結果を添えた場合のみ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl PriceResult {
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.03), 3.0);
        assert_eq!(to_percent(3.0), 3.0);
        assert_eq!(to_percent(1.0), 1.0);
        assert_eq!(to_percent(0.0), 0.0);
    }

    #[test]
    fn test_formula_normalized() {
        let formula = PriceFormula {
            class_name: "midend".into(),
            margin: Some(0.02),
            dealer_margin: Some(0.5),
            ..Default::default()
        }
        .normalized();
        assert_eq!(formula.margin, Some(2.0));
        assert_eq!(formula.dealer_margin, Some(50.0));
    }

    #[test]
    fn test_labor_level_parse() {
        assert_eq!("2_major".parse::<LaborLevel>().unwrap(), LaborLevel::TwoMajor);
        assert_eq!(" 3 ".parse::<LaborLevel>().unwrap(), LaborLevel::Three);
        assert!(matches!("2".parse::<LaborLevel>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_loose_labor_level() {
        assert_eq!(Loose::Number(1.0).as_labor_level(), Some(LaborLevel::One));
        assert_eq!(Loose::Number(3.0).as_labor_level(), Some(LaborLevel::Three));
        assert_eq!(Loose::Number(2.0).as_labor_level(), None);
        assert_eq!(Loose::from("2_minor").as_labor_level(), Some(LaborLevel::TwoMinor));
        assert_eq!(Loose::from("heavy").as_labor_level(), None);
    }

    #[test]
    fn test_loose_number() {
        assert_eq!(Loose::from("12.5").as_f64(), Some(12.5));
        assert_eq!(Loose::from("abc").as_f64(), None);
        assert_eq!(Loose::Number(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_request_deserialize_variants() {
        let json = r#"{
            "manual_total_map": "150",
            "formula_id": 2,
            "labor_level": 1,
            "customer_type": "DEALER"
        }"#;
        let req: PriceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.manual_total_value(), Some(150.0));
        assert_eq!(req.labor_preference(), Some(LaborLevel::One));
        assert!(req.customer().is_dealer());
        assert_eq!(req.manual_label_or_default(), "Manual");
    }

    #[test]
    fn test_request_selections() {
        let req = PriceRequest {
            part_id: Some(5),
            parts: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(req.selections(), vec![PartSelection::new(5, 1)]);

        let req = PriceRequest {
            part_id: Some(5),
            parts: Some(vec![PartSelection { part_id: 7, qty: Some(0) }]),
            ..Default::default()
        };
        let selections = req.selections();
        assert_eq!(selections[0].part_id, 7);
        assert_eq!(selections[0].quantity(), 1);

        assert!(PriceRequest::default().selections().is_empty());
    }

    #[test]
    fn test_customer_type_lenient() {
        assert_eq!(CustomerType::parse_lenient(None), CustomerType::Customer);
        assert_eq!(CustomerType::parse_lenient(Some("retail")), CustomerType::Customer);
        assert_eq!(CustomerType::parse_lenient(Some(" Dealer ")), CustomerType::Dealer);
    }

    #[test]
    fn test_labor_level_serializes_as_token() {
        assert_eq!(serde_json::to_string(&LaborLevel::TwoMinor).unwrap(), "\"2_minor\"");
    }
}
