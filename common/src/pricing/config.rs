//! 価格計算の設定
//!
//! 価格式に値がないときの為替レートとクラス別マージンの既定値。

use serde::{Deserialize, Serialize};

/// 価格式に為替レートがないときの既定値
pub const DEFAULT_EXCHANGE_RATE: f64 = 1450.0;

/// 価格計算の既定値（価格式に値がないときに使う）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_exchange_rate")]
    pub default_exchange_rate: f64,

    /// クラス名の接頭辞ごとの既定マージン（%）。先に一致したものを使う
    #[serde(default = "default_class_margins")]
    pub class_margins: Vec<ClassMargin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMargin {
    /// クラス名の接頭辞（小文字で比較）
    pub prefix: String,
    pub margin_pct: f64,
}

impl ClassMargin {
    fn new(prefix: &str, margin_pct: f64) -> Self {
        Self {
            prefix: prefix.to_string(),
            margin_pct,
        }
    }
}

fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE
}

fn default_class_margins() -> Vec<ClassMargin> {
    vec![
        ClassMargin::new("low", 3.0),
        ClassMargin::new("mid", 2.0),
        ClassMargin::new("high", 1.0),
        ClassMargin::new("wear", 1.0),
        ClassMargin::new("tab", 2.0),
    ]
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_exchange_rate: default_exchange_rate(),
            class_margins: default_class_margins(),
        }
    }
}

impl PricingConfig {
    /// クラス名に対応する既定マージン（%）。該当なしは0
    pub fn default_margin_pct(&self, class_name: &str) -> f64 {
        let class_name = class_name.trim().to_lowercase();
        self.class_margins
            .iter()
            .find(|m| class_name.starts_with(&m.prefix.to_lowercase()))
            .map(|m| m.margin_pct)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_margin_by_class_prefix() {
        let config = PricingConfig::default();
        assert_eq!(config.default_margin_pct("lowend"), 3.0);
        assert_eq!(config.default_margin_pct("MidEnd"), 2.0);
        assert_eq!(config.default_margin_pct("highend"), 1.0);
        assert_eq!(config.default_margin_pct("wearable"), 1.0);
        assert_eq!(config.default_margin_pct("tab"), 2.0);
        assert_eq!(config.default_margin_pct("accessory"), 0.0);
        assert_eq!(config.default_margin_pct(""), 0.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PricingConfig = serde_json::from_str(r#"{"default_exchange_rate": 1310.0}"#).unwrap();
        assert_eq!(config.default_exchange_rate, 1310.0);
        assert_eq!(config.class_margins.len(), 5);

        let empty: PricingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PricingConfig::default());
    }
}
