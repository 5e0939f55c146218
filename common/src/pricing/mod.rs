//! 修理価格計算
//!
//! 部品・価格式・工賃ティア・顧客区分から最終価格を求める。
//! 機種判定とは独立しており、判定結果は呼び出し側が必要に応じて添える。
//!
//! ## 計算手順
//! 1. 基準額: 手入力額、または Σ 数量 × (定価 → 仕入値 → 0)
//! 2. 為替レート: 価格式の値、なければ既定値
//! 3. 工賃: 指定ティア、なければ 2_major → 2_minor → 1 → 3 の順で最初に設定のあるもの
//! 4. マージン率: ディーラー専用 → 標準 → クラス既定。1未満は%に換算
//! 5. 最終額: 基準額 + 工賃 + マージン額、およびその為替換算

pub mod config;
pub mod types;

pub use config::{ClassMargin, PricingConfig, DEFAULT_EXCHANGE_RATE};
pub use types::{
    to_percent, CustomerType, LaborLevel, Loose, PartSelection, PriceFormula, PriceRequest,
    PriceResult,
};

use crate::error::{Error, Result};
use crate::types::PartRecord;
use std::collections::HashMap;

/// 部品・価格式の参照先
pub trait PriceSource {
    fn part(&self, id: i64) -> Option<&PartRecord>;
    fn formula(&self, id: i64) -> Option<&PriceFormula>;
}

/// メモリ上の部品・価格式一覧
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    parts: HashMap<i64, PartRecord>,
    formulas: HashMap<i64, PriceFormula>,
}

impl PriceBook {
    pub fn new(parts: Vec<PartRecord>, formulas: Vec<PriceFormula>) -> Self {
        Self {
            parts: parts.into_iter().map(|p| (p.id, p)).collect(),
            formulas: formulas.into_iter().map(|f| (f.id, f)).collect(),
        }
    }

    pub fn parts(&self) -> impl Iterator<Item = &PartRecord> {
        self.parts.values()
    }

    pub fn formulas(&self) -> impl Iterator<Item = &PriceFormula> {
        self.formulas.values()
    }
}

impl PriceSource for PriceBook {
    fn part(&self, id: i64) -> Option<&PartRecord> {
        self.parts.get(&id)
    }

    fn formula(&self, id: i64) -> Option<&PriceFormula> {
        self.formulas.get(&id)
    }
}

/// 部品と数量
#[derive(Debug, Clone, Copy)]
pub struct PricedItem<'a> {
    pub part: &'a PartRecord,
    pub qty: u32,
}

/// 価格計算器
#[derive(Debug, Clone, Default)]
pub struct PriceCalculator {
    config: PricingConfig,
}

impl PriceCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// 部品・価格式を参照して価格を計算する
    ///
    /// 部品または価格式が見つからなければ `Error::NotFound`
    pub fn calculate<S: PriceSource + ?Sized>(&self, request: &PriceRequest, source: &S) -> Result<PriceResult> {
        let items = if request.manual_total.is_some() {
            Vec::new()
        } else {
            resolve_items(request, source)?
        };

        let formula = source
            .formula(request.formula_id)
            .ok_or_else(|| Error::NotFound(format!("formula {}", request.formula_id)))?;

        Ok(self.price(request, &items, formula))
    }

    /// 解決済みの部品と価格式から価格を計算する
    pub fn price(&self, request: &PriceRequest, items: &[PricedItem<'_>], formula: &PriceFormula) -> PriceResult {
        let customer = request.customer();
        let base = base_price(request, items);

        let exchange_rate = formula.exchange_rate.unwrap_or(self.config.default_exchange_rate);
        let (labor_cost, labor_level_used) =
            resolve_labor(formula, request.labor_preference(), customer);
        let margin_pct = self.resolve_margin_pct(formula, customer);

        let margin = base.total * margin_pct / 100.0;
        let final_price_in_source = base.total + labor_cost + margin;
        let final_price_in_target = final_price_in_source * exchange_rate;

        PriceResult {
            part_code: base.part_code,
            part_codes: base.part_codes,
            base_price: base.total,
            labor_cost,
            margin,
            margin_pct,
            total_map: base.total,
            exchange_rate,
            final_price_in_source,
            final_price_in_target,
            formula_class: formula.class_name.clone(),
            labor_level_used,
            category: None,
        }
    }

    /// マージン率（%）
    fn resolve_margin_pct(&self, formula: &PriceFormula, customer: CustomerType) -> f64 {
        if customer.is_dealer() {
            if let Some(dealer_margin) = formula.dealer_margin {
                return to_percent(dealer_margin);
            }
        }

        let pct = to_percent(
            formula
                .margin
                .unwrap_or_else(|| self.config.default_margin_pct(&formula.class_name)),
        );

        // ディーラー専用マージンがなければ標準マージンの半額
        if customer.is_dealer() {
            pct * 0.5
        } else {
            pct
        }
    }
}

fn resolve_items<'a, S: PriceSource + ?Sized>(
    request: &PriceRequest,
    source: &'a S,
) -> Result<Vec<PricedItem<'a>>> {
    let selections = request.selections();
    if selections.is_empty() {
        return Err(Error::NotFound("part (no part selected)".to_string()));
    }

    selections
        .iter()
        .map(|sel| {
            source
                .part(sel.part_id)
                .map(|part| PricedItem { part, qty: sel.quantity() })
                .ok_or_else(|| Error::NotFound(format!("part {}", sel.part_id)))
        })
        .collect()
}

struct BasePrice {
    total: f64,
    part_code: String,
    part_codes: Vec<String>,
}

fn base_price(request: &PriceRequest, items: &[PricedItem<'_>]) -> BasePrice {
    if let Some(total) = request.manual_total_value() {
        let label = request.manual_label_or_default();
        return BasePrice {
            total,
            part_code: label.clone(),
            part_codes: vec![label],
        };
    }

    let total: f64 = items
        .iter()
        .map(|item| item.part.unit_price() * f64::from(item.qty))
        .sum();
    let part_codes = items
        .iter()
        .map(|item| {
            if item.qty != 1 {
                format!("{} x{}", item.part.code, item.qty)
            } else {
                item.part.code.clone()
            }
        })
        .collect();

    BasePrice {
        total,
        part_code: items.first().map(|item| item.part.code.clone()).unwrap_or_default(),
        part_codes,
    }
}

/// 工賃と適用ティア
fn resolve_labor(
    formula: &PriceFormula,
    preference: Option<LaborLevel>,
    customer: CustomerType,
) -> (f64, LaborLevel) {
    let lookup = |level: LaborLevel| -> Option<f64> {
        let (standard, dealer) = formula.labor(level);
        match dealer {
            Some(value) if customer.is_dealer() => Some(value),
            _ => standard,
        }
    };

    if let Some(level) = preference {
        return (lookup(level).unwrap_or(0.0), level);
    }

    let (level, cost) = LaborLevel::FALLBACK_ORDER
        .iter()
        .find_map(|&level| lookup(level).map(|cost| (level, cost)))
        .unwrap_or((LaborLevel::Three, 0.0));

    tracing::debug!(level = %level, cost, "labor_level_fallback");
    (cost, level)
}
