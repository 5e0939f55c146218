//! 部品検索
//!
//! 検索語から部分一致用の検索キーを展開し、部品コード・説明と照合する。
//! `s928` のような略記でも `SM-S928B` 系の部品に届くよう、数字末尾と
//! 先頭英字+数字の組み合わせも検索キーに含める。
//!
//! 取扱状態・定価の範囲・在庫有無の絞り込みは `PartFilter` で検索語と併用する。

use crate::normalize;
use crate::types::PartRecord;
use regex::Regex;

/// 展開済みの検索キー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needles: Vec<String>,
}

impl SearchQuery {
    /// 検索語を展開する（空なら`None`）
    ///
    /// 1. 検索語そのもの
    /// 2. 英数字のみ・大文字化した変種
    /// 3. 3〜4桁の数字列すべて
    /// 4. 最初の「英字1文字+数字3〜4桁」（大文字）
    pub fn parse(term: &str) -> Option<Self> {
        lazy_static::lazy_static! {
            static ref LEAD_TAIL_RE: Regex = Regex::new(r"([A-Za-z])([0-9]{3,4})").unwrap();
        }

        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let mut query = Self { needles: Vec::new() };
        query.push(term);

        let compact = normalize::alnum_upper(term);
        if compact != term {
            query.push(&compact);
        }

        for run in normalize::digit_runs(term) {
            query.push(run.digits);
        }

        let source = if compact.is_empty() { term } else { compact.as_str() };
        if let Some(cap) = LEAD_TAIL_RE.captures(source) {
            query.push(&format!("{}{}", cap[1].to_uppercase(), &cap[2]));
        }

        Some(query)
    }

    fn push(&mut self, needle: &str) {
        if !needle.is_empty() && !self.needles.iter().any(|n| n == needle) {
            self.needles.push(needle.to_string());
        }
    }

    pub fn needles(&self) -> &[String] {
        &self.needles
    }

    /// 部品コードまたは説明にいずれかの検索キーを含む（大文字小文字を無視）
    pub fn matches(&self, part: &PartRecord) -> bool {
        let code = normalize::fold(&part.code);
        let description = part.description.as_deref().map(normalize::fold).unwrap_or_default();
        self.needles.iter().any(|needle| {
            let needle = normalize::fold(needle);
            code.contains(&needle) || description.contains(&needle)
        })
    }

    pub fn filter<'a>(&self, parts: &'a [PartRecord]) -> Vec<&'a PartRecord> {
        parts.iter().filter(|p| self.matches(p)).collect()
    }
}

/// 部品の属性による絞り込み
///
/// 条件を指定した項目が未設定の部品は除外する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartFilter {
    /// 取扱状態（完全一致）
    pub status: Option<String>,
    /// 定価の下限（以上）
    pub min_price: Option<f64>,
    /// 定価の上限（以下）
    pub max_price: Option<f64>,
    /// `true`: 在庫あり / `false`: 在庫0
    pub in_stock: Option<bool>,
}

impl PartFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.in_stock.is_none()
    }

    pub fn matches(&self, part: &PartRecord) -> bool {
        if let Some(status) = self.status.as_deref() {
            if part.status.as_deref() != Some(status) {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if !part.list_price.is_some_and(|price| price >= min) {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if !part.list_price.is_some_and(|price| price <= max) {
                return false;
            }
        }

        match (self.in_stock, part.stock_qty) {
            (None, _) => true,
            (Some(true), Some(qty)) => qty > 0,
            (Some(false), Some(qty)) => qty == 0,
            (Some(_), None) => false,
        }
    }
}

/// 検索語（任意）と属性条件の両方を満たす部品
pub fn select_parts<'a>(
    parts: &'a [PartRecord],
    query: Option<&SearchQuery>,
    filter: &PartFilter,
) -> Vec<&'a PartRecord> {
    parts
        .iter()
        .filter(|p| query.map(|q| q.matches(p)).unwrap_or(true))
        .filter(|p| filter.matches(p))
        .collect()
}
