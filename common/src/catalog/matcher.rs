//! 機種照合
//!
//! 任意のテキスト（部品コード・説明文）から最も確からしいカタログエントリを探す。
//! 同じ入力と索引に対しては常に同じ結果を返す。
//!
//! ## 照合順序（最初に見つかった時点で確定）
//! 1. 型番パターン（長い順）の部分一致
//! 2. 機種名パターン（長い順）の部分一致
//! 3. 3〜4桁の数字末尾
//!    - 候補が1件ならそれ
//!    - 直前の英字と型番の先頭文字が一致する候補
//!    - カテゴリ優先度（highend > tab > wearable > midend > lowend）

use super::index::{CatalogIndex, Pattern};
use crate::normalize;
use crate::types::{CatalogEntry, Category};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

/// どの照合段階で確定したか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Code,
    Name,
    /// 数字末尾の候補が1件
    Tail,
    /// 数字末尾 + 直前英字で確定
    TailLeadLetter,
    /// 数字末尾 + カテゴリ優先度で確定
    TailPriority,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStrategy::Code => "code",
            MatchStrategy::Name => "name",
            MatchStrategy::Tail => "tail",
            MatchStrategy::TailLeadLetter => "tail_lead_letter",
            MatchStrategy::TailPriority => "tail_priority",
        };
        f.write_str(s)
    }
}

/// 照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub strategy: MatchStrategy,
    /// 一致したパターンまたは数字列
    pub matched: String,
}

/// テキストに最も合うカタログエントリを返す
pub fn match_text<'a>(text: &str, index: &'a CatalogIndex) -> Option<&'a CatalogEntry> {
    find_match(text, index).map(|m| m.entry)
}

/// 照合段階つきで最も合うカタログエントリを返す
pub fn find_match<'a>(text: &str, index: &'a CatalogIndex) -> Option<CatalogMatch<'a>> {
    let lower = normalize::fold(text);

    let found = find_pattern(&lower, index.code_patterns(), index, MatchStrategy::Code)
        .or_else(|| find_pattern(&lower, index.name_patterns(), index, MatchStrategy::Name))
        .or_else(|| find_tail(&lower, index));

    if let Some(ref m) = found {
        tracing::debug!(
            strategy = %m.strategy,
            matched = %m.matched,
            model = %m.entry.model_name,
            "catalog_match"
        );
    }
    found
}

fn find_pattern<'a>(
    lower: &str,
    patterns: &[Pattern],
    index: &'a CatalogIndex,
    strategy: MatchStrategy,
) -> Option<CatalogMatch<'a>> {
    patterns
        .iter()
        .find(|p| !p.text.is_empty() && lower.contains(p.text.as_str()))
        .map(|p| CatalogMatch {
            entry: index.entry(p.entry),
            strategy,
            matched: p.text.clone(),
        })
}

fn find_tail<'a>(lower: &str, index: &'a CatalogIndex) -> Option<CatalogMatch<'a>> {
    for run in normalize::digit_runs(lower) {
        let candidates = index.tail_candidates(run.digits);
        let (idx, strategy) = match candidates {
            [only] => (*only, MatchStrategy::Tail),
            _ => match resolve_ambiguous_tail(candidates, run.preceding_char(lower), index) {
                Some(found) => found,
                None => continue,
            },
        };
        return Some(CatalogMatch {
            entry: index.entry(idx),
            strategy,
            matched: run.digits.to_string(),
        });
    }
    None
}

/// 複数候補から1件に絞る（候補なしは`None`）
fn resolve_ambiguous_tail(
    candidates: &[usize],
    preceding: Option<char>,
    index: &CatalogIndex,
) -> Option<(usize, MatchStrategy)> {
    if let Some(prev) = preceding.filter(|c| c.is_alphabetic()) {
        let prev = prev.to_ascii_lowercase();
        if let Some(&idx) = candidates.iter().find(|&&idx| index.lead_letter(idx) == Some(prev)) {
            return Some((idx, MatchStrategy::TailLeadLetter));
        }
    }

    // min_by_key は同順位なら先頭を返す → 登録順で確定
    candidates
        .iter()
        .copied()
        .min_by_key(|&idx| Reverse(Category::tail_rank(index.entry(idx).category)))
        .map(|idx| (idx, MatchStrategy::TailPriority))
}

impl CatalogIndex {
    /// `match_text` のメソッド版
    pub fn lookup(&self, text: &str) -> Option<&CatalogEntry> {
        match_text(text, self)
    }
}
