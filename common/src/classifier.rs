//! カテゴリ推定（ヒューリスティック）
//!
//! カタログを使わず、テキスト中のキーワード・シリーズ名・型番接頭辞から
//! 製品ティアを推定する。先に一致した規則のみを採用する:
//!
//! 1. タブレット
//! 2. ウェアラブル
//! 3. ハイエンド（S / Note / Z シリーズ）
//! 4. Aシリーズ（世代番号で lowend / midend を分ける）
//! 5. 廉価系（M / F シリーズ、Xcover 等）

use crate::normalize;
use crate::types::Category;
use regex::Regex;

lazy_static::lazy_static! {
    static ref TAB_CODE_RE: Regex = Regex::new(r"(?i)\bSM-(?:T|X)\w+").unwrap();
    static ref WEARABLE_CODE_RE: Regex = Regex::new(r"(?i)\bSM-(?:R|L)\w+").unwrap();
    static ref SERIES_RE: Regex =
        Regex::new(r"(?i)\b(?:GALAXY\s*)?(?:S\d{1,2}|NOTE\s*\d{1,2}|Z\s*(?:FOLD|FLIP))").unwrap();
    static ref HIGHEND_CODE_RE: Regex = Regex::new(r"(?i)\bSM-(?:S9|S92|F9|N9)\w*").unwrap();
    static ref A_SERIES_RE: Regex = Regex::new(r"^A(\d{1,2})(?:\D|$)").unwrap();
    static ref BUDGET_SERIES_RE: Regex = Regex::new(r"^[MF]\d{1,2}(?:\D|$)").unwrap();
}

const TAB_KEYWORDS: [&str; 4] = ["galaxy tab", "tab s", "tab a", "tab active"];
const WEARABLE_KEYWORDS: [&str; 3] = ["galaxy watch", "gear s", "buds"];
const RUGGED_KEYWORDS: [&str; 2] = ["xcover", "core"];

/// テキストから製品ティアを推定する
pub fn classify(text: &str) -> Option<Category> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let lower = normalize::fold(text);

    if contains_any(&lower, &TAB_KEYWORDS) || TAB_CODE_RE.is_match(text) {
        return Some(Category::Tab);
    }

    if contains_any(&lower, &WEARABLE_KEYWORDS) || WEARABLE_CODE_RE.is_match(text) {
        return Some(Category::Wearable);
    }

    if SERIES_RE.is_match(text) || HIGHEND_CODE_RE.is_match(text) {
        return Some(Category::HighEnd);
    }

    if let Some(generation) = a_series_generation(text) {
        return Some(if generation <= 2 {
            Category::LowEnd
        } else {
            Category::MidEnd
        });
    }

    if normalize::compact_tokens(text).any(|t| BUDGET_SERIES_RE.is_match(&t))
        || contains_any(&lower, &RUGGED_KEYWORDS)
    {
        return Some(Category::LowEnd);
    }

    None
}

/// Aシリーズの世代番号（A54 → 5, A05 → 0, A7 → 7）
fn a_series_generation(text: &str) -> Option<u32> {
    normalize::compact_tokens(text).find_map(|token| {
        A_SERIES_RE
            .captures(&token)
            .and_then(|cap| cap[1].chars().next())
            .and_then(|c| c.to_digit(10))
    })
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
