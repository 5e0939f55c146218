//! テキスト正規化
//!
//! 機種照合・カテゴリ推定・部品検索で共有する表記揺れ吸収処理。
//!
//! ## 正規化の種類
//! - `fold`: 小文字化（照合用の部分一致比較）
//! - `compact`: 大文字化 + 区切り記号除去（`SM-A52.5` → `SMA525`）
//! - `alnum_upper`: 英数字以外をすべて除去して大文字化（検索語の変種）

use regex::Regex;

/// 区切りとして無視する文字
const SEPARATORS: [char; 3] = ['-', '.', '/'];

/// 小文字化（照合用）
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// 大文字化し、区切り記号と空白を除去
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !SEPARATORS.contains(c))
        .flat_map(char::to_uppercase)
        .collect()
}

/// 空白区切りの各トークンを`compact`したもの（空トークンは除外）
pub fn compact_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(compact)
        .filter(|t| !t.is_empty())
}

/// ASCII英数字のみ残して大文字化
pub fn alnum_upper(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// 数字列（3〜4桁）の出現
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitRun<'a> {
    /// 出現位置（バイトオフセット）
    pub start: usize,
    pub digits: &'a str,
}

impl DigitRun<'_> {
    /// 直前の1文字
    pub fn preceding_char(&self, text: &str) -> Option<char> {
        text[..self.start].chars().next_back()
    }
}

/// 3〜4桁の数字列を左から順に抽出（重複なし）
pub fn digit_runs(text: &str) -> Vec<DigitRun<'_>> {
    lazy_static::lazy_static! {
        static ref DIGIT_RUN_RE: Regex = Regex::new(r"[0-9]{3,4}").unwrap();
    }

    DIGIT_RUN_RE
        .find_iter(text)
        .map(|m| DigitRun { start: m.start(), digits: m.as_str() })
        .collect()
}

/// 最初の3〜4桁の数字列
pub fn first_digit_run(text: &str) -> Option<&str> {
    digit_runs(text).first().map(|run| run.digits)
}
