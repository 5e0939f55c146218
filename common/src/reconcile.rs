//! カテゴリ統合
//!
//! テキスト推定とカタログ照合のカテゴリを1つにまとめる。

use crate::types::Category;

/// 推定カテゴリと照合カテゴリを統合する
///
/// - 一致していればそのまま
/// - 片方でも highend なら highend
/// - tab / wearable は照合側 → 推定側の順で優先
/// - それ以外はカタログ照合を優先
pub fn reconcile(inferred: Option<Category>, matched: Option<Category>) -> Option<Category> {
    match (inferred, matched) {
        (Some(i), Some(m)) if i == m => Some(m),
        (Some(i), Some(m)) => {
            if i == Category::HighEnd || m == Category::HighEnd {
                Some(Category::HighEnd)
            } else if m.is_form_factor() {
                Some(m)
            } else if i.is_form_factor() {
                Some(i)
            } else {
                Some(m)
            }
        }
        (None, m) => m,
        (i, None) => i,
    }
}
