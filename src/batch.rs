//! 部品一覧の一括機種判定
//!
//! 索引は読み取り専用なのでスレッド間で共有し、部品ごとに並列で判定する。

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use repair_pricer_common::{enrich, CatalogIndex, EnrichedPart, PartRecord};

/// 全部品を判定する（結果は入力順）
pub fn enrich_all(parts: &[PartRecord], index: &CatalogIndex, show_progress: bool) -> Vec<EnrichedPart> {
    let progress = if show_progress {
        let bar = ProgressBar::new(parts.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let enriched: Vec<EnrichedPart> = parts
        .par_iter()
        .map(|part| {
            let result = enrich(part, index);
            progress.inc(1);
            result
        })
        .collect();

    progress.finish_and_clear();

    let detected = enriched.iter().filter(|p| !p.detection.is_empty()).count();
    tracing::debug!(total = enriched.len(), detected, "batch_enrich_done");
    enriched
}
