//! 索引の差し替え
//!
//! 稼働中の索引は変更しない。カタログが変わったら新しい索引を構築し、
//! 参照（`Arc`）だけを入れ替える。照合側はスナップショットを取ってから使う。

use super::index::{CatalogIndex, MatchConfig};
use crate::types::CatalogEntry;
use std::sync::{Arc, RwLock};

/// 複数の照合処理で共有する索引ハンドル
#[derive(Debug)]
pub struct SharedIndex {
    current: RwLock<Arc<CatalogIndex>>,
}

impl SharedIndex {
    pub fn new(index: CatalogIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// 現在の索引のスナップショット
    pub fn snapshot(&self) -> Arc<CatalogIndex> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// 索引を丸ごと差し替える
    pub fn replace(&self, index: CatalogIndex) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(index);
    }

    /// カタログが変わっていれば再構築して差し替える
    ///
    /// 差し替えた場合は `true`
    pub fn replace_if_changed(&self, entries: Vec<CatalogEntry>, config: MatchConfig) -> bool {
        let rebuilt = CatalogIndex::build(entries, config);
        if rebuilt.fingerprint() == self.snapshot().fingerprint() {
            return false;
        }
        tracing::debug!(fingerprint = %rebuilt.fingerprint(), "catalog_index_swapped");
        self.replace(rebuilt);
        true
    }
}
