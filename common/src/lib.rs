//! Repair Pricer Common Library
//!
//! 機種判定（カタログ照合・カテゴリ推定）と修理価格計算の中核。
//! CLIから利用され、I/Oは呼び出し側に任せる。

pub mod types;
pub mod error;
pub mod normalize;
pub mod classifier;
pub mod reconcile;
pub mod catalog;
pub mod detect;
pub mod search;
pub mod pricing;

pub use types::{CatalogEntry, Category, PartRecord};
pub use error::{Error, Result};
pub use classifier::classify;
pub use reconcile::reconcile;
pub use catalog::{find_match, match_text, CatalogIndex, CatalogMatch, MatchConfig, MatchStrategy, SharedIndex};
pub use detect::{detect, enrich, filter_by_device, Detection, EnrichedPart};
pub use search::{select_parts, PartFilter, SearchQuery};
pub use pricing::{
    LaborLevel, PriceBook, PriceCalculator, PriceFormula, PriceRequest, PriceResult, PriceSource,
    PricingConfig,
};
