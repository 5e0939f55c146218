//! カタログ索引
//!
//! 機種カタログから照合用の索引を一度だけ構築する。
//! 構築後は読み取り専用で、複数スレッドからロックなしで共有できる。
//!
//! ## 索引の構成
//! - 型番パターン: 完全型番 / ベース型番 / 地域サフィックス除去 / メーカー接頭辞除去 / 末尾1文字除去
//! - 機種名パターン: 小文字化した機種名
//! - 数字末尾マップ: 型番本体の3〜4桁 → エントリ一覧

use crate::normalize;
use crate::types::CatalogEntry;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

lazy_static::lazy_static! {
    // SM-S928B → SM-S928
    static ref BASE_CODE_RE: Regex = Regex::new(r"(?i)^([A-Z]{2}-[A-Z0-9]*?\d+)").unwrap();
    // SM-S928B → S928B
    static ref CODE_BODY_RE: Regex = Regex::new(r"(?i)^[A-Z]{1,2}-(\w+)$").unwrap();
}

fn default_vendor_prefix() -> String {
    "SM-".to_string()
}

/// 照合設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// 型番のメーカー接頭辞
    #[serde(default = "default_vendor_prefix")]
    pub vendor_prefix: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            vendor_prefix: default_vendor_prefix(),
        }
    }
}

impl MatchConfig {
    /// 型番からメーカー接頭辞を除去（大文字小文字を無視）
    pub fn strip_vendor_prefix<'a>(&self, code: &'a str) -> &'a str {
        let prefix = self.vendor_prefix.as_str();
        if !prefix.is_empty()
            && code.len() >= prefix.len()
            && code.is_char_boundary(prefix.len())
            && code[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            &code[prefix.len()..]
        } else {
            code
        }
    }

    /// 型番の先頭文字（接頭辞の直後、小文字）
    pub fn lead_letter(&self, code: &str) -> Option<char> {
        let pre_slash = code.trim().split('/').next().unwrap_or_default();
        self.strip_vendor_prefix(pre_slash)
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
    }
}

/// 照合パターン（小文字化済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub text: String,
    /// `CatalogIndex::entries` の添字
    pub entry: usize,
}

/// 機種照合用の索引
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    /// 長い順（同長は登録順）
    code_patterns: Vec<Pattern>,
    /// 長い順（同長は登録順）
    name_patterns: Vec<Pattern>,
    tail_map: HashMap<String, Vec<usize>>,
    lead_letters: Vec<Option<char>>,
    config: MatchConfig,
    fingerprint: String,
}

impl CatalogIndex {
    /// カタログから索引を構築
    pub fn build(entries: Vec<CatalogEntry>, config: MatchConfig) -> Self {
        let mut code_patterns = Vec::new();
        let mut name_patterns = Vec::new();
        let mut tail_map: HashMap<String, Vec<usize>> = HashMap::new();
        let mut lead_letters = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            let code = entry.model_code.as_deref().map(str::trim).unwrap_or_default();
            lead_letters.push(config.lead_letter(code));

            if !code.is_empty() {
                let variants = code_variants(code, &config);
                code_patterns.extend(variants.patterns.into_iter().map(|text| Pattern { text, entry: idx }));
                if let Some(tail) = variants.tail {
                    tail_map.entry(tail).or_default().push(idx);
                }
            }

            let name = entry.model_name.trim();
            if !name.is_empty() {
                name_patterns.push(Pattern {
                    text: normalize::fold(name),
                    entry: idx,
                });
            }
        }

        sort_longest_first(&mut code_patterns);
        sort_longest_first(&mut name_patterns);

        let fingerprint = fingerprint(&entries, &config);

        tracing::debug!(
            entries = entries.len(),
            code_patterns = code_patterns.len(),
            name_patterns = name_patterns.len(),
            tails = tail_map.len(),
            "catalog_index_built"
        );

        Self {
            entries,
            code_patterns,
            name_patterns,
            tail_map,
            lead_letters,
            config,
            fingerprint,
        }
    }

    /// 既定の照合設定で構築
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self::build(entries, MatchConfig::default())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> &CatalogEntry {
        &self.entries[idx]
    }

    pub fn code_patterns(&self) -> &[Pattern] {
        &self.code_patterns
    }

    pub fn name_patterns(&self) -> &[Pattern] {
        &self.name_patterns
    }

    /// 数字末尾に対応するエントリ添字（登録順）
    pub fn tail_candidates(&self, tail: &str) -> &[usize] {
        self.tail_map.get(tail).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn lead_letter(&self, idx: usize) -> Option<char> {
        self.lead_letters[idx]
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// カタログ内容と照合設定のSHA-256（16進）
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 1エントリ分の型番パターン
#[derive(Debug, Default)]
struct CodeVariants {
    patterns: Vec<String>,
    tail: Option<String>,
}

impl CodeVariants {
    /// 同一エントリ内での重複は追加しない
    fn add(&mut self, pattern: &str) {
        let pattern = pattern.to_lowercase();
        if !pattern.is_empty() && !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}

fn code_variants(code: &str, config: &MatchConfig) -> CodeVariants {
    let mut variants = CodeVariants::default();
    let full = code.to_uppercase();

    // 完全型番
    variants.add(&full);

    // ベース型番
    let pre_slash = full.split('/').next().unwrap_or_default();
    let base = BASE_CODE_RE
        .captures(pre_slash)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .unwrap_or(pre_slash);
    variants.add(base);

    // 地域サフィックス除去 + メーカー接頭辞除去
    variants.add(config.strip_vendor_prefix(pre_slash));

    // 末尾1文字（工場・地域コード）を除去
    let body = CODE_BODY_RE
        .captures(pre_slash)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| config.strip_vendor_prefix(pre_slash));
    variants.add(strip_trailing_letter(body));

    variants.tail = normalize::first_digit_run(body).map(str::to_string);
    variants
}

fn strip_trailing_letter(body: &str) -> &str {
    match body.chars().next_back() {
        Some(c) if c.is_ascii_uppercase() => &body[..body.len() - 1],
        _ => body,
    }
}

fn sort_longest_first(patterns: &mut [Pattern]) {
    // 安定ソートなので同長は登録順を保つ
    patterns.sort_by(|a, b| b.text.chars().count().cmp(&a.text.chars().count()));
}

fn fingerprint(entries: &[CatalogEntry], config: &MatchConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.vendor_prefix.as_bytes());
    for entry in entries {
        hasher.update([0x1e]);
        for field in [
            entry.brand.as_str(),
            entry.model_name.as_str(),
            entry.model_code.as_deref().unwrap_or_default(),
            entry.category.map(|c| c.as_str()).unwrap_or_default(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0x1f]);
        }
    }
    hex::encode(hasher.finalize())
}
