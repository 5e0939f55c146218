use clap::{Args, Parser, Subcommand};
use repair_pricer_common::pricing::PartSelection;
use repair_pricer_common::{Category, PartFilter};
use std::path::PathBuf;

/// `enrich` / `search` の部品マスタ指定
pub const PARTS_FLAG: &str = "--parts";
/// `price` の部品マスタ指定
pub const PRICE_PARTS_FLAG: &str = "--parts-file";
/// `price` の価格式指定
pub const PRICE_FORMULAS_FLAG: &str = "--formulas-file";

#[derive(Parser)]
#[command(name = "repair-pricer")]
#[command(about = "端末部品の機種判定・修理価格計算ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 機種カタログJSON（省略時は設定ファイル、なければ組み込みカタログ）
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// テキストから機種とティアを判定
    Detect {
        /// 判定するテキスト（複数可）
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// 部品マスタ全件に機種判定を付与
    Enrich {
        /// 部品マスタJSON
        #[arg(short, long)]
        parts: Option<PathBuf>,

        /// 機種キー（`機種名||型番`）で絞り込み
        #[arg(short, long)]
        device: Option<String>,

        /// 検索語で絞り込み
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        filter: PartFilterArgs,

        /// 件数のみ出力
        #[arg(long)]
        count: bool,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 部品を検索（`s928` などの略記も可）
    Search {
        /// 検索語
        #[arg(required = true)]
        term: String,

        /// 部品マスタJSON
        #[arg(short, long)]
        parts: Option<PathBuf>,

        #[command(flatten)]
        filter: PartFilterArgs,

        /// 件数のみ出力
        #[arg(long)]
        count: bool,
    },

    /// 修理価格を計算
    Price {
        /// 価格式ID
        #[arg(short, long)]
        formula: i64,

        /// 部品ID（`ID` または `ID:数量`、複数可）
        #[arg(short, long = "part")]
        parts: Vec<PartArg>,

        /// 手入力の部品合計（指定時は部品を参照しない）
        #[arg(long)]
        manual_total: Option<String>,

        /// 手入力時のラベル
        #[arg(long)]
        manual_label: Option<String>,

        /// 工賃ティア (1/2_major/2_minor/3)
        #[arg(short, long)]
        labor: Option<String>,

        /// ディーラー価格で計算
        #[arg(long)]
        dealer: bool,

        /// 先頭部品から機種判定してカテゴリを添える
        #[arg(long)]
        detect: bool,

        /// 部品マスタJSON
        #[arg(long)]
        parts_file: Option<PathBuf>,

        /// 価格式JSON
        #[arg(long)]
        formulas_file: Option<PathBuf>,
    },

    /// 機種カタログを一覧表示
    Catalog {
        /// 型番・機種名で絞り込み（大文字小文字を区別）
        #[arg(short, long)]
        search: Option<String>,

        /// カテゴリで絞り込み (highend/midend/lowend/tab/wearable)
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,
    },
}

impl Commands {
    /// `price` で部品マスタの読み込みが必要か
    ///
    /// 部品指定がなければ不要。手入力額のみなら機種判定するときだけ必要。
    pub fn needs_parts_file(&self) -> bool {
        match self {
            Commands::Price { parts, manual_total, detect, .. } => {
                !parts.is_empty() && (manual_total.is_none() || *detect)
            }
            Commands::Enrich { .. } | Commands::Search { .. } => true,
            _ => false,
        }
    }
}

/// 部品の属性による絞り込み
#[derive(Args, Clone, Debug, Default)]
pub struct PartFilterArgs {
    /// 取扱状態（完全一致、例: Active）
    #[arg(long)]
    pub status: Option<String>,

    /// 定価の下限
    #[arg(long)]
    pub min_price: Option<f64>,

    /// 定価の上限
    #[arg(long)]
    pub max_price: Option<f64>,

    /// 在庫あり (true) / 在庫0 (false)
    #[arg(long)]
    pub in_stock: Option<bool>,
}

impl From<PartFilterArgs> for PartFilter {
    fn from(args: PartFilterArgs) -> Self {
        PartFilter {
            status: args.status,
            min_price: args.min_price,
            max_price: args.max_price,
            in_stock: args.in_stock,
        }
    }
}

/// `--part` 引数（`ID` または `ID:数量`）
#[derive(Clone, Debug, PartialEq)]
pub struct PartArg(pub PartSelection);

impl std::str::FromStr for PartArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty) = match s.split_once(':') {
            Some((id, qty)) => (id, Some(qty)),
            None => (s, None),
        };

        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| format!("Invalid part id: {}. Use ID or ID:QTY", s))?;
        let qty = match qty {
            Some(q) => Some(
                q.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid quantity: {}. Use ID or ID:QTY", s))?,
            ),
            None => None,
        };

        Ok(PartArg(PartSelection { part_id: id, qty }))
    }
}
