use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("データファイルが不正: {0}")]
    InvalidData(String),

    #[error("引数が不正: {0}")]
    InvalidArgument(String),

    #[error("{what}のパスが設定されていません。`{flag} FILE` で指定するか設定ファイルに登録してください")]
    MissingPath { what: &'static str, flag: &'static str },

    #[error(transparent)]
    Core(#[from] repair_pricer_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PricerError>;
