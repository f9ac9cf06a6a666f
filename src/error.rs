use pdf_master_common::{EditError, SubmitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfMasterError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対象ファイルがありません: {0}")]
    NoInputFiles(String),

    #[error("オプション指定エラー: {0}")]
    InvalidOption(String),

    /// 送信パイプラインのエラー（メッセージはそのまま表示）
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Common(#[from] pdf_master_common::Error),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdfMasterError>;
