//! 送信パイプライン
//!
//! セッションとフォーム値からマルチパート送信内容を組み立て、
//! レスポンスを成功（バイナリ）か失敗（メッセージ）に振り分ける。
//! 実際の通信はフロントエンド側（fetch / reqwest）が行う。

use crate::options::OptionValues;
use crate::session::{SelectedFile, Session};
use crate::tool::{self, ToolKind};
use thiserror::Error;
use tracing::warn;

/// 構造化エラーが読めなかったときの既定メッセージ
pub const GENERIC_FAILURE: &str = "Processing failed";

/// 送信エラー
///
/// `Display` がそのままユーザー向けメッセージになる。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Please select at least one file")]
    NoFiles,

    #[error("Please enter a password")]
    MissingPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// edit-pdf は置換一覧なしでは送れない（編集画面から送る）
    #[error("No edits to apply")]
    NoEdits,

    #[error("No endpoint configured for this tool")]
    Unconfigured,

    #[error("Empty response received")]
    EmptyResponse,

    /// サーバーが返したエラー
    #[error("{0}")]
    Server(String),

    /// 通信・読み込みエラー
    #[error("{0}")]
    Transport(String),
}

impl SubmitError {
    /// 入力を直せば再送できるクライアント側検証エラーか
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmitError::NoFiles
                | SubmitError::MissingPassword
                | SubmitError::PasswordMismatch
                | SubmitError::NoEdits
        )
    }
}

/// 送信準備の済んだリクエスト
#[derive(Debug)]
pub struct PreparedSubmission<'a, H> {
    pub tool_key: String,
    pub endpoint: &'static str,
    pub files: &'a [SelectedFile<H>],
    /// ファイル以外のフォーム項目（送信順）
    pub fields: Vec<(String, String)>,
}

impl<H> PreparedSubmission<'_, H> {
    /// ダウンロード時のファイル名
    pub fn download_filename(&self, timestamp: &str) -> String {
        tool::download_filename(&self.tool_key, timestamp)
    }

    pub fn output_mime(&self) -> &'static str {
        tool::lookup(&self.tool_key).output_mime()
    }
}

/// ツール固有の事前検証
///
/// パスワード保護は入力と確認の一致を見る。edit-pdf はフォーム値だけでは
/// 置換一覧が空なので、通常の送信経路では常に拒否する。
pub fn validate(kind: Option<ToolKind>, values: &OptionValues) -> Result<(), SubmitError> {
    match kind {
        Some(ToolKind::ProtectPdf) => {
            let password = values.get("password").unwrap_or_default();
            let confirm = values.get("confirmPassword").unwrap_or_default();
            if password.is_empty() {
                return Err(SubmitError::MissingPassword);
            }
            if password != confirm {
                return Err(SubmitError::PasswordMismatch);
            }
        }
        Some(ToolKind::EditPdf) => return Err(SubmitError::NoEdits),
        _ => {}
    }
    Ok(())
}

/// 送信内容を組み立てる
///
/// 検証 → フォーム項目 → エンドポイント解決の順。
/// どれかで失敗した場合は通信を行わない。
pub fn prepare<'a, H>(
    session: &'a Session<H>,
    values: &OptionValues,
) -> Result<PreparedSubmission<'a, H>, SubmitError> {
    let tool = session.tool().ok_or(SubmitError::Unconfigured)?;
    if !session.can_submit() {
        return Err(SubmitError::NoFiles);
    }

    validate(tool.kind(), values)?;

    let definition = tool.definition();
    let fields = values.form_fields(definition);

    let endpoint = match definition.endpoint {
        Some(endpoint) => endpoint,
        None => {
            warn!(key = tool.key(), "no endpoint configured");
            return Err(SubmitError::Unconfigured);
        }
    };

    Ok(PreparedSubmission {
        tool_key: tool.key().to_string(),
        endpoint,
        files: session.files(),
        fields,
    })
}

/// HTTPレスポンスを解釈する
///
/// 2xx で本文が空なら失敗扱い。2xx 以外は JSON の `error` を優先し、
/// JSON として読めなければステータス行からメッセージを作る。
pub fn interpret_response(
    status: u16,
    status_text: &str,
    body: Vec<u8>,
) -> Result<Vec<u8>, SubmitError> {
    if (200..300).contains(&status) {
        if body.is_empty() {
            return Err(SubmitError::EmptyResponse);
        }
        return Ok(body);
    }
    Err(SubmitError::Server(error_message(status, status_text, &body)))
}

/// 失敗レスポンスのメッセージ
pub fn error_message(status: u16, status_text: &str, body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => json
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(GENERIC_FAILURE)
            .to_string(),
        Err(_) => format!("Server error: {} {}", status, status_text),
    }
}

/// 送信の世代番号
///
/// 結果が届いたときに、送信を始めたセッションがまだ開いているかを判定する。
/// ツールを開き直す・閉じると `invalidate` し、古い結果は反映しない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitTickets {
    current: u64,
}

impl SubmitTickets {
    /// 新しい送信の番号を払い出す
    pub fn issue(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current == ticket
    }
}

/// 実行ボタンの押下時動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Submit,
    Reset,
}

/// 送信状態（進捗表示と実行ボタンの表示を決める）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Processing,
    Succeeded { filename: String },
    Failed { message: String },
}

impl SubmitPhase {
    /// 通信結果を反映する
    pub fn settle(result: Result<String, SubmitError>) -> Self {
        match result {
            Ok(filename) => SubmitPhase::Succeeded { filename },
            Err(e) => SubmitPhase::Failed {
                message: e.to_string(),
            },
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, SubmitPhase::Processing)
    }

    pub fn show_progress(&self) -> bool {
        !matches!(self, SubmitPhase::Idle)
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            SubmitPhase::Idle => "Process Files",
            SubmitPhase::Processing => "Processing...",
            SubmitPhase::Succeeded { .. } => "Process More Files",
            SubmitPhase::Failed { .. } => "Try Again",
        }
    }

    /// 成功・失敗後はどちらもリセットに繋がる
    pub fn button_action(&self) -> ButtonAction {
        match self {
            SubmitPhase::Idle | SubmitPhase::Processing => ButtonAction::Submit,
            SubmitPhase::Succeeded { .. } | SubmitPhase::Failed { .. } => ButtonAction::Reset,
        }
    }

    pub fn button_enabled(&self, has_files: bool) -> bool {
        match self {
            SubmitPhase::Idle => has_files,
            SubmitPhase::Processing => false,
            SubmitPhase::Succeeded { .. } | SubmitPhase::Failed { .. } => true,
        }
    }

    /// 進捗欄に出す完了・エラー文言
    pub fn status_text(&self) -> Option<String> {
        match self {
            SubmitPhase::Succeeded { .. } => {
                Some("Processing Complete! File downloaded.".to_string())
            }
            SubmitPhase::Failed { message } => Some(format!("Error: {}", message)),
            _ => None,
        }
    }
}
