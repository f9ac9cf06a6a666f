//! ツール実行パイプライン（CLI）
//!
//! セッション作成 → ファイル追加 → 検証・送信内容作成 → 送信（見せかけの進捗つき）
//! → ダウンロード保存。

use crate::client::BackendClient;
use crate::collector;
use crate::error::{PdfMasterError, Result};
use chrono::{SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_master_common::progress::{CosmeticProgress, TICK_INTERVAL_MS};
use pdf_master_common::{submission, OptionValues, PreparedSubmission, Session, SubmitError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 実行結果
#[derive(Debug)]
pub struct RunOutcome {
    pub output: PathBuf,
    pub files_sent: usize,
    pub duplicates_skipped: usize,
}

/// ダウンロード名に使う現在時刻（ブラウザの toISOString と同じ形式）
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ツールを実行して結果を保存する
pub async fn run_tool(
    client: &BackendClient,
    tool_key: &str,
    paths: &[PathBuf],
    values: &OptionValues,
    output_dir: &Path,
    show_progress: bool,
) -> Result<RunOutcome> {
    let mut session = Session::new();
    let definition = session.activate_tool(tool_key);

    let candidates = collector::collect_files(paths, &definition.accept)?;
    let total = candidates.len();
    let added = session.add_files(candidates);
    if !session.can_submit() {
        return Err(PdfMasterError::NoInputFiles(
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ));
    }

    for key in values.unknown_keys(definition) {
        warn!(tool = tool_key, option = key, "option not used by this tool");
    }

    let prepared = submission::prepare(&session, values)?;
    let body = submit_with_progress(client, &prepared, show_progress).await?;

    let filename = prepared.download_filename(&timestamp_now());
    let output = save_download(output_dir, &filename, &body)?;

    Ok(RunOutcome {
        output,
        files_sent: added,
        duplicates_skipped: total - added,
    })
}

/// 送信中だけ見せかけの進捗を表示する
pub async fn submit_with_progress(
    client: &BackendClient,
    prepared: &PreparedSubmission<'_, PathBuf>,
    show_progress: bool,
) -> std::result::Result<Vec<u8>, SubmitError> {
    let ticker = ProgressTicker::start(show_progress);
    let result = client.submit(prepared).await;
    ticker.finish(result.is_ok());
    result
}

/// 結果を書き出す
pub fn save_download(output_dir: &Path, filename: &str, body: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(filename);
    std::fs::write(&path, body)?;
    info!(path = %path.display(), bytes = body.len(), "download saved");
    Ok(path)
}

/// 進捗バーを進めるタイマー
///
/// 90% で自然停止する。結果到着時に `finish` でタスクを打ち切る。
pub struct ProgressTicker {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn start(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(100);
            let style = ProgressStyle::with_template("{bar:40.cyan/blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        } else {
            ProgressBar::hidden()
        };

        let task_bar = bar.clone();
        let task = tokio::spawn(async move {
            let mut progress = CosmeticProgress::start();
            let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS as u64));
            interval.tick().await;
            task_bar.set_message(progress.label());
            loop {
                interval.tick().await;
                let running = progress.tick(rand::random::<f64>());
                task_bar.set_position(progress.percent() as u64);
                task_bar.set_message(progress.label());
                if !running {
                    break;
                }
            }
        });

        Self { bar, task }
    }

    pub fn finish(self, success: bool) {
        self.task.abort();
        if success {
            self.bar.set_position(100);
            self.bar.finish_with_message("Processing Complete!");
        } else {
            self.bar.abandon_with_message("Processing Failed!");
        }
    }
}
