//! ツールモーダルの状態
//!
//! セッション（選択ツール＋ファイル）・フォーム値・送信状態・見せかけの進捗を
//! シグナルで持ち、各コンポーネントへ `ToolState` ごと渡す。

use crate::api::backend;
use crate::download::{iso_timestamp, trigger_download};
use gloo::console;
use gloo::timers::callback::Interval;
use leptos::prelude::*;
use pdf_master_common::progress::TICK_INTERVAL_MS;
use pdf_master_common::tool::download_filename;
use pdf_master_common::{
    submission, ButtonAction, CosmeticProgress, OptionValues, SelectedFile, Session, SubmitError,
    SubmitPhase, SubmitTickets, ToolDefinition, ToolKind,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, FileList};

pub type BrowserFile = SelectedFile<File>;

/// 送信内容（セッションから切り離したもの）
struct Outgoing {
    tool_key: String,
    endpoint: &'static str,
    files: Vec<File>,
    fields: Vec<(String, String)>,
    mime: &'static str,
}

#[derive(Clone, Copy)]
pub struct ToolState {
    pub session: RwSignal<Session<File>, LocalStorage>,
    pub values: RwSignal<OptionValues>,
    pub phase: RwSignal<SubmitPhase>,
    pub progress: RwSignal<CosmeticProgress>,
    /// 送信前検証のメッセージ（送信状態は変えない）
    pub notice: RwSignal<Option<String>>,
    ticker: StoredValue<Option<Interval>, LocalStorage>,
    /// 送信中にセッションが入れ替わったら結果を捨てる
    tickets: StoredValue<SubmitTickets>,
}

impl ToolState {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new_local(Session::new()),
            values: RwSignal::new(OptionValues::new()),
            phase: RwSignal::new(SubmitPhase::Idle),
            progress: RwSignal::new(CosmeticProgress::default()),
            notice: RwSignal::new(None),
            ticker: StoredValue::new_local(None),
            tickets: StoredValue::new(SubmitTickets::default()),
        }
    }

    pub fn definition(&self) -> Option<&'static ToolDefinition> {
        self.session.with(|s| s.definition())
    }

    pub fn kind(&self) -> Option<ToolKind> {
        self.session.with(|s| s.tool().and_then(|t| t.kind()))
    }

    pub fn has_files(&self) -> bool {
        self.session.with(|s| s.can_submit())
    }

    /// ツールカードのクリック
    pub fn open(&self, kind: ToolKind) {
        let definition = kind.definition();
        self.session.update(|s| {
            s.activate(kind);
        });
        self.values.set(OptionValues::with_defaults(definition));
        self.tickets.update_value(|t| t.invalidate());
        self.reset();
    }

    /// モーダルを閉じる
    pub fn close(&self) {
        self.session.update(|s| s.deactivate());
        self.values.set(OptionValues::new());
        self.tickets.update_value(|t| t.invalidate());
        self.reset();
    }

    /// ファイル選択・ドロップの追加
    ///
    /// スキップするのは名前+サイズの重複だけ。拡張子の判定はサーバーに任せる。
    pub fn add_file_list(&self, list: &FileList) {
        let candidates: Vec<BrowserFile> = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|file| SelectedFile::new(file.name(), file.size() as u64, file))
            .collect();
        self.session.update(|s| {
            s.add_files(candidates);
        });
    }

    pub fn remove_file(&self, index: usize) {
        self.session.update(|s| {
            s.remove_file(index);
        });
    }

    pub fn first_file(&self) -> Option<File> {
        self.session
            .with_untracked(|s| s.files().first().map(|f| f.handle.clone()))
    }

    pub fn set_value(&self, key: &str, value: String) {
        self.values.update(|v| v.set(key, value));
    }

    /// 実行ボタン
    pub fn press_button(&self) {
        match self.phase.with_untracked(|p| p.button_action()) {
            ButtonAction::Submit => self.submit(),
            ButtonAction::Reset => self.reset(),
        }
    }

    /// 送信
    pub fn submit(&self) {
        if self.phase.with_untracked(|p| p.is_processing()) {
            return;
        }
        self.notice.set(None);

        let prepared = self.session.with_untracked(|session| {
            self.values.with_untracked(|values| {
                submission::prepare(session, values).map(|p| {
                    let mime = p.output_mime();
                    Outgoing {
                        files: p.files.iter().map(|f| f.handle.clone()).collect(),
                        tool_key: p.tool_key,
                        endpoint: p.endpoint,
                        fields: p.fields,
                        mime,
                    }
                })
            })
        });

        let outgoing = match prepared {
            Ok(outgoing) => outgoing,
            Err(e) if e.is_validation() => {
                self.notice.set(Some(e.to_string()));
                return;
            }
            Err(e) => {
                console::error!(e.to_string());
                self.phase.set(SubmitPhase::settle(Err(e)));
                return;
            }
        };

        self.phase.set(SubmitPhase::Processing);
        self.start_ticker();

        let mut ticket = 0;
        self.tickets.update_value(|t| ticket = t.issue());
        let state = *self;
        spawn_local(async move {
            let result = backend::post_form(outgoing.endpoint, &outgoing.files, &outgoing.fields)
                .await
                .and_then(|body| {
                    let filename = download_filename(&outgoing.tool_key, &iso_timestamp());
                    trigger_download(&body, &filename, outgoing.mime)
                        .map_err(SubmitError::Transport)?;
                    Ok(filename)
                });

            if let Err(e) = &result {
                console::error!(format!("{} failed: {}", outgoing.endpoint, e));
            }
            if !state.tickets.with_value(|t| t.is_current(ticket)) {
                console::log!(format!("{} settled after the tool was closed", outgoing.endpoint));
                return;
            }
            state.stop_ticker(result.is_ok());
            state.phase.set(SubmitPhase::settle(result));
        });
    }

    /// 成功・失敗後のリセット（選択ファイルは残す）
    pub fn reset(&self) {
        self.ticker.set_value(None);
        self.progress.set(CosmeticProgress::default());
        self.phase.set(SubmitPhase::Idle);
        self.notice.set(None);
    }

    /// 上限到達後の tick は何もしない。タイマーは結果到着時に破棄する
    fn start_ticker(&self) {
        self.progress.set(CosmeticProgress::start());
        let progress = self.progress;
        let interval = Interval::new(TICK_INTERVAL_MS, move || {
            progress.update(|p| {
                p.tick(js_sys::Math::random());
            });
        });
        self.ticker.set_value(Some(interval));
    }

    fn stop_ticker(&self, success: bool) {
        self.ticker.set_value(None);
        self.progress.update(|p| {
            if success {
                p.complete();
            } else {
                p.stop();
            }
        });
    }
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new()
    }
}
