//! PDF画面編集セッション
//!
//! 1つの文書について ページ送り・ズーム・テキスト置換の蓄積を管理する。
//! 描画とテキスト抽出は外部ライブラリ（pdf.js）またはサーバーに任せ、
//! ここでは状態遷移と送信内容だけを扱う。
//!
//! Idle → Loading → Ready（読み込み失敗で Idle に戻る）

use crate::text::{PdfTextSpan, TextRegion};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const ZOOM_STEP: f64 = 1.2;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

/// 編集内容の送信先
pub const EDIT_ENDPOINT: &str = "/edit-pdf";
pub const EDIT_MODE_FIELD: &str = "editMode";
pub const EDIT_MODE_TEXT: &str = "text";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("No edits to apply. Click on text in the document to edit it.")]
    NoEdits,

    #[error("Failed to load PDF: {0}")]
    LoadFailed(String),

    #[error("No document loaded")]
    NotReady,
}

/// 確定したテキスト置換1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub page: usize,
    pub old_text: String,
    pub new_text: String,
    pub x: f64,
    pub y: f64,
}

/// 置換テキストの入力依頼
///
/// テキスト領域のクリックで発行し、UI が入力結果と一緒に
/// [`EditorSession::commit_edit`] へ返す。
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub page: usize,
    pub region: usize,
    pub original_text: String,
    pub x: f64,
    pub y: f64,
}

impl EditRequest {
    pub fn from_region(page: usize, region: &TextRegion) -> Self {
        Self {
            page,
            region: region.index,
            original_text: region.text.clone(),
            x: region.doc_x,
            y: region.doc_y,
        }
    }

    /// サーバー抽出のテキスト片から
    pub fn from_span(page: usize, index: usize, span: &PdfTextSpan) -> Self {
        Self {
            page,
            region: index,
            original_text: span.text.clone(),
            x: span.x,
            y: span.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorPhase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// 編集セッション
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    phase: EditorPhase,
    page_count: usize,
    page_index: usize,
    zoom: f64,
    edits: Vec<EditRecord>,
    /// 読み込み世代（古い読み込み結果を捨てるため）
    generation: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self {
            phase: EditorPhase::Idle,
            page_count: 0,
            page_index: 0,
            zoom: 1.0,
            edits: Vec::new(),
            generation: 0,
        }
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み込み開始。前の文書の編集内容は破棄する
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.phase = EditorPhase::Loading;
        self.page_count = 0;
        self.page_index = 0;
        self.zoom = 1.0;
        self.edits.clear();
        self.generation
    }

    /// 読み込み完了。1ページ目・等倍で Ready になる
    pub fn finish_load(&mut self, generation: u64, page_count: usize) -> Result<(), EditError> {
        if generation != self.generation || self.phase != EditorPhase::Loading {
            debug!(generation, current = self.generation, "stale document load ignored");
            return Err(EditError::NotReady);
        }
        if page_count == 0 {
            self.phase = EditorPhase::Idle;
            return Err(EditError::LoadFailed("document has no pages".to_string()));
        }
        self.phase = EditorPhase::Ready;
        self.page_count = page_count;
        self.page_index = 0;
        self.zoom = 1.0;
        Ok(())
    }

    /// 読み込み失敗で Idle に戻す
    pub fn fail_load(&mut self, generation: u64) {
        if generation == self.generation {
            self.phase = EditorPhase::Idle;
            self.page_count = 0;
        }
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == EditorPhase::Ready
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// "Page 1 of 3" 表示用
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count)
    }

    pub fn zoom_label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as u32)
    }

    /// 拡大。変化した場合だけ true（再描画が必要）
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom * ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom / ZOOM_STEP)
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        if !self.is_ready() {
            return false;
        }
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if !self.is_ready() || self.page_index + 1 >= self.page_count {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.is_ready() || self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// 表示中ページの領域クリック
    pub fn request_edit(&self, region: &TextRegion) -> Option<EditRequest> {
        self.is_ready()
            .then(|| EditRequest::from_region(self.page_index, region))
    }

    /// 入力結果を確定する
    ///
    /// 未入力（キャンセル・空文字）や元と同じ文字列は記録しない。
    /// 同じ位置の既存記録は置き換える（記録自体は変更せず削除して追加）。
    pub fn commit_edit(
        &mut self,
        request: EditRequest,
        replacement: Option<String>,
    ) -> Option<&EditRecord> {
        let new_text = replacement.filter(|t| !t.is_empty() && *t != request.original_text)?;

        self.edits.retain(|e| !Self::same_position(e, request.page, request.x, request.y));
        debug!(page = request.page, old = %request.original_text, new = %new_text, "edit recorded");
        self.edits.push(EditRecord {
            page: request.page,
            old_text: request.original_text,
            new_text,
            x: request.x,
            y: request.y,
        });
        self.edits.last()
    }

    /// 記録を取り消す（範囲外は何もしない）
    pub fn discard_edit(&mut self, index: usize) -> Option<EditRecord> {
        (index < self.edits.len()).then(|| self.edits.remove(index))
    }

    pub fn edits(&self) -> &[EditRecord] {
        &self.edits
    }

    /// 領域に対応する記録（再描画時に編集済み表示を復元する）
    pub fn edit_at(&self, page: usize, region: &TextRegion) -> Option<&EditRecord> {
        self.edits
            .iter()
            .find(|e| Self::same_position(e, page, region.doc_x, region.doc_y) && e.old_text == region.text)
    }

    fn same_position(edit: &EditRecord, page: usize, x: f64, y: f64) -> bool {
        edit.page == page && edit.x == x && edit.y == y
    }

    /// 送信用フォーム項目（ファイル以外）
    ///
    /// editMode と edit_{i}_page / old_text / new_text / x / y。
    pub fn form_fields(&self) -> Result<Vec<(String, String)>, EditError> {
        if self.edits.is_empty() {
            return Err(EditError::NoEdits);
        }
        Ok(edit_fields(&self.edits))
    }
}

/// 編集記録をフォーム項目に展開
pub fn edit_fields(edits: &[EditRecord]) -> Vec<(String, String)> {
    let mut fields = vec![(EDIT_MODE_FIELD.to_string(), EDIT_MODE_TEXT.to_string())];
    for (i, edit) in edits.iter().enumerate() {
        fields.push((format!("edit_{}_page", i), edit.page.to_string()));
        fields.push((format!("edit_{}_old_text", i), edit.old_text.clone()));
        fields.push((format!("edit_{}_new_text", i), edit.new_text.clone()));
        fields.push((format!("edit_{}_x", i), edit.x.to_string()));
        fields.push((format!("edit_{}_y", i), edit.y.to_string()));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolKind;

    fn region(index: usize, text: &str, x: f64, y: f64) -> TextRegion {
        TextRegion {
            index,
            text: text.to_string(),
            left: x,
            top: y,
            width: 10.0,
            height: 10.0,
            doc_x: x,
            doc_y: y,
        }
    }

    fn ready(pages: usize) -> EditorSession {
        let mut editor = EditorSession::new();
        let generation = editor.begin_load();
        editor.finish_load(generation, pages).unwrap();
        editor
    }

    #[test]
    fn test_load_lifecycle() {
        let mut editor = EditorSession::new();
        assert_eq!(editor.phase(), EditorPhase::Idle);
        let generation = editor.begin_load();
        assert_eq!(editor.phase(), EditorPhase::Loading);
        editor.finish_load(generation, 3).unwrap();
        assert!(editor.is_ready());
        assert_eq!(editor.page_index(), 0);
        assert_eq!(editor.zoom(), 1.0);
        assert_eq!(editor.page_label(), "Page 1 of 3");
    }

    #[test]
    fn test_failed_load_returns_to_idle() {
        let mut editor = EditorSession::new();
        let generation = editor.begin_load();
        editor.fail_load(generation);
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert!(!editor.next_page());
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut editor = EditorSession::new();
        let first = editor.begin_load();
        let second = editor.begin_load();
        assert!(editor.finish_load(first, 2).is_err());
        assert_eq!(editor.phase(), EditorPhase::Loading);
        editor.finish_load(second, 2).unwrap();
        assert!(editor.is_ready());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut editor = ready(1);
        let mut steps = 0;
        while editor.zoom_in() {
            steps += 1;
        }
        assert_eq!(editor.zoom(), MAX_ZOOM);
        assert_eq!(steps, 7);
        while editor.zoom_out() {}
        assert_eq!(editor.zoom(), MIN_ZOOM);
        assert_eq!(editor.zoom_label(), "50%");
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut editor = ready(2);
        assert!(!editor.prev_page());
        assert!(editor.next_page());
        assert_eq!(editor.page_index(), 1);
        assert!(!editor.next_page());
        assert!(editor.prev_page());
    }

    #[test]
    fn test_edit_flow_produces_indexed_fields() {
        let mut editor = ready(2);
        editor.next_page();
        let r = region(4, "Draft", 72.5, 640.0);
        let request = editor.request_edit(&r).unwrap();
        let record = editor
            .commit_edit(request, Some("Final".to_string()))
            .cloned()
            .unwrap();
        assert_eq!(
            record,
            EditRecord {
                page: 1,
                old_text: "Draft".to_string(),
                new_text: "Final".to_string(),
                x: 72.5,
                y: 640.0,
            }
        );
        assert_eq!(editor.edits().len(), 1);

        let fields = editor.form_fields().unwrap();
        let get = |k: &str| fields.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("editMode"), Some("text"));
        assert_eq!(get("edit_0_page"), Some("1"));
        assert_eq!(get("edit_0_old_text"), Some("Draft"));
        assert_eq!(get("edit_0_new_text"), Some("Final"));
        assert_eq!(get("edit_0_x"), Some("72.5"));
        assert_eq!(get("edit_0_y"), Some("640"));
    }

    #[test]
    fn test_cancel_or_unchanged_is_not_recorded() {
        let mut editor = ready(1);
        let r = region(0, "Same", 1.0, 2.0);
        assert!(editor.commit_edit(editor.request_edit(&r).unwrap(), None).is_none());
        assert!(editor
            .commit_edit(editor.request_edit(&r).unwrap(), Some(String::new()))
            .is_none());
        assert!(editor
            .commit_edit(editor.request_edit(&r).unwrap(), Some("Same".to_string()))
            .is_none());
        assert!(editor.edits().is_empty());
    }

    #[test]
    fn test_re_edit_replaces_record() {
        let mut editor = ready(1);
        let r = region(0, "A", 1.0, 2.0);
        editor.commit_edit(editor.request_edit(&r).unwrap(), Some("B".to_string()));
        editor.commit_edit(editor.request_edit(&r).unwrap(), Some("C".to_string()));
        assert_eq!(editor.edits().len(), 1);
        assert_eq!(editor.edits()[0].old_text, "A");
        assert_eq!(editor.edits()[0].new_text, "C");
        assert!(editor.edit_at(0, &r).is_some());
        assert!(editor.edit_at(1, &r).is_none());
    }

    #[test]
    fn test_empty_edit_list_is_rejected() {
        let editor = ready(1);
        assert_eq!(editor.form_fields().unwrap_err(), EditError::NoEdits);
    }

    #[test]
    fn test_discard_and_reload_clear_edits() {
        let mut editor = ready(1);
        let r = region(0, "A", 1.0, 2.0);
        editor.commit_edit(editor.request_edit(&r).unwrap(), Some("B".to_string()));
        assert!(editor.discard_edit(3).is_none());
        assert!(editor.discard_edit(0).is_some());
        editor.commit_edit(editor.request_edit(&r).unwrap(), Some("B".to_string()));
        editor.begin_load();
        assert!(editor.edits().is_empty());
    }

    #[test]
    fn test_edit_endpoint_matches_catalog() {
        assert_eq!(ToolKind::EditPdf.definition().endpoint, Some(EDIT_ENDPOINT));
    }

    #[test]
    fn test_request_requires_ready() {
        let editor = EditorSession::new();
        assert!(editor.request_edit(&region(0, "A", 0.0, 0.0)).is_none());
    }
}
