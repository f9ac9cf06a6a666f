//! ツールセッション
//!
//! 開いているツールと選択ファイルを保持する。同時に開けるセッションは1つ。
//! ファイルハンドルの型はフロントエンドごとに異なる
//! （WASMでは `web_sys::File`、CLIではファイルパス）。

use crate::tool::{ToolDefinition, ToolId};
use tracing::debug;

/// 選択ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile<H> {
    pub name: String,
    pub size: u64,
    pub handle: H,
}

impl<H> SelectedFile<H> {
    pub fn new(name: impl Into<String>, size: u64, handle: H) -> Self {
        Self {
            name: name.into(),
            size,
            handle,
        }
    }

    /// 名前とサイズが一致すれば同一ファイルとみなす（内容は比較しない）
    pub fn same_file(&self, other: &SelectedFile<H>) -> bool {
        self.name == other.name && self.size == other.size
    }
}

/// ツールセッション
#[derive(Debug, Clone)]
pub struct Session<H> {
    tool: Option<ToolId>,
    files: Vec<SelectedFile<H>>,
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self {
            tool: None,
            files: Vec::new(),
        }
    }
}

impl<H> Session<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// ツールを開く（ファイル選択はリセット）
    ///
    /// 戻り値の定義でタイトル・受付拡張子・オプションフォームを描画する。
    pub fn activate_tool(&mut self, key: &str) -> &'static ToolDefinition {
        self.activate(ToolId::parse(key))
    }

    pub fn activate(&mut self, tool: impl Into<ToolId>) -> &'static ToolDefinition {
        let tool = tool.into();
        let definition = tool.definition();
        if tool.kind().is_none() {
            debug!(key = tool.key(), "unknown tool key, using fallback definition");
        }
        self.tool = Some(tool);
        self.files.clear();
        definition
    }

    /// ツールを閉じる
    pub fn deactivate(&mut self) {
        self.tool = None;
        self.files.clear();
    }

    pub fn tool(&self) -> Option<&ToolId> {
        self.tool.as_ref()
    }

    pub fn definition(&self) -> Option<&'static ToolDefinition> {
        self.tool.as_ref().map(ToolId::definition)
    }

    pub fn is_active(&self) -> bool {
        self.tool.is_some()
    }

    /// ファイルを追加（名前+サイズが既存と一致するものはスキップ）
    ///
    /// 到着順を保持する。追加できた件数を返す。
    pub fn add_files<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = SelectedFile<H>>,
    {
        let mut added = 0;
        for candidate in candidates {
            if self.files.iter().any(|f| f.same_file(&candidate)) {
                debug!(name = %candidate.name, size = candidate.size, "duplicate file skipped");
                continue;
            }
            self.files.push(candidate);
            added += 1;
        }
        added
    }

    /// 指定位置のファイルを削除（範囲外は何もしない）
    pub fn remove_file(&mut self, index: usize) -> Option<SelectedFile<H>> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn files(&self) -> &[SelectedFile<H>] {
        &self.files
    }

    /// 実行ボタンの有効判定（ファイルが1件以上）
    pub fn can_submit(&self) -> bool {
        !self.files.is_empty()
    }
}
