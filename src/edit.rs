//! 対話式PDFテキスト編集
//!
//! サーバーでテキスト位置を抽出し、置換したい箇所を選んで新しい文字列を入力する。
//! 蓄積した編集はまとめて /edit-pdf に送る。

use crate::client::BackendClient;
use crate::collector::LocalFile;
use crate::error::Result;
use crate::pipeline::{save_download, timestamp_now};
use dialoguer::{Input, Select};
use pdf_master_common::tool::download_filename;
use pdf_master_common::{EditError, EditRequest, EditorSession, PdfTextSpan, ToolKind};
use std::path::{Path, PathBuf};

/// メニュー操作
enum MenuAction {
    Edit,
    Discard,
    Apply,
    Quit,
}

/// 選択肢の表示用に文字列を切り詰める
pub fn span_label(page: usize, span: &PdfTextSpan) -> String {
    const MAX_CHARS: usize = 60;
    let text: String = span.text.chars().take(MAX_CHARS).collect();
    let ellipsis = if span.text.chars().count() > MAX_CHARS { "…" } else { "" };
    format!("[p{}] {}{}", page + 1, text, ellipsis)
}

/// 対話式で編集し、適用したら出力パスを返す
pub async fn run_interactive_edit(
    client: &BackendClient,
    file: &LocalFile,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    println!("- テキストを抽出中...");
    let text = client.extract_text(file).await?;
    let spans: Vec<(usize, &PdfTextSpan)> = text.spans().collect();

    if spans.is_empty() {
        println!("編集できるテキストが見つかりません");
        return Ok(None);
    }
    println!("✔ {}ページ / {}箇所のテキストを検出\n", text.pages.len(), spans.len());

    let mut editor = EditorSession::new();
    let generation = editor.begin_load();
    editor.finish_load(generation, text.pages.len())?;

    let labels: Vec<String> = spans.iter().map(|(page, span)| span_label(*page, span)).collect();

    loop {
        match prompt_menu(editor.edits().len())? {
            MenuAction::Edit => {
                let index = Select::new()
                    .with_prompt("置換するテキスト")
                    .items(&labels)
                    .default(0)
                    .max_length(15)
                    .interact()?;
                let (page, span) = spans[index];
                let request = EditRequest::from_span(page, index, span);
                let replacement: String = Input::new()
                    .with_prompt(format!("新しいテキスト（元: {}）", request.original_text))
                    .with_initial_text(request.original_text.clone())
                    .allow_empty(true)
                    .interact_text()?;
                match editor.commit_edit(request, Some(replacement)) {
                    Some(record) => println!("✔ 記録: {} → {}", record.old_text, record.new_text),
                    None => println!("変更なし"),
                }
            }
            MenuAction::Discard => {
                if editor.edits().is_empty() {
                    println!("取り消す編集がありません");
                    continue;
                }
                let items: Vec<String> = editor
                    .edits()
                    .iter()
                    .map(|e| format!("[p{}] {} → {}", e.page + 1, e.old_text, e.new_text))
                    .collect();
                let index = Select::new()
                    .with_prompt("取り消す編集")
                    .items(&items)
                    .default(0)
                    .interact()?;
                editor.discard_edit(index);
            }
            MenuAction::Apply => {
                let fields = match editor.form_fields() {
                    Ok(fields) => fields,
                    Err(e @ EditError::NoEdits) => {
                        println!("{}", e);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                println!("- {}件の編集を適用中...", editor.edits().len());
                let body = client.apply_edits(file, &fields).await?;
                let filename = download_filename(ToolKind::EditPdf.key(), &timestamp_now());
                let path = save_download(output_dir, &filename, &body)?;
                return Ok(Some(path));
            }
            MenuAction::Quit => return Ok(None),
        }
    }
}

fn prompt_menu(edit_count: usize) -> Result<MenuAction> {
    let items = [
        "テキストを編集".to_string(),
        "編集を取り消す".to_string(),
        format!("適用して保存（{}件）", edit_count),
        "終了".to_string(),
    ];
    let choice = Select::new()
        .with_prompt("操作")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => MenuAction::Edit,
        1 => MenuAction::Discard,
        2 => MenuAction::Apply,
        _ => MenuAction::Quit,
    })
}
