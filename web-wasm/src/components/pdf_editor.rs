//! PDF画面編集コンポーネント
//!
//! 選択した1つ目のPDFを pdf.js で描画し、テキスト項目ごとにクリック領域を重ねる。
//! 置換テキストは領域クリックで出る入力欄で受け取り、確定分を一覧に溜めて
//! まとめて /edit-pdf に送る。送信は通常の実行ボタンとは別経路。

use crate::api::{backend, pdf_bridge};
use crate::download::{iso_timestamp, trigger_download};
use crate::state::ToolState;
use gloo::console;
use leptos::html::Canvas;
use leptos::prelude::*;
use pdf_master_common::editor::EDIT_ENDPOINT;
use pdf_master_common::tool::download_filename;
use pdf_master_common::{
    layout_regions, EditError, EditRequest, EditorPhase, EditorSession, SubmitError, TextRegion,
    ToolKind,
};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::File;

/// 編集画面の通知（成功とエラーで見た目を分ける）
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMessage {
    Info(String),
    Error(String),
}

impl EditorMessage {
    pub fn class(&self) -> &'static str {
        match self {
            EditorMessage::Info(_) => "editor-message",
            EditorMessage::Error(_) => "editor-message error",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            EditorMessage::Info(text) | EditorMessage::Error(text) => text,
        }
    }

    /// 適用結果から
    pub fn applied(result: Result<(), SubmitError>) -> Self {
        match result {
            Ok(()) => EditorMessage::Info("Edits applied. File downloaded.".to_string()),
            Err(e) => EditorMessage::Error(format!("Error: {}", e)),
        }
    }
}

/// 領域の配置（画面座標）
pub fn region_style(region: &TextRegion, edited: bool) -> String {
    let color = if edited { "inherit" } else { "transparent" };
    format!(
        "left: {:.1}px; top: {:.1}px; width: {:.1}px; height: {:.1}px; font-size: {:.1}px; color: {}",
        region.left, region.top, region.width, region.height, region.height, color
    )
}

async fn read_file(file: &File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| crate::api::js_error_message(&e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[component]
pub fn PdfEditor(state: ToolState) -> impl IntoView {
    let editor = RwSignal::new(EditorSession::new());
    let regions = RwSignal::new(Vec::<TextRegion>::new());
    let pending = RwSignal::new(None::<EditRequest>);
    let draft = RwSignal::new(String::new());
    let message = RwSignal::new(None::<EditorMessage>);
    let applying = RwSignal::new(false);
    let loaded_file = StoredValue::new_local(None::<File>);
    let render_seq = StoredValue::new(0u64);
    let canvas_ref: NodeRef<Canvas> = NodeRef::new();

    // 現在のページ・倍率で描画し直す（古い描画結果は捨てる）
    let render = move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let (page, zoom) = editor.with_untracked(|e| (e.page_index(), e.zoom()));
        let seq = render_seq.get_value() + 1;
        render_seq.set_value(seq);
        pending.set(None);

        spawn_local(async move {
            let result = async {
                let viewport = pdf_bridge::render_page(&canvas, page, zoom).await?;
                let items = pdf_bridge::page_text_items(page).await?;
                Ok::<_, String>(layout_regions(&items, &viewport))
            }
            .await;

            if render_seq.get_value() != seq {
                return;
            }
            match result {
                Ok(laid_out) => regions.set(laid_out),
                Err(e) => {
                    console::error!(format!("render failed: {}", e));
                    regions.set(Vec::new());
                }
            }
        });
    };

    let load = move |_| {
        let Some(file) = state.first_file() else {
            return;
        };
        message.set(None);
        regions.set(Vec::new());
        pending.set(None);
        let mut generation = 0;
        editor.update(|e| generation = e.begin_load());
        loaded_file.set_value(Some(file.clone()));

        spawn_local(async move {
            let loaded = match read_file(&file).await {
                Ok(bytes) => pdf_bridge::load_pdf(&bytes).await,
                Err(e) => Err(e),
            };

            let mut outcome = Ok(());
            match loaded {
                Ok(page_count) => editor.update(|e| outcome = e.finish_load(generation, page_count)),
                Err(e) => {
                    editor.update(|ed| ed.fail_load(generation));
                    outcome = Err(EditError::LoadFailed(e));
                }
            }

            match outcome {
                Ok(()) => render(),
                // 後から始まった読み込みがある
                Err(EditError::NotReady) => {}
                Err(e) => {
                    console::error!(e.to_string());
                    message.set(Some(EditorMessage::Error(e.to_string())));
                }
            }
        });
    };

    let navigate = move |step: fn(&mut EditorSession) -> bool| {
        let mut changed = false;
        editor.update(|e| changed = step(e));
        if changed {
            render();
        }
    };

    let confirm = move |_| {
        if let Some(request) = pending.get_untracked() {
            let replacement = draft.get_untracked();
            editor.update(|e| {
                e.commit_edit(request, Some(replacement));
            });
        }
        pending.set(None);
    };

    let apply = move |_| {
        message.set(None);
        let fields = match editor.with_untracked(|e| e.form_fields()) {
            Ok(fields) => fields,
            Err(e) => {
                message.set(Some(EditorMessage::Error(e.to_string())));
                return;
            }
        };
        let Some(file) = loaded_file.get_value() else {
            message.set(Some(EditorMessage::Error(EditError::NotReady.to_string())));
            return;
        };

        applying.set(true);
        spawn_local(async move {
            let key = ToolKind::EditPdf.key();
            let result = backend::post_form(EDIT_ENDPOINT, &[file], &fields)
                .await
                .and_then(|body| {
                    let filename = download_filename(key, &iso_timestamp());
                    trigger_download(&body, &filename, ToolKind::EditPdf.definition().output_mime())
                        .map_err(SubmitError::Transport)
                });
            applying.set(false);
            message.set(Some(EditorMessage::applied(result)));
        });
    };

    let is_ready = move || editor.with(|e| e.is_ready());
    let edit_count = move || editor.with(|e| e.edits().len());

    view! {
        <div class="pdf-editor">
            <div class="editor-toolbar">
                <button
                    class="btn btn-secondary"
                    disabled=move || !state.has_files() || editor.with(|e| e.phase() == EditorPhase::Loading)
                    on:click=load
                >
                    {move || match editor.with(|e| e.phase()) {
                        EditorPhase::Loading => "Loading...",
                        _ => "Load for Editing",
                    }}
                </button>
                <Show when=is_ready>
                    <button class="btn btn-small" on:click=move |_| navigate(EditorSession::prev_page)>"◀"</button>
                    <span class="page-info">{move || editor.with(|e| e.page_label())}</span>
                    <button class="btn btn-small" on:click=move |_| navigate(EditorSession::next_page)>"▶"</button>
                    <button class="btn btn-small" on:click=move |_| navigate(EditorSession::zoom_out)>"−"</button>
                    <span class="zoom-info">{move || editor.with(|e| e.zoom_label())}</span>
                    <button class="btn btn-small" on:click=move |_| navigate(EditorSession::zoom_in)>"+"</button>
                </Show>
            </div>

            <div class="editor-viewport" style:display=move || if is_ready() { "block" } else { "none" }>
                <div class="page-container" style="position: relative; display: inline-block">
                    <canvas node_ref=canvas_ref />
                    <div class="text-layer" style="position: absolute; inset: 0">
                        {move || {
                            let page = editor.with(|e| e.page_index());
                            regions
                                .get()
                                .into_iter()
                                .map(|region| {
                                    let edited = editor
                                        .with(|e| e.edit_at(page, &region).map(|r| r.new_text.clone()));
                                    let style = region_style(&region, edited.is_some());
                                    let class = if edited.is_some() { "text-region edited" } else { "text-region" };
                                    let title = region.text.clone();
                                    let label = edited.unwrap_or_else(|| region.text.clone());
                                    view! {
                                        <div
                                            class=class
                                            style=style
                                            title=title
                                            on:click=move |_| {
                                                if let Some(request) = editor.with_untracked(|e| e.request_edit(&region)) {
                                                    draft.set(request.original_text.clone());
                                                    pending.set(Some(request));
                                                }
                                            }
                                        >
                                            {label}
                                        </div>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                </div>
            </div>

            {move || {
                pending
                    .get()
                    .map(|request| {
                        view! {
                            <div class="edit-prompt">
                                <label>"Replace \"" {request.original_text} "\" with:"</label>
                                <input
                                    type="text"
                                    prop:value=move || draft.get()
                                    on:input=move |ev| draft.set(event_target_value(&ev))
                                />
                                <button class="btn btn-primary btn-small" on:click=confirm>"OK"</button>
                                <button class="btn btn-tertiary btn-small" on:click=move |_| pending.set(None)>
                                    "Cancel"
                                </button>
                            </div>
                        }
                    })
            }}

            <div class="edit-list">
                <h4>{move || format!("Edits ({})", edit_count())}</h4>
                <ul>
                    {move || {
                        editor
                            .with(|e| e.edits().to_vec())
                            .into_iter()
                            .enumerate()
                            .map(|(index, record)| {
                                view! {
                                    <li>
                                        {format!(
                                            "Page {}: \"{}\" → \"{}\"",
                                            record.page + 1,
                                            record.old_text,
                                            record.new_text,
                                        )}
                                        <button
                                            class="remove-file"
                                            on:click=move |_| editor.update(|e| {
                                                e.discard_edit(index);
                                            })
                                        >
                                            "✕"
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </div>

            <button
                class="btn btn-primary"
                disabled=move || applying.get() || !is_ready()
                on:click=apply
            >
                {move || if applying.get() { "Applying..." } else { "Apply All Edits" }}
            </button>

            {move || {
                message.get().map(|m| view! { <p class=m.class()>{m.text().to_string()}</p> })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> TextRegion {
        TextRegion {
            index: 0,
            text: "Invoice".to_string(),
            left: 72.0,
            top: 100.5,
            width: 50.0,
            height: 14.0,
            doc_x: 72.0,
            doc_y: 700.0,
        }
    }

    #[test]
    fn test_region_style_hides_unedited_text() {
        let style = region_style(&region(), false);
        assert!(style.starts_with("left: 72.0px; top: 100.5px;"));
        assert!(style.ends_with("color: transparent"));
    }

    #[test]
    fn test_apply_failure_uses_error_class() {
        let failed = EditorMessage::applied(Err(SubmitError::Server("Bad PDF".to_string())));
        assert_eq!(failed.class(), "editor-message error");
        assert_eq!(failed.text(), "Error: Bad PDF");

        let done = EditorMessage::applied(Ok(()));
        assert_eq!(done.class(), "editor-message");
        assert_eq!(done.text(), "Edits applied. File downloaded.");
    }

    #[test]
    fn test_region_style_shows_edited_text() {
        let style = region_style(&region(), true);
        assert!(style.contains("font-size: 14.0px"));
        assert!(style.ends_with("color: inherit"));
    }
}
