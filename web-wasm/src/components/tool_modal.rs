//! ツールモーダル
//!
//! 開いているツールのアップロード・オプション・実行をまとめて表示する。
//! 外側（背景）のクリックか ✕ で閉じる。

use crate::components::{
    file_list::FileList, options_form::OptionsForm, pdf_editor::PdfEditor,
    process_button::ProcessButton, progress_bar::ProgressBar, upload_area::UploadArea,
};
use crate::state::ToolState;
use leptos::prelude::*;
use pdf_master_common::ToolKind;
use web_sys::MouseEvent;

#[component]
pub fn ToolModal(state: ToolState) -> impl IntoView {
    let on_backdrop = move |ev: MouseEvent| {
        if ev.target() == ev.current_target() {
            state.close();
        }
    };
    let title = move || state.definition().map(|d| d.title).unwrap_or_default();
    let is_editor = move || state.kind() == Some(ToolKind::EditPdf);

    view! {
        <Show when=move || state.session.with(|s| s.is_active())>
            <div class="modal" on:click=on_backdrop>
                <div class="modal-content">
                    <div class="modal-header">
                        <h2>{title}</h2>
                        <span class="close" on:click=move |_| state.close()>"✕"</span>
                    </div>
                    <div class="modal-body">
                        <UploadArea state=state />
                        <FileList state=state />
                        <Show
                            when=is_editor
                            fallback=move || view! {
                                <OptionsForm state=state />
                                <Show when=move || state.phase.with(|p| p.show_progress())>
                                    <ProgressBar state=state />
                                </Show>
                                <p class="form-error">{move || state.notice.get()}</p>
                                <ProcessButton state=state />
                            }
                        >
                            <PdfEditor state=state />
                        </Show>
                    </div>
                </div>
            </div>
        </Show>
    }
}
