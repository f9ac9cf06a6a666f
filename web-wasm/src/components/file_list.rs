//! 選択ファイル一覧

use crate::state::ToolState;
use leptos::prelude::*;
use pdf_master_common::format_file_size;

#[component]
pub fn FileList(state: ToolState) -> impl IntoView {
    let entries = move || {
        state.session.with(|s| {
            s.files()
                .iter()
                .map(|f| (f.name.clone(), format_file_size(f.size)))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="file-list">
            {move || {
                entries()
                    .into_iter()
                    .enumerate()
                    .map(|(index, (name, size))| {
                        view! {
                            <div class="file-item">
                                <div class="file-info">
                                    <span class="file-icon">"📄"</span>
                                    <div class="file-details">
                                        <h4>{name}</h4>
                                        <p>{size}</p>
                                    </div>
                                </div>
                                <button class="remove-file" on:click=move |_| state.remove_file(index)>
                                    "✕"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
