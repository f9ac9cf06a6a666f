//! アップロードエリアコンポーネント

use crate::state::ToolState;
use leptos::html::Input;
use leptos::prelude::*;
use web_sys::{DragEvent, Event, HtmlInputElement};

#[component]
pub fn UploadArea(state: ToolState) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<Input> = NodeRef::new();

    let accept = move || {
        state
            .definition()
            .map(|d| d.accept.html_accept())
            .unwrap_or_default()
    };
    let accept_hint = move || {
        state
            .definition()
            .map(|d| d.accept.html_accept())
            .filter(|a| a != "*")
            .map(|a| format!("Accepted: {}", a))
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            state.add_file_list(&files);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    // ファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            state.add_file_list(&files);
        }
        // 同じファイルを選び直せるように空にする
        input.set_value("");
    };

    view! {
        <div
            class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <div class="upload-icon">"☁️"</div>
            <p>"Drag & drop files here or " <span class="browse-link">"browse"</span></p>
            <p class="text-muted">{accept_hint}</p>
        </div>
        <input
            type="file"
            multiple
            style="display: none"
            accept=accept
            node_ref=input_ref
            on:change=on_change
        />
    }
}
