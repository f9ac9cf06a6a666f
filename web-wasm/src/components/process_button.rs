//! 実行ボタンコンポーネント

use crate::state::ToolState;
use leptos::prelude::*;

#[component]
pub fn ProcessButton(state: ToolState) -> impl IntoView {
    view! {
        <button
            class="btn btn-primary process-btn"
            disabled=move || {
                let has_files = state.has_files();
                !state.phase.with(|p| p.button_enabled(has_files))
            }
            on:click=move |_| state.press_button()
        >
            {move || state.phase.with(|p| p.button_label())}
        </button>
    }
}
