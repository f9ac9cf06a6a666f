//! プログレスバーコンポーネント

use crate::state::ToolState;
use leptos::prelude::*;

#[component]
pub fn ProgressBar(state: ToolState) -> impl IntoView {
    let text = move || {
        state
            .phase
            .with(|p| p.status_text())
            .unwrap_or_else(|| state.progress.with(|p| p.label()))
    };
    let failed = move || state.phase.with(|p| matches!(p, pdf_master_common::SubmitPhase::Failed { .. }));

    view! {
        <div class="progress-container">
            <div class="progress-bar">
                <div
                    class="progress-fill"
                    style=move || format!("width: {}%", state.progress.with(|p| p.percent()))
                />
            </div>
            <p class=move || if failed() { "progress-text error" } else { "progress-text" }>
                {text}
            </p>
        </div>
    }
}
