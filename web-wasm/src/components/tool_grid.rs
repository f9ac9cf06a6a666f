//! ツールカード一覧

use crate::state::ToolState;
use leptos::prelude::*;
use pdf_master_common::ToolKind;

#[component]
pub fn ToolGrid(state: ToolState) -> impl IntoView {
    view! {
        <div class="tools-grid">
            {ToolKind::ALL
                .into_iter()
                .map(|kind| {
                    let def = kind.definition();
                    view! {
                        <div class="tool-card" data-tool=def.key on:click=move |_| state.open(kind)>
                            <div class="tool-icon">{def.icon}</div>
                            <h3>{def.title}</h3>
                            <p>{def.description}</p>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
