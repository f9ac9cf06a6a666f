//! メインアプリケーションコンポーネント

use crate::components::{header::Header, tool_grid::ToolGrid, tool_modal::ToolModal};
use crate::state::ToolState;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let state = ToolState::new();

    view! {
        <div class="container">
            <Header />
            <ToolGrid state=state />
            <ToolModal state=state />
        </div>
    }
}
