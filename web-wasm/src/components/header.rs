//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"PDF Master"</h1>
            <p class="text-muted">"Every tool you need to work with PDFs in one place"</p>
        </header>
    }
}
