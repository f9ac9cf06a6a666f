//! PDF Master Web App (Leptos + WASM)

mod api;
mod app;
mod components;
mod download;
mod state;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    gloo::console::log!("PDF Master started");
    leptos::mount::mount_to_body(app::App);
}
