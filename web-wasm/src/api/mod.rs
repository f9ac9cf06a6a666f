//! 外部との境界（バックエンド fetch / pdf.js ブリッジ）

pub mod backend;
pub mod pdf_bridge;

use wasm_bindgen::{JsCast, JsValue};

/// JS例外をメッセージ文字列にする
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
