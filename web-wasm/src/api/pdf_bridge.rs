//! pdf.js ブリッジ
//!
//! 文書の保持・描画・テキスト抽出は JavaScript 側（js/pdf-bridge.js）で行う。
//! 読み込める文書は常に1つ。

use super::js_error_message;
use pdf_master_common::{PageViewport, TextItem};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen(module = "/js/pdf-bridge.js")]
extern "C" {
    /// 文書を読み込みページ数を返す
    #[wasm_bindgen(js_name = "loadPdf", catch)]
    async fn load_pdf_js(bytes: &[u8]) -> Result<JsValue, JsValue>;

    /// ページをキャンバスに描画し `{width, height, scale}` を返す
    #[wasm_bindgen(js_name = "renderPage", catch)]
    async fn render_page_js(
        canvas: &HtmlCanvasElement,
        page_index: u32,
        scale: f64,
    ) -> Result<JsValue, JsValue>;

    /// ページのテキスト項目 `[{str, transform, width}]`
    #[wasm_bindgen(js_name = "pageTextItems", catch)]
    async fn page_text_items_js(page_index: u32) -> Result<JsValue, JsValue>;
}

pub async fn load_pdf(bytes: &[u8]) -> Result<usize, String> {
    let value = load_pdf_js(bytes)
        .await
        .map_err(|e| js_error_message(&e))?;
    value
        .as_f64()
        .map(|n| n as usize)
        .ok_or_else(|| "ページ数を取得できません".to_string())
}

pub async fn render_page(
    canvas: &HtmlCanvasElement,
    page_index: usize,
    scale: f64,
) -> Result<PageViewport, String> {
    let value = render_page_js(canvas, page_index as u32, scale)
        .await
        .map_err(|e| js_error_message(&e))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

pub async fn page_text_items(page_index: usize) -> Result<Vec<TextItem>, String> {
    let value = page_text_items_js(page_index as u32)
        .await
        .map_err(|e| js_error_message(&e))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}
