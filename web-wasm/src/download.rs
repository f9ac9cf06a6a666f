//! ブラウザダウンロード（Blob → オブジェクトURL → a要素クリック）

use crate::api::js_error_message;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub fn trigger_download(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);

    let props = BlobPropertyBag::new();
    props.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props)
        .map_err(|e| js_error_message(&e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_error_message(&e))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("document is not available")?;
    let body = document.body().ok_or("body is not available")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| js_error_message(&e))?
        .dyn_into()
        .map_err(|_| "failed to create anchor")?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    body.append_child(&anchor).map_err(|e| js_error_message(&e))?;
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).map_err(|e| js_error_message(&e))?;
    Ok(())
}

/// `Date.prototype.toISOString()` の現在時刻
pub fn iso_timestamp() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}
