//! バックエンドへのマルチパート送信
//!
//! ファイルは `files` に選択順で、続けてツール固有の項目を追加する。
//! エンドポイントは同一オリジンの相対パス。

use super::js_error_message;
use pdf_master_common::{interpret_response, SubmitError, FILES_FIELD};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

pub async fn post_form(
    endpoint: &str,
    files: &[File],
    fields: &[(String, String)],
) -> Result<Vec<u8>, SubmitError> {
    let form = build_form(files, fields).map_err(transport)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(endpoint, &opts).map_err(transport)?;

    let window = web_sys::window()
        .ok_or_else(|| SubmitError::Transport("window is not available".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let resp: Response = resp_value.dyn_into().map_err(transport)?;

    let buffer = JsFuture::from(resp.array_buffer().map_err(transport)?)
        .await
        .map_err(transport)?;
    let body = js_sys::Uint8Array::new(&buffer).to_vec();

    interpret_response(resp.status(), &resp.status_text(), body)
}

fn build_form(files: &[File], fields: &[(String, String)]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for file in files {
        form.append_with_blob_and_filename(FILES_FIELD, file, &file.name())?;
    }
    for (key, value) in fields {
        form.append_with_str(key, value)?;
    }
    Ok(form)
}

fn transport(e: JsValue) -> SubmitError {
    SubmitError::Transport(js_error_message(&e))
}
