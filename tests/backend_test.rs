//! バックエンド連携テスト
//!
//! axum で立てた疑似サーバーに対して、送信内容とエラー処理を検証

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use pdf_master::client::BackendClient;
use pdf_master::collector;
use pdf_master::error::PdfMasterError;
use pdf_master::pipeline::run_tool;
use pdf_master_common::{OptionValues, SubmitError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/// 疑似サーバーが受け取ったリクエスト
#[derive(Debug, Clone, Default)]
struct Captured {
    path: String,
    files: Vec<(String, Vec<u8>)>,
    fields: Vec<(String, String)>,
}

impl Captured {
    fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Requests = Arc<Mutex<Vec<Captured>>>;

async fn handle(State(requests): State<Requests>, uri: Uri, mut multipart: Multipart) -> Response {
    let mut captured = Captured {
        path: uri.path().to_string(),
        ..Default::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field.bytes().await.unwrap();
                assert_eq!(name, "files");
                captured.files.push((file_name, data.to_vec()));
            }
            None => {
                let value = field.text().await.unwrap();
                captured.fields.push((name, value));
            }
        }
    }
    requests.lock().unwrap().push(captured.clone());

    match captured.path.as_str() {
        "/compress-pdf" => (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>").into_response(),
        "/unlock-pdf" => (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"error":"Incorrect password"}"#,
        )
            .into_response(),
        "/remove-pages" => StatusCode::OK.into_response(),
        "/get-pdf-text" => (
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"pages":[{"page":0,"texts":[
                {"text":"Invoice","x":72.0,"y":90.5,"font":"Helvetica","size":14.0,"color":0},
                {"text":"  ","x":10.0,"y":10.0,"font":"Helvetica","size":9.0,"color":0}
            ]},{"page":1,"texts":[
                {"text":"Total: 100","x":72.0,"y":700.0,"font":"Helvetica","size":11.0,"color":0}
            ]}]}"#,
        )
            .into_response(),
        _ => (
            [(header::CONTENT_TYPE, "application/pdf")],
            b"%PDF-1.4 result".to_vec(),
        )
            .into_response(),
    }
}

async fn start_server() -> (String, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(handle).with_state(requests.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), requests)
}

fn write_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("%PDF-1.4 {}", name)).unwrap();
    path
}

fn values(pairs: &[(&str, &str)]) -> OptionValues {
    let mut values = OptionValues::new();
    for (k, v) in pairs {
        values.set(*k, *v);
    }
    values
}

#[tokio::test]
async fn test_watermark_defaults_are_sent() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "report.pdf");
    let out = dir.path().join("out");

    let outcome = run_tool(&client, "add-watermark", &[input], &OptionValues::new(), &out, false)
        .await
        .unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/add-watermark");
    assert_eq!(request.files.len(), 1);
    assert_eq!(request.files[0].0, "report.pdf");
    assert_eq!(request.files[0].1, b"%PDF-1.4 report.pdf");
    assert_eq!(request.field("watermarkText"), Some("WATERMARK"));
    assert_eq!(request.field("opacity"), Some("0.5"));

    let name = outcome.output.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("watermarked_pdf_"), "{}", name);
    assert!(name.ends_with(".pdf"));
    assert!(!name.contains(':'));
    assert_eq!(std::fs::read(&outcome.output).unwrap(), b"%PDF-1.4 result");
}

#[tokio::test]
async fn test_merge_skips_duplicates_and_keeps_order() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf");
    let b = write_pdf(dir.path(), "b.pdf");

    let outcome = run_tool(
        &client,
        "merge",
        &[b.clone(), a, b],
        &OptionValues::new(),
        dir.path(),
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.files_sent, 2);
    assert_eq!(outcome.duplicates_skipped, 1);

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].path, "/merge-pdf");
    let names: Vec<_> = requests[0].files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    assert_eq!(requests[0].field("mergeOrder"), Some("name"));
}

#[tokio::test]
async fn test_non_json_error_uses_status_line() {
    let (url, _) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "big.pdf");

    let err = run_tool(&client, "compress", &[input], &OptionValues::new(), dir.path(), false)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Server error: 500 Internal Server Error");
}

#[tokio::test]
async fn test_json_error_message_is_shown() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "locked.pdf");

    let err = run_tool(
        &client,
        "unlock-pdf",
        &[input],
        &values(&[("password", "wrong")]),
        dir.path(),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PdfMasterError::Submit(SubmitError::Server(ref m)) if m == "Incorrect password"));
    assert_eq!(requests.lock().unwrap()[0].field("password"), Some("wrong"));
}

#[tokio::test]
async fn test_empty_success_body_is_failure() {
    let (url, _) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "doc.pdf");
    let out = dir.path().join("out");

    let err = run_tool(
        &client,
        "remove-pages",
        &[input],
        &values(&[("pagesToRemove", "2")]),
        &out,
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Empty response received");
    assert!(!out.exists());
}

#[tokio::test]
async fn test_unknown_tool_makes_no_request() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "doc.pdf");

    let err = run_tool(&client, "rotate-pdf", &[input], &OptionValues::new(), dir.path(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMasterError::Submit(SubmitError::Unconfigured)));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_pdf_run_without_edits_makes_no_request() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "doc.pdf");
    let out = dir.path().join("out");

    let err = run_tool(&client, "edit-pdf", &[input], &OptionValues::new(), &out, false)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMasterError::Submit(SubmitError::NoEdits)));
    assert!(requests.lock().unwrap().is_empty());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_password_mismatch_makes_no_request() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "doc.pdf");

    let err = run_tool(
        &client,
        "protect-pdf",
        &[input.clone()],
        &values(&[("password", "secret"), ("confirmPassword", "secrte")]),
        dir.path(),
        false,
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");

    let err = run_tool(&client, "protect-pdf", &[input], &OptionValues::new(), dir.path(), false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please enter a password");

    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_protect_sends_password_only() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "doc.pdf");

    run_tool(
        &client,
        "protect-pdf",
        &[input],
        &values(&[("password", "secret"), ("confirmPassword", "secret")]),
        dir.path(),
        false,
    )
    .await
    .unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].field("password"), Some("secret"));
    assert_eq!(requests[0].field("confirmPassword"), None);
}

#[tokio::test]
async fn test_extract_text_and_apply_edits() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();
    let input = write_pdf(dir.path(), "invoice.pdf");
    let local = collector::local_file(&input).unwrap();

    let text = client.extract_text(&local).await.unwrap();
    let spans: Vec<_> = text.spans().collect();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].0, 0);
    assert_eq!(spans[0].1.text, "Invoice");
    assert_eq!(spans[1].0, 1);

    let mut editor = pdf_master_common::EditorSession::new();
    let generation = editor.begin_load();
    editor.finish_load(generation, text.pages.len()).unwrap();
    let request = pdf_master_common::EditRequest::from_span(spans[0].0, 0, spans[0].1);
    editor.commit_edit(request, Some("Receipt".to_string())).unwrap();

    let fields = editor.form_fields().unwrap();
    let body = client.apply_edits(&local, &fields).await.unwrap();
    assert_eq!(body, b"%PDF-1.4 result");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let edit = &requests[1];
    assert_eq!(edit.path, "/edit-pdf");
    assert_eq!(edit.files.len(), 1);
    assert_eq!(edit.field("editMode"), Some("text"));
    assert_eq!(edit.field("edit_0_page"), Some("0"));
    assert_eq!(edit.field("edit_0_old_text"), Some("Invoice"));
    assert_eq!(edit.field("edit_0_new_text"), Some("Receipt"));
    assert_eq!(edit.field("edit_0_x"), Some("72"));
    assert_eq!(edit.field("edit_0_y"), Some("90.5"));
}

#[tokio::test]
async fn test_missing_input_file() {
    let (url, requests) = start_server().await;
    let client = BackendClient::new(&url).unwrap();
    let dir = tempdir().unwrap();

    let err = run_tool(
        &client,
        "merge",
        &[dir.path().join("missing.pdf")],
        &OptionValues::new(),
        dir.path(),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PdfMasterError::FileNotFound(_)));
    assert!(requests.lock().unwrap().is_empty());
}
