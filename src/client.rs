//! バックエンドHTTPクライアント
//!
//! すべての送信は `files`（ファイル数分）＋ツール固有項目のマルチパートPOST。
//! レスポンスの解釈は common の `interpret_response` に任せる。

use crate::collector::LocalFile;
use crate::error::Result;
use pdf_master_common::editor::EDIT_ENDPOINT;
use pdf_master_common::tool::TEXT_EXTRACT_ENDPOINT;
use pdf_master_common::{
    interpret_response, PdfTextResponse, PreparedSubmission, SubmitError, FILES_FIELD,
};
use reqwest::multipart::{Form, Part};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// ツール実行
    pub async fn submit(
        &self,
        prepared: &PreparedSubmission<'_, PathBuf>,
    ) -> std::result::Result<Vec<u8>, SubmitError> {
        let form = build_form(prepared.files, &prepared.fields).await?;
        self.post_form(prepared.endpoint, form).await
    }

    /// 画面編集の内容を送信
    pub async fn apply_edits(
        &self,
        file: &LocalFile,
        fields: &[(String, String)],
    ) -> std::result::Result<Vec<u8>, SubmitError> {
        let form = build_form(std::slice::from_ref(file), fields).await?;
        self.post_form(EDIT_ENDPOINT, form).await
    }

    /// サーバー側テキスト抽出
    pub async fn extract_text(&self, file: &LocalFile) -> Result<PdfTextResponse> {
        let form = build_form(std::slice::from_ref(file), &[]).await?;
        let body = self.post_form(TEXT_EXTRACT_ENDPOINT, form).await?;
        Ok(PdfTextResponse::parse(&body)?)
    }

    async fn post_form(
        &self,
        endpoint: &str,
        form: Form,
    ) -> std::result::Result<Vec<u8>, SubmitError> {
        let url = self.url(endpoint);
        info!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        // reqwest は応答の理由句を保持しないので標準の文言で代用する
        interpret_response(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body.to_vec(),
        )
    }
}

async fn build_form(
    files: &[LocalFile],
    fields: &[(String, String)],
) -> std::result::Result<Form, SubmitError> {
    let mut form = Form::new();
    for file in files {
        let data = tokio::fs::read(&file.handle)
            .await
            .map_err(|e| SubmitError::Transport(format!("{}: {}", file.name, e)))?;
        form = form.part(FILES_FIELD, Part::bytes(data).file_name(file.name.clone()));
    }
    for (key, value) in fields {
        form = form.text(key.clone(), value.clone());
    }
    Ok(form)
}

fn transport(e: reqwest::Error) -> SubmitError {
    SubmitError::Transport(e.to_string())
}
