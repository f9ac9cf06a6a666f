//! テキスト位置の型
//!
//! - TextItem: pdf.js の `getTextContent()` が返す項目
//! - TextRegion: 画面上に重ねるクリック領域
//! - PdfTextResponse: サーバー側テキスト抽出（/get-pdf-text）の応答

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// pdf.js のテキスト項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(rename = "str")]
    pub text: String,
    /// [a, b, c, d, e, f]（e, f が文書座標の位置）
    pub transform: [f64; 6],
    #[serde(default)]
    pub width: f64,
}

impl TextItem {
    pub fn x(&self) -> f64 {
        self.transform[4]
    }

    pub fn y(&self) -> f64 {
        self.transform[5]
    }

    pub fn font_size(&self) -> f64 {
        self.transform[2].hypot(self.transform[3])
    }
}

/// ページ描画時のビューポート（ピクセル）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageViewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// テキスト上に重ねるクリック領域
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    /// 元の TextItem 配列での位置
    pub index: usize,
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// 文書座標（編集内容の送信に使う）
    pub doc_x: f64,
    pub doc_y: f64,
}

/// 幅が取れない項目の概算文字幅（フォントサイズ比）
const FALLBACK_CHAR_WIDTH: f64 = 0.5;

/// テキスト項目を画面座標の領域に変換
///
/// PDFは左下原点なので y を反転し、ベースラインから文字高さ分だけ上を上端にする。
/// 空白だけの項目は領域を作らない。
pub fn layout_regions(items: &[TextItem], viewport: &PageViewport) -> Vec<TextRegion> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.text.trim().is_empty())
        .map(|(index, item)| {
            let font_px = item.font_size() * viewport.scale;
            let width = if item.width > 0.0 {
                item.width * viewport.scale
            } else {
                item.text.chars().count() as f64 * font_px * FALLBACK_CHAR_WIDTH
            };
            TextRegion {
                index,
                text: item.text.clone(),
                left: item.x() * viewport.scale,
                top: viewport.height - item.y() * viewport.scale - font_px,
                width,
                height: font_px,
                doc_x: item.x(),
                doc_y: item.y(),
            }
        })
        .collect()
}

/// サーバー抽出のテキスト片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfTextSpan {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfTextPage {
    pub page: usize,
    #[serde(default)]
    pub texts: Vec<PdfTextSpan>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PdfTextResponse {
    #[serde(default)]
    pub pages: Vec<PdfTextPage>,
}

impl PdfTextResponse {
    pub fn parse(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// 空白以外のテキスト片を (ページ, 片) で列挙
    pub fn spans(&self) -> impl Iterator<Item = (usize, &PdfTextSpan)> {
        self.pages.iter().flat_map(|page| {
            page.texts
                .iter()
                .filter(|span| !span.text.trim().is_empty())
                .map(move |span| (page.page, span))
        })
    }
}
