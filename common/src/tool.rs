//! ツールカタログ
//!
//! ツール1種類につき1レコード（表示名・受付拡張子・オプション定義・
//! エンドポイント・出力ファイル名）を保持する。
//! エンドポイントとファイル名の解決はすべてこのレコードから行う。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// アップロードファイルのフォーム項目名（ファイル数分繰り返す）
pub const FILES_FIELD: &str = "files";

/// サーバー側テキスト抽出エンドポイント
pub const TEXT_EXTRACT_ENDPOINT: &str = "/get-pdf-text";

/// 未登録ツール用の出力ファイル名プレフィックス
const FALLBACK_PREFIX: &str = "processed";
const FALLBACK_EXTENSION: &str = "pdf";

/// ツール種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Merge,
    Compress,
    JpgToPdf,
    PdfToJpg,
    PdfToPpt,
    PdfToWord,
    PdfToExcel,
    ExcelToPdf,
    AddPageNumbers,
    AddWatermark,
    CropPdf,
    RemovePages,
    UnlockPdf,
    ProtectPdf,
    SignPdf,
    EditPdf,
}

impl ToolKind {
    /// カード表示順
    pub const ALL: [ToolKind; 16] = [
        ToolKind::Merge,
        ToolKind::Compress,
        ToolKind::JpgToPdf,
        ToolKind::PdfToJpg,
        ToolKind::PdfToPpt,
        ToolKind::PdfToWord,
        ToolKind::PdfToExcel,
        ToolKind::ExcelToPdf,
        ToolKind::AddPageNumbers,
        ToolKind::AddWatermark,
        ToolKind::CropPdf,
        ToolKind::RemovePages,
        ToolKind::UnlockPdf,
        ToolKind::ProtectPdf,
        ToolKind::SignPdf,
        ToolKind::EditPdf,
    ];

    pub fn definition(self) -> &'static ToolDefinition {
        match self {
            ToolKind::Merge => &MERGE,
            ToolKind::Compress => &COMPRESS,
            ToolKind::JpgToPdf => &JPG_TO_PDF,
            ToolKind::PdfToJpg => &PDF_TO_JPG,
            ToolKind::PdfToPpt => &PDF_TO_PPT,
            ToolKind::PdfToWord => &PDF_TO_WORD,
            ToolKind::PdfToExcel => &PDF_TO_EXCEL,
            ToolKind::ExcelToPdf => &EXCEL_TO_PDF,
            ToolKind::AddPageNumbers => &ADD_PAGE_NUMBERS,
            ToolKind::AddWatermark => &ADD_WATERMARK,
            ToolKind::CropPdf => &CROP_PDF,
            ToolKind::RemovePages => &REMOVE_PAGES,
            ToolKind::UnlockPdf => &UNLOCK_PDF,
            ToolKind::ProtectPdf => &PROTECT_PDF,
            ToolKind::SignPdf => &SIGN_PDF,
            ToolKind::EditPdf => &EDIT_PDF,
        }
    }

    pub fn key(self) -> &'static str {
        self.definition().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| {
            format!(
                "Unknown tool: {}. Use `pdf-master tools` to list available tools",
                s
            )
        })
    }
}

/// セッションが保持するツール識別子
///
/// カードの設定ミスで未登録キーが渡されてもUIは落とさず、
/// 汎用定義で表示だけ行う（エンドポイントは解決できない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolId {
    Known(ToolKind),
    Unknown(String),
}

impl ToolId {
    pub fn parse(key: &str) -> Self {
        match ToolKind::from_key(key) {
            Some(kind) => ToolId::Known(kind),
            None => ToolId::Unknown(key.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ToolId::Known(kind) => kind.key(),
            ToolId::Unknown(key) => key.as_str(),
        }
    }

    pub fn kind(&self) -> Option<ToolKind> {
        match self {
            ToolId::Known(kind) => Some(*kind),
            ToolId::Unknown(_) => None,
        }
    }

    pub fn definition(&self) -> &'static ToolDefinition {
        match self {
            ToolId::Known(kind) => kind.definition(),
            ToolId::Unknown(_) => &FALLBACK,
        }
    }
}

impl From<ToolKind> for ToolId {
    fn from(kind: ToolKind) -> Self {
        ToolId::Known(kind)
    }
}

/// ファイル選択の受付フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptFilter {
    Any,
    Extensions(&'static [&'static str]),
}

impl AcceptFilter {
    /// `<input accept=...>` 用の文字列（".pdf,.jpg" / "*"）
    pub fn html_accept(&self) -> String {
        match self {
            AcceptFilter::Any => "*".to_string(),
            AcceptFilter::Extensions(exts) => exts
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// 拡張子で受付可否を判定（大文字小文字は区別しない）
    pub fn accepts(&self, file_name: &str) -> bool {
        match self {
            AcceptFilter::Any => true,
            AcceptFilter::Extensions(exts) => match file_name.rsplit_once('.') {
                Some((_, ext)) => exts.iter().any(|e| e.eq_ignore_ascii_case(ext)),
                None => false,
            },
        }
    }
}

/// セレクトボックスの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// オプション入力の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text { placeholder: &'static str },
    Password { placeholder: &'static str },
    Number { min: Option<i32> },
    Select(&'static [SelectOption]),
    /// スライダー（フォームは百分率、送信値は 0-1 の比率）
    Percent { min: u8, max: u8 },
}

/// オプション項目定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionField {
    /// フォーム項目名（送信対象なら送信時の項目名を兼ねる）
    pub key: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    /// 未入力・空欄時に使うリテラル既定値（フォーム上の値）
    pub default: &'static str,
    /// false の項目はクライアント側検証専用で送信しない
    pub submitted: bool,
}

impl OptionField {
    const fn new(key: &'static str, label: &'static str, kind: InputKind, default: &'static str) -> Self {
        Self {
            key,
            label,
            kind,
            default,
            submitted: true,
        }
    }

    const fn form_only(mut self) -> Self {
        self.submitted = false;
        self
    }

    /// フォーム値を送信値に変換する
    ///
    /// 空文字は既定値に置き換える（空白のみの値はそのまま送る）。百分率項目は 100 で割った比率を返す。
    pub fn wire_value(&self, raw: Option<&str>) -> String {
        let value = raw
            .filter(|v| !v.is_empty())
            .unwrap_or(self.default);

        match self.kind {
            InputKind::Percent { .. } => {
                let percent = value
                    .trim()
                    .parse::<f64>()
                    .or_else(|_| self.default.parse::<f64>())
                    .unwrap_or(0.0);
                (percent / 100.0).to_string()
            }
            _ => value.to_string(),
        }
    }
}

/// 出力ファイル仕様
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub prefix: &'static str,
    pub extension: &'static str,
    pub mime: &'static str,
}

/// ツール定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub accept: AcceptFilter,
    pub options: &'static [OptionField],
    pub endpoint: Option<&'static str>,
    pub output: Option<OutputSpec>,
}

impl ToolDefinition {
    pub fn option(&self, key: &str) -> Option<&'static OptionField> {
        self.options.iter().find(|field| field.key == key)
    }

    pub fn output_mime(&self) -> &'static str {
        self.output.map(|o| o.mime).unwrap_or(PDF_MIME)
    }
}

/// ツールキーから定義を取得（未登録キーは汎用定義）
pub fn lookup(key: &str) -> &'static ToolDefinition {
    ToolKind::from_key(key)
        .map(ToolKind::definition)
        .unwrap_or(&FALLBACK)
}

/// ツールキーからエンドポイントを解決（未登録キーは None）
pub fn resolve_endpoint(key: &str) -> Option<&'static str> {
    lookup(key).endpoint
}

/// ダウンロードファイル名を生成
///
/// `timestamp` は ISO-8601 文字列（例: "2026-01-18T09:30:15.123Z"）。
/// 秒までに切り詰め、コロンをハイフンに置換する。
pub fn download_filename(key: &str, timestamp: &str) -> String {
    let stamp = file_timestamp(timestamp);
    match lookup(key).output {
        Some(out) => format!("{}_{}.{}", out.prefix, stamp, out.extension),
        None => format!("{}_{}.{}", FALLBACK_PREFIX, stamp, FALLBACK_EXTENSION),
    }
}

fn file_timestamp(timestamp: &str) -> String {
    timestamp.chars().take(19).collect::<String>().replace(':', "-")
}

// ============================================
// カタログ定義
// ============================================

const PDF_MIME: &str = "application/pdf";

const PDF_ONLY: AcceptFilter = AcceptFilter::Extensions(&["pdf"]);
const IMAGES: AcceptFilter = AcceptFilter::Extensions(&["jpg", "jpeg", "png", "gif", "bmp"]);
const SPREADSHEETS: AcceptFilter = AcceptFilter::Extensions(&["xlsx", "xls"]);

const CORNERS: &[SelectOption] = &[
    SelectOption { value: "bottom-right", label: "Bottom Right" },
    SelectOption { value: "bottom-left", label: "Bottom Left" },
    SelectOption { value: "top-right", label: "Top Right" },
    SelectOption { value: "top-left", label: "Top Left" },
];

const QUALITY_LEVELS: &[SelectOption] = &[
    SelectOption { value: "low", label: "Low" },
    SelectOption { value: "medium", label: "Medium" },
    SelectOption { value: "high", label: "High" },
];

const fn pdf_output(prefix: &'static str) -> Option<OutputSpec> {
    Some(OutputSpec {
        prefix,
        extension: "pdf",
        mime: PDF_MIME,
    })
}

static FALLBACK: ToolDefinition = ToolDefinition {
    key: "",
    title: "",
    description: "",
    icon: "📄",
    accept: AcceptFilter::Any,
    options: &[],
    endpoint: None,
    output: None,
};

static MERGE: ToolDefinition = ToolDefinition {
    key: "merge",
    title: "Merge PDF Files",
    description: "Combine multiple PDFs into one document",
    icon: "🗂️",
    accept: PDF_ONLY,
    options: &[OptionField::new(
        "mergeOrder",
        "Merge Order",
        InputKind::Select(&[
            SelectOption { value: "name", label: "By Name" },
            SelectOption { value: "date", label: "By Date" },
            SelectOption { value: "custom", label: "Custom Order" },
        ]),
        "name",
    )],
    endpoint: Some("/merge-pdf"),
    output: pdf_output("merged_pdf"),
};

static COMPRESS: ToolDefinition = ToolDefinition {
    key: "compress",
    title: "Compress PDF",
    description: "Reduce file size while keeping quality",
    icon: "🗜️",
    accept: PDF_ONLY,
    options: &[OptionField::new(
        "compressionLevel",
        "Compression Level",
        InputKind::Select(QUALITY_LEVELS),
        "medium",
    )],
    endpoint: Some("/compress-pdf"),
    output: pdf_output("compressed_pdf"),
};

static JPG_TO_PDF: ToolDefinition = ToolDefinition {
    key: "jpg-to-pdf",
    title: "Convert JPG to PDF",
    description: "Turn images into a PDF document",
    icon: "🖼️",
    accept: IMAGES,
    options: &[
        OptionField::new(
            "pageSize",
            "Page Size",
            InputKind::Select(&[
                SelectOption { value: "A4", label: "A4" },
                SelectOption { value: "Letter", label: "Letter" },
            ]),
            "A4",
        ),
        OptionField::new(
            "orientation",
            "Orientation",
            InputKind::Select(&[
                SelectOption { value: "portrait", label: "Portrait" },
                SelectOption { value: "landscape", label: "Landscape" },
            ]),
            "portrait",
        ),
    ],
    endpoint: Some("/jpg-to-pdf"),
    output: pdf_output("images_to_pdf"),
};

static PDF_TO_JPG: ToolDefinition = ToolDefinition {
    key: "pdf-to-jpg",
    title: "Convert PDF to JPG",
    description: "Export pages as JPG images",
    icon: "📷",
    accept: PDF_ONLY,
    options: &[
        OptionField::new(
            "imageQuality",
            "Image Quality",
            InputKind::Select(QUALITY_LEVELS),
            "medium",
        ),
        OptionField::new(
            "pagesToConvert",
            "Pages",
            InputKind::Text { placeholder: "all or 1,3,5-7" },
            "all",
        ),
    ],
    endpoint: Some("/pdf-to-jpg"),
    output: Some(OutputSpec {
        prefix: "pdf_to_jpg",
        extension: "zip",
        mime: "application/zip",
    }),
};

static PDF_TO_PPT: ToolDefinition = ToolDefinition {
    key: "pdf-to-ppt",
    title: "Convert PDF to PowerPoint",
    description: "Turn each page into a slide",
    icon: "📊",
    accept: PDF_ONLY,
    options: &[],
    endpoint: Some("/pdf-to-ppt"),
    output: Some(OutputSpec {
        prefix: "pdf_to_ppt",
        extension: "pptx",
        mime: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    }),
};

static PDF_TO_WORD: ToolDefinition = ToolDefinition {
    key: "pdf-to-word",
    title: "Convert PDF to Word",
    description: "Extract text into an editable document",
    icon: "📝",
    accept: PDF_ONLY,
    options: &[],
    endpoint: Some("/pdf-to-word"),
    output: Some(OutputSpec {
        prefix: "pdf_to_word",
        extension: "docx",
        mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    }),
};

static PDF_TO_EXCEL: ToolDefinition = ToolDefinition {
    key: "pdf-to-excel",
    title: "Convert PDF to Excel",
    description: "Pull tables into a spreadsheet",
    icon: "📈",
    accept: PDF_ONLY,
    options: &[],
    endpoint: Some("/pdf-to-excel"),
    output: Some(OutputSpec {
        prefix: "pdf_to_excel",
        extension: "xlsx",
        mime: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    }),
};

static EXCEL_TO_PDF: ToolDefinition = ToolDefinition {
    key: "excel-to-pdf",
    title: "Convert Excel to PDF",
    description: "Render spreadsheets as PDF tables",
    icon: "📑",
    accept: SPREADSHEETS,
    options: &[],
    endpoint: Some("/excel-to-pdf"),
    output: pdf_output("excel_to_pdf"),
};

static ADD_PAGE_NUMBERS: ToolDefinition = ToolDefinition {
    key: "add-page-numbers",
    title: "Add Page Numbers",
    description: "Number every page",
    icon: "🔢",
    accept: PDF_ONLY,
    options: &[
        OptionField::new("position", "Position", InputKind::Select(CORNERS), "bottom-right"),
        OptionField::new(
            "startPage",
            "Starting Number",
            InputKind::Number { min: Some(1) },
            "1",
        ),
    ],
    endpoint: Some("/add-page-numbers"),
    output: pdf_output("numbered_pdf"),
};

static ADD_WATERMARK: ToolDefinition = ToolDefinition {
    key: "add-watermark",
    title: "Add Watermark",
    description: "Stamp text over every page",
    icon: "💧",
    accept: PDF_ONLY,
    options: &[
        OptionField::new(
            "watermarkText",
            "Watermark Text",
            InputKind::Text { placeholder: "Enter watermark text" },
            "WATERMARK",
        ),
        OptionField::new(
            "opacity",
            "Opacity",
            InputKind::Percent { min: 10, max: 100 },
            "50",
        ),
    ],
    endpoint: Some("/add-watermark"),
    output: pdf_output("watermarked_pdf"),
};

static CROP_PDF: ToolDefinition = ToolDefinition {
    key: "crop-pdf",
    title: "Crop PDF Pages",
    description: "Trim page margins (in points)",
    icon: "✂️",
    accept: PDF_ONLY,
    options: &[
        OptionField::new("top", "Top", InputKind::Number { min: None }, "0"),
        OptionField::new("bottom", "Bottom", InputKind::Number { min: None }, "0"),
        OptionField::new("left", "Left", InputKind::Number { min: None }, "0"),
        OptionField::new("right", "Right", InputKind::Number { min: None }, "0"),
    ],
    endpoint: Some("/crop-pdf"),
    output: pdf_output("cropped_pdf"),
};

static REMOVE_PAGES: ToolDefinition = ToolDefinition {
    key: "remove-pages",
    title: "Remove Pages",
    description: "Delete selected pages",
    icon: "🗑️",
    accept: PDF_ONLY,
    options: &[OptionField::new(
        "pagesToRemove",
        "Pages to Remove",
        InputKind::Text { placeholder: "e.g. 1,3,5-7" },
        "",
    )],
    endpoint: Some("/remove-pages"),
    output: pdf_output("pages_removed_pdf"),
};

static UNLOCK_PDF: ToolDefinition = ToolDefinition {
    key: "unlock-pdf",
    title: "Unlock PDF",
    description: "Remove password protection",
    icon: "🔓",
    accept: PDF_ONLY,
    options: &[OptionField::new(
        "password",
        "PDF Password",
        InputKind::Password { placeholder: "Enter PDF password" },
        "",
    )],
    endpoint: Some("/unlock-pdf"),
    output: pdf_output("unlocked_pdf"),
};

static PROTECT_PDF: ToolDefinition = ToolDefinition {
    key: "protect-pdf",
    title: "Protect PDF",
    description: "Encrypt with a password",
    icon: "🔒",
    accept: PDF_ONLY,
    options: &[
        OptionField::new(
            "password",
            "New Password",
            InputKind::Password { placeholder: "Enter new password" },
            "",
        ),
        OptionField::new(
            "confirmPassword",
            "Confirm Password",
            InputKind::Password { placeholder: "Confirm password" },
            "",
        )
        .form_only(),
    ],
    endpoint: Some("/protect-pdf"),
    output: pdf_output("protected_pdf"),
};

static SIGN_PDF: ToolDefinition = ToolDefinition {
    key: "sign-pdf",
    title: "Sign PDF",
    description: "Add a text signature",
    icon: "✍️",
    accept: PDF_ONLY,
    options: &[
        OptionField::new(
            "signatureText",
            "Signature Text",
            InputKind::Text { placeholder: "Your name or signature" },
            "SIGNED",
        ),
        OptionField::new("position", "Position", InputKind::Select(CORNERS), "bottom-right"),
    ],
    endpoint: Some("/sign-pdf"),
    output: pdf_output("signed_pdf"),
};

static EDIT_PDF: ToolDefinition = ToolDefinition {
    key: "edit-pdf",
    title: "Edit PDF",
    description: "Click text on the page to replace it",
    icon: "🖊️",
    accept: PDF_ONLY,
    options: &[OptionField::new(
        "editMode",
        "Edit Mode",
        InputKind::Select(&[SelectOption { value: "text", label: "Text" }]),
        "text",
    )],
    endpoint: Some("/edit-pdf"),
    output: pdf_output("edited_pdf"),
};
