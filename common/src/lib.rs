//! PDF Master Common Library
//!
//! CLIとWeb(WASM)で共有するツールカタログ・セッション・送信パイプライン・
//! 画面編集の状態。通信と描画は持たない。

pub mod editor;
pub mod error;
pub mod format;
pub mod options;
pub mod progress;
pub mod session;
pub mod submission;
pub mod text;
pub mod tool;

pub use editor::{EditError, EditRecord, EditRequest, EditorPhase, EditorSession};
pub use error::{Error, Result};
pub use format::format_file_size;
pub use options::OptionValues;
pub use progress::CosmeticProgress;
pub use session::{SelectedFile, Session};
pub use submission::{
    interpret_response, prepare, ButtonAction, PreparedSubmission, SubmitError, SubmitPhase,
    SubmitTickets,
};
pub use text::{layout_regions, PageViewport, PdfTextResponse, PdfTextSpan, TextItem, TextRegion};
pub use tool::{lookup, resolve_endpoint, ToolDefinition, ToolId, ToolKind, FILES_FIELD};
