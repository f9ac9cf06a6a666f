//! 入力ファイルの収集
//!
//! コマンドラインのパス指定をセッション用の選択ファイルに変換する。
//! フォルダは直下のみを走査し、ツールの受付拡張子で絞り込む。

use crate::error::{PdfMasterError, Result};
use pdf_master_common::tool::AcceptFilter;
use pdf_master_common::SelectedFile;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub type LocalFile = SelectedFile<PathBuf>;

pub fn collect_files(paths: &[PathBuf], accept: &AcceptFilter) -> Result<Vec<LocalFile>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(PdfMasterError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            files.extend(scan_folder(path, accept)?);
        } else {
            let file = local_file(path)?;
            if !accept.accepts(&file.name) {
                warn!(name = %file.name, accept = %accept.html_accept(), "file type not listed for this tool");
            }
            files.push(file);
        }
    }

    Ok(files)
}

fn scan_folder(folder: &Path, accept: &AcceptFilter) -> Result<Vec<LocalFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = file_name(path);
        if accept.accepts(&name) {
            files.push(local_file(path)?);
        }
    }

    Ok(files)
}

pub fn local_file(path: &Path) -> Result<LocalFile> {
    let size = std::fs::metadata(path)?.len();
    Ok(SelectedFile::new(file_name(path), size, path.to_path_buf()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
