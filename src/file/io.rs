//! ファイルI/O操作
//!
//! バッファとファイルは一行一レコードで1:1に対応する。ヘッダも
//! エスケープもなし。保存は常に終端改行付きで書き出す。

use crate::error::file::Result;
use crate::error::FileError;
use std::fs;
use std::path::{Path, PathBuf};

/// ファイルを行の列として読み込む
///
/// 行終端は取り除く。空ファイルは空の列になる。
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        });
    }

    if path.is_dir() {
        return Err(FileError::InvalidPath {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let lines: Vec<String> = content.lines().map(String::from).collect();
    log::debug!("read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// 行の列をファイルに書き出す
///
/// 全行を改行で連結し、最後にも改行を付ける（空バッファは改行一つに
/// なる）。一時ファイルへ書いてからリネームする。
pub fn save_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, path)?;

    log::debug!("saved {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// 操作者が入力したファイル名を実際のパスに展開する
///
/// `~` と環境変数を展開する。空文字列は無効。
pub fn expand_path(input: &str) -> Result<PathBuf> {
    if input.is_empty() {
        return Err(FileError::InvalidPath {
            path: input.to_string(),
        });
    }

    match shellexpand::full(input) {
        Ok(expanded) => Ok(PathBuf::from(expanded.as_ref())),
        Err(err) => {
            log::warn!("path expansion failed for {}: {}", input, err);
            Err(FileError::InvalidPath {
                path: input.to_string(),
            })
        }
    }
}
