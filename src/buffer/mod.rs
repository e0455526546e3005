//! 行バッファ
//!
//! ソース行の順序付き列。ゼロ基点のアドレスで参照され、すべての行データを
//! 単独で所有する。挿入はカーソル経由でのみ行う（`cursor` モジュール参照）。

pub mod cursor;

pub use cursor::Cursor;

use crate::error::buffer::Result;
use crate::error::BufferError;

/// 行の順序付き列
///
/// ソースアドレス（参照・削除・置換の対象）は操作時点で `0..len` に
/// 収まっていなければならない。範囲外はエラーで、バッファは変化しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// 行数を取得
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 指定行への参照を取得
    pub fn get(&self, index: usize) -> Result<&str> {
        self.lines
            .get(index)
            .map(String::as_str)
            .ok_or(BufferError::LineOutOfRange {
                index,
                len: self.lines.len(),
            })
    }

    /// `line` が添字 `index` になるよう挿入する
    ///
    /// `index == len` は末尾追記。`index > len` はエラー。
    pub fn insert_at(&mut self, index: usize, line: String) -> Result<()> {
        if index > self.lines.len() {
            return Err(BufferError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        self.lines.insert(index, line);
        Ok(())
    }

    /// 末尾に追記
    pub fn append(&mut self, line: String) {
        self.lines.push(line);
    }

    /// 指定行を取り除いて返す
    pub fn remove_at(&mut self, index: usize) -> Result<String> {
        if index >= self.lines.len() {
            return Err(BufferError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// `begin..=end` を一括で取り除いて返す
    ///
    /// 検証はすべて削除前に行うため、エラー時に一部だけ消えることはない。
    pub fn remove_range(&mut self, begin: usize, end: usize) -> Result<Vec<String>> {
        if begin > end {
            return Err(BufferError::InvalidRange { begin, end });
        }
        if end >= self.lines.len() {
            return Err(BufferError::RangeOutOfRange {
                begin,
                end,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.drain(begin..=end).collect())
    }

    /// `begin..=end` の複製を取得する
    ///
    /// ブロックコピーはまずここで写しを取ってから挿入する。挿入中の
    /// バッファを読みながら複製すると、挿入済みの行を再度コピーしうる。
    pub fn get_range(&self, begin: usize, end: usize) -> Result<Vec<String>> {
        if begin > end {
            return Err(BufferError::InvalidRange { begin, end });
        }
        if end >= self.lines.len() {
            return Err(BufferError::RangeOutOfRange {
                begin,
                end,
                len: self.lines.len(),
            });
        }
        Ok(self.lines[begin..=end].to_vec())
    }

    /// 指定行の内容を置き換える
    pub fn set_line(&mut self, index: usize, line: String) -> Result<()> {
        if index >= self.lines.len() {
            return Err(BufferError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        self.lines[index] = line;
        Ok(())
    }

    /// 内容全体を入れ替える（ファイル読み込みの置換モード用）
    pub fn replace_all(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// `(添字, 行)` の昇順列挙。純粋な読み取りで、何度でも呼び直せる。
    pub fn all(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index, line.as_str()))
    }

    /// 保存用に全行をスライスで参照
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl From<Vec<String>> for LineBuffer {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}
