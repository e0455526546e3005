//! 挿入カーソル
//!
//! 次の行がどこへ入るかを示す単一のポインタ。番兵値ではなくタグ付き
//! 変種で表現し、追記モードと位置指定モードを型で区別する。

use super::LineBuffer;
use crate::error::buffer::Result;

/// 挿入位置
///
/// `At(p)` は「次の `add` が位置 `p` に入る」ことを意味する。行 `i` の
/// 直後に挿入したければ `set_after(i)`、バッファ先頭なら `set_at(0)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// 末尾追記モード
    #[default]
    Append,
    /// 次の挿入位置
    At(usize),
}

impl Cursor {
    /// 追記モードに戻す
    pub fn reset(&mut self) {
        *self = Cursor::Append;
    }

    /// 行 `index` の直後を次の挿入位置にする
    ///
    /// 最大番地を指定しても溢れない。末尾への飽和は `add` が行う。
    pub fn set_after(&mut self, index: usize) {
        *self = Cursor::At(index.saturating_add(1));
    }

    /// 位置 `position` を次の挿入位置にする
    pub fn set_at(&mut self, position: usize) {
        *self = Cursor::At(position);
    }

    /// 挿入位置を取得。`None` は追記モード。
    pub fn pending_position(&self) -> Option<usize> {
        match self {
            Cursor::Append => None,
            Cursor::At(position) => Some(*position),
        }
    }

    /// カーソル位置に一行挿入し、位置を一つ進める
    ///
    /// バッファへの挿入はすべてこの一箇所を通る。これでカーソルと
    /// バッファの添字が食い違うことはない。保留位置がバッファ長を
    /// 超えている場合は末尾へ飽和する（短いバッファに対する挿入指定は
    /// 追記に劣化し、エラーにはならない）。
    pub fn add(&mut self, buffer: &mut LineBuffer, line: String) -> Result<()> {
        match *self {
            Cursor::Append => {
                buffer.append(line);
            }
            Cursor::At(pending) => {
                let position = pending.min(buffer.len());
                buffer.insert_at(position, line)?;
                *self = Cursor::At(position + 1);
            }
        }
        Ok(())
    }
}
