//! 編集セッション
//!
//! バッファ・カーソル・保存名をまとめた明示的な状態オブジェクト。
//! プロセス全域の可変状態は持たず、必要な箇所へ参照で渡す。

use crate::buffer::{Cursor, LineBuffer};
use crate::error::Result;

/// 単一編集セッションの全状態
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub buffer: LineBuffer,
    pub cursor: Cursor,
    /// SAVE / READ が記憶するファイル名。起動時は空。
    pub save_name: String,
}

impl Session {
    /// 空のセッションを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// カーソル位置に一行追加する
    ///
    /// コマンド以外の入力（整形済みの一文・コメント行）はすべて
    /// ここを通ってバッファに入る。
    pub fn add_line(&mut self, line: String) -> Result<()> {
        self.cursor.add(&mut self.buffer, line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty_and_appending() {
        let session = Session::new();
        assert!(session.buffer.is_empty());
        assert_eq!(session.cursor, Cursor::Append);
        assert_eq!(session.save_name, "");
    }

    #[test]
    fn add_line_follows_cursor() {
        let mut session = Session::new();
        session.add_line("A".to_string()).unwrap();
        session.add_line("C".to_string()).unwrap();

        session.cursor.set_after(0);
        session.add_line("B".to_string()).unwrap();

        let contents: Vec<&str> = session.buffer.all().map(|(_, l)| l).collect();
        assert_eq!(contents, vec!["A", "B", "C"]);
    }
}
