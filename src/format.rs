//! 固定カラム整形
//!
//! トークン化された一文（label / mnemonic / operands）から
//! 固定カラムレイアウトの一行を作る純粋関数群。期待するレイアウトは
//!
//! ```text
//! 1     10       16
//! label mnemonic operands  [optional comment]
//! ```
//!
//! バッファには一切触れない。整形は挿入前に一度だけ適用される。

use unicode_width::UnicodeWidthStr;

/// ラベル欄の幅
pub const LABEL_WIDTH: usize = 9;
/// ニーモニック欄の幅
pub const MNEMONIC_WIDTH: usize = 6;
/// コメント `*` を揃えるオペランド欄の幅
pub const OPERAND_WIDTH: usize = 34;

/// コメントマーカーとみなす `*` の最小文字位置（3文字目以降）
const COMMENT_MARKER_MIN_POS: usize = 2;

/// 分類済みの入力行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// TABを含まない行はコマンド
    Command(String),
    /// `*` 始まりの行はそのまま追加するコメント
    Comment(String),
    /// それ以外は整形対象の一文
    Statement {
        label: String,
        mnemonic: String,
        operands: String,
    },
}

/// 生の入力行を分類する
///
/// 行全体を大文字化してからTABで分割する。フィールドが一つなら
/// コメントかコマンド、二つなら label 無しの一文、三つ以上なら
/// 先頭二つが label と mnemonic で残り（TABごと）が operands。
pub fn classify(raw: &str) -> InputLine {
    let line = raw.to_uppercase();
    let parts: Vec<&str> = line.splitn(3, '\t').collect();

    match parts.as_slice() {
        [single] => {
            if single.starts_with('*') {
                InputLine::Comment(single.to_string())
            } else {
                InputLine::Command(single.to_string())
            }
        }
        [mnemonic, operands] => InputLine::Statement {
            label: String::new(),
            mnemonic: mnemonic.to_string(),
            operands: operands.to_string(),
        },
        [label, mnemonic, operands] => InputLine::Statement {
            label: label.to_string(),
            mnemonic: mnemonic.to_string(),
            operands: operands.to_string(),
        },
        // splitn(3, ..) は最低1、最大3要素を返す
        _ => InputLine::Command(line),
    }
}

/// 一文を固定カラムの一行に整形する
pub fn format_statement(label: &str, mnemonic: &str, operands: &str) -> String {
    let operands = align_comment(operands);

    let mut line = pad_to_width(label, LABEL_WIDTH);
    line.push_str(&pad_to_width(mnemonic, MNEMONIC_WIDTH));
    line.push_str(&operands);
    line
}

/// operands 内のコメントを桁揃えする
///
/// 3文字目以降に `*` があればコメント付きとみなし、最後の `*` で分割して
/// オペランド部を34桁に左詰めする。先頭2文字以内の `*` は
/// オペランドの一部（例: `C'*'` の途中）として扱わない。
fn align_comment(operands: &str) -> String {
    let has_marker = operands
        .chars()
        .skip(COMMENT_MARKER_MIN_POS)
        .any(|c| c == '*');
    if !has_marker {
        return operands.to_string();
    }

    // マーカー検出済みなので最後の '*' は必ず存在する
    match operands.rfind('*') {
        Some(split_at) => {
            let (operand, rest) = operands.split_at(split_at);
            let comment = &rest[1..];
            format!("{}*{}", pad_to_width(operand, OPERAND_WIDTH), comment)
        }
        None => operands.to_string(),
    }
}

/// 表示幅で `width` 桁まで空白を詰める。超過分は切り詰めない。
fn pad_to_width(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    if current >= width {
        return text.to_string();
    }
    let mut padded = String::with_capacity(text.len() + (width - current));
    padded.push_str(text);
    for _ in current..width {
        padded.push(' ');
    }
    padded
}
