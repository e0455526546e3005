//! コマンドシステム
//!
//! 編集コマンドの定義と解析
//!
//! 入力トークンはまずリテラルキーワード（`LIST` など）として照合し、
//! 一致しなければ先頭一文字でアドレスコマンド族（`I`,`D`,`E`,`C`,`M`,`G`）
//! を選ぶ。残りがアドレス引数になる。

pub mod engine;

pub use engine::{CommandProcessor, CommandResult};

use crate::error::command::Result;
use crate::error::CommandError;

/// コマンドの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // リテラルキーワード
    /// 全行を行番号付きで列挙
    List,
    /// セッションを終了
    Quit,
    /// バッファをファイルへ書き出す
    Save,
    /// ファイルを読み込む（全置換または指定行の後へ挿入）
    Read,
    /// アセンブラを起動
    Assemble,
    /// エミュレータを起動
    Emulate,
    /// ヘルプを表示
    Help,

    // アドレスコマンド
    /// `In` : 次の入力行を行 n の直後へ
    InsertAfter(usize),
    /// `Dn` : 行 n を削除
    Delete(usize),
    /// `Db,e` : 行 b..=e を削除
    DeleteBlock { begin: usize, end: usize },
    /// `En` : 行 n を削除し、次の入力行をその位置へ
    Exchange(usize),
    /// `Cs,d` : 行 s の複製を行 d の直後へ
    Copy { source: usize, dest: usize },
    /// `Cb,e,d` : 行 b..=e の複製を行 d の直後へ
    CopyBlock {
        begin: usize,
        end: usize,
        dest: usize,
    },
    /// `Ms,d` : 行 s を行 d の直後へ移動
    Move { source: usize, dest: usize },
    /// `Mb,e,d` : 行 b..=e を行 d の直後へ移動
    MoveBlock {
        begin: usize,
        end: usize,
        dest: usize,
    },
    /// `Gn/old/new` / `G*/old/new` : 部分文字列置換
    Substitute {
        target: SubstituteTarget,
        old: String,
        new: String,
    },
}

/// 置換コマンドの対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteTarget {
    /// 一行のみ
    Line(usize),
    /// 全行
    AllLines,
}

/// コマンドトークンを解析する
///
/// 呼び出し側で大文字化済みであること。失敗時はバッファもカーソルも
/// 変化していない（解析は状態に触れない）。
pub fn parse(token: &str) -> Result<Command> {
    match token {
        "LIST" => Ok(Command::List),
        "QUIT" => Ok(Command::Quit),
        "SAVE" => Ok(Command::Save),
        "READ" => Ok(Command::Read),
        "ASSM" => Ok(Command::Assemble),
        "EMUL" => Ok(Command::Emulate),
        "HELP" => Ok(Command::Help),
        _ => parse_address_command(token),
    }
}

fn parse_address_command(token: &str) -> Result<Command> {
    let family = match token.chars().next() {
        Some(first) => first,
        None => {
            return Err(CommandError::Unknown {
                name: token.to_string(),
            })
        }
    };
    let args = &token[family.len_utf8()..];

    match family {
        'I' => parse_insert(args),
        'D' => parse_delete(args),
        'E' => parse_exchange(args),
        'C' => parse_copy(args),
        'M' => parse_move(args),
        'G' => parse_substitute(args),
        _ => Err(CommandError::Unknown {
            name: token.to_string(),
        }),
    }
}

fn parse_insert(args: &str) -> Result<Command> {
    match split_addresses(args).as_slice() {
        [index] => Ok(Command::InsertAfter(parse_address(index)?)),
        parts => Err(wrong_count('I', "1", parts.len())),
    }
}

fn parse_delete(args: &str) -> Result<Command> {
    match split_addresses(args).as_slice() {
        [index] => Ok(Command::Delete(parse_address(index)?)),
        [begin, end] => Ok(Command::DeleteBlock {
            begin: parse_address(begin)?,
            end: parse_address(end)?,
        }),
        parts => Err(wrong_count('D', "1 or 2", parts.len())),
    }
}

fn parse_exchange(args: &str) -> Result<Command> {
    match split_addresses(args).as_slice() {
        [index] => Ok(Command::Exchange(parse_address(index)?)),
        parts => Err(wrong_count('E', "1", parts.len())),
    }
}

fn parse_copy(args: &str) -> Result<Command> {
    match split_addresses(args).as_slice() {
        [source, dest] => Ok(Command::Copy {
            source: parse_address(source)?,
            dest: parse_address(dest)?,
        }),
        [begin, end, dest] => Ok(Command::CopyBlock {
            begin: parse_address(begin)?,
            end: parse_address(end)?,
            dest: parse_address(dest)?,
        }),
        parts => Err(wrong_count('C', "2 or 3", parts.len())),
    }
}

fn parse_move(args: &str) -> Result<Command> {
    match split_addresses(args).as_slice() {
        [source, dest] => Ok(Command::Move {
            source: parse_address(source)?,
            dest: parse_address(dest)?,
        }),
        [begin, end, dest] => Ok(Command::MoveBlock {
            begin: parse_address(begin)?,
            end: parse_address(end)?,
            dest: parse_address(dest)?,
        }),
        parts => Err(wrong_count('M', "2 or 3", parts.len())),
    }
}

/// `n/old/new` 形式を解析する
///
/// 最初の二つの `/` だけが区切り。三つ目以降の `/` は new の一部になる。
fn parse_substitute(args: &str) -> Result<Command> {
    let parts: Vec<&str> = args.splitn(3, '/').collect();
    let [target, old, new] = parts.as_slice() else {
        return Err(CommandError::MissingDelimiter {
            pattern: args.to_string(),
        });
    };

    let target = if target.trim() == "*" {
        SubstituteTarget::AllLines
    } else {
        SubstituteTarget::Line(parse_address(target)?)
    };

    Ok(Command::Substitute {
        target,
        old: (*old).to_string(),
        new: (*new).to_string(),
    })
}

fn split_addresses(args: &str) -> Vec<&str> {
    args.split(',').collect()
}

/// 一つのアドレスを解析する。前後の空白は無視する。
fn parse_address(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| CommandError::InvalidAddress {
            text: trimmed.to_string(),
        })
}

fn wrong_count(family: char, expected: &'static str, found: usize) -> CommandError {
    CommandError::WrongArgumentCount {
        family,
        expected,
        found,
    }
}
