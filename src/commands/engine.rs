//! コマンド実行エンジン
//!
//! 解析済みコマンドをバッファ・カーソル操作へ割り付ける。失敗時は
//! メッセージ付きの結果を返すだけで、セッション状態には触れない。
//! 部分的な変更を残したまま失敗することはない。

use super::{Command, SubstituteTarget};
use crate::error::{BufferError, Result};
use crate::file;
use crate::input::Prompter;
use crate::session::Session;
use crate::tools::ToolRunner;

/// コマンド実行の結果
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// 結果メッセージ
    pub message: Option<String>,
    /// セッション状態（バッファ・カーソル・保存名）が変化したか
    pub state_changed: bool,
    /// セッションを終了するか
    pub should_quit: bool,
}

impl CommandResult {
    /// 状態を変更した成功結果を作成
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            state_changed: true,
            should_quit: false,
        }
    }

    /// メッセージ付きの読み取り成功結果を作成
    pub fn success_with_message(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            state_changed: false,
            should_quit: false,
        }
    }

    /// 状態変更なしの成功結果を作成
    pub fn success_unchanged() -> Self {
        Self {
            success: true,
            message: None,
            state_changed: false,
            should_quit: false,
        }
    }

    /// エラー結果を作成
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            state_changed: false,
            should_quit: false,
        }
    }

    /// 終了結果を作成
    pub fn quit() -> Self {
        Self {
            success: true,
            message: None,
            state_changed: false,
            should_quit: true,
        }
    }
}

/// コマンド処理器
///
/// セッションは所有せず、実行のたびに参照で受け取る。保持するのは
/// 外部ツールの起動設定だけ。
pub struct CommandProcessor {
    tools: ToolRunner,
}

impl CommandProcessor {
    /// 環境変数からツール設定を読んで作成
    pub fn new() -> Self {
        Self {
            tools: ToolRunner::from_env(),
        }
    }

    /// ツール設定を指定して作成
    pub fn with_tools(tools: ToolRunner) -> Self {
        Self { tools }
    }

    /// コマンドを実行
    pub fn execute(
        &self,
        command: Command,
        session: &mut Session,
        prompter: &mut dyn Prompter,
    ) -> CommandResult {
        match command {
            Command::List => self.execute_list(session),
            Command::Quit => CommandResult::quit(),
            Command::Save => self.execute_save(session, prompter),
            Command::Read => self.execute_read(session, prompter),
            Command::Assemble => self.execute_assemble(session),
            Command::Emulate => self.execute_emulate(prompter),
            Command::Help => CommandResult::success_with_message(self.help_text()),
            Command::InsertAfter(index) => self.execute_insert_after(session, index),
            Command::Delete(index) => self.execute_delete(session, index),
            Command::DeleteBlock { begin, end } => self.execute_delete_block(session, begin, end),
            Command::Exchange(index) => self.execute_exchange(session, index),
            Command::Copy { source, dest } => self.execute_copy(session, source, dest),
            Command::CopyBlock { begin, end, dest } => {
                self.execute_copy_block(session, begin, end, dest)
            }
            Command::Move { source, dest } => self.execute_move(session, source, dest),
            Command::MoveBlock { begin, end, dest } => {
                self.execute_move_block(session, begin, end, dest)
            }
            Command::Substitute { target, old, new } => {
                self.execute_substitute(session, target, &old, &new)
            }
        }
    }

    /// 次の入力行の挿入先を行 `index` の直後にする
    ///
    /// バッファ長の検証はしない。長さを超える指定は挿入時に末尾へ
    /// 飽和する。
    fn execute_insert_after(&self, session: &mut Session, index: usize) -> CommandResult {
        session.cursor.set_after(index);
        CommandResult::success()
    }

    fn execute_delete(&self, session: &mut Session, index: usize) -> CommandResult {
        match session.buffer.remove_at(index) {
            Ok(_) => CommandResult::success(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    fn execute_delete_block(
        &self,
        session: &mut Session,
        begin: usize,
        end: usize,
    ) -> CommandResult {
        match session.buffer.remove_range(begin, end) {
            Ok(_) => CommandResult::success(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    /// 行を削除し、次の入力行がその位置へ入るようカーソルを置く
    fn execute_exchange(&self, session: &mut Session, index: usize) -> CommandResult {
        match session.buffer.remove_at(index) {
            Ok(_) => {
                session.cursor.set_at(index);
                CommandResult::success()
            }
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    fn execute_copy(&self, session: &mut Session, source: usize, dest: usize) -> CommandResult {
        let line = match session.buffer.get(source) {
            Ok(line) => line.to_string(),
            Err(err) => return CommandResult::error(err.to_string()),
        };
        session.cursor.set_after(dest);
        match session.cursor.add(&mut session.buffer, line) {
            Ok(()) => CommandResult::success(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    /// ブロックを複製して行 `dest` の直後へ挿入する
    ///
    /// 複製は挿入を始める前に取り終えている。挿入先がブロック内でも
    /// 元の内容がそのまま入る。
    fn execute_copy_block(
        &self,
        session: &mut Session,
        begin: usize,
        end: usize,
        dest: usize,
    ) -> CommandResult {
        let block = match session.buffer.get_range(begin, end) {
            Ok(block) => block,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        session.cursor.set_after(dest);
        for line in block {
            if let Err(err) = session.cursor.add(&mut session.buffer, line) {
                return CommandResult::error(err.to_string());
            }
        }
        CommandResult::success()
    }

    /// 行 `source` を行 `dest` の直後へ移動する
    ///
    /// `dest` は削除前の番地で指定される。削除で後続の行が一つ繰り
    /// 上がるため、`source < dest` のときだけ挿入位置を一つ詰める。
    fn execute_move(&self, session: &mut Session, source: usize, dest: usize) -> CommandResult {
        let line = match session.buffer.remove_at(source) {
            Ok(line) => line,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        let position = if source < dest {
            dest
        } else {
            dest.saturating_add(1)
        };
        session.cursor.set_at(position);
        match session.cursor.add(&mut session.buffer, line) {
            Ok(()) => CommandResult::success(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    /// 行 `begin..=end` を行 `dest` の直後へ移動する
    ///
    /// `dest` がブロック内（`begin <= dest < end`）の指定は矛盾して
    /// いるので、削除に入る前に拒否する。`dest == end` はブロックを
    /// 元の位置に戻すだけなので受け付ける。`begin < dest` のときは
    /// ブロック分だけ番地が繰り上がるため挿入位置をその分詰める。
    fn execute_move_block(
        &self,
        session: &mut Session,
        begin: usize,
        end: usize,
        dest: usize,
    ) -> CommandResult {
        if begin <= dest && dest < end {
            let err = BufferError::DestinationInsideBlock { begin, end, dest };
            return CommandResult::error(err.to_string());
        }
        let block = match session.buffer.remove_range(begin, end) {
            Ok(block) => block,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        let position = if begin < dest {
            dest.saturating_add(1) - block.len()
        } else {
            dest.saturating_add(1)
        };
        session.cursor.set_at(position);
        for line in block {
            if let Err(err) = session.cursor.add(&mut session.buffer, line) {
                return CommandResult::error(err.to_string());
            }
        }
        CommandResult::success()
    }

    /// 各行の最初の一致だけを置き換える。カーソルは動かさない。
    fn execute_substitute(
        &self,
        session: &mut Session,
        target: SubstituteTarget,
        old: &str,
        new: &str,
    ) -> CommandResult {
        match target {
            SubstituteTarget::Line(index) => {
                let replaced = match session.buffer.get(index) {
                    Ok(line) => line.replacen(old, new, 1),
                    Err(err) => return CommandResult::error(err.to_string()),
                };
                match session.buffer.set_line(index, replaced) {
                    Ok(()) => CommandResult::success(),
                    Err(err) => CommandResult::error(err.to_string()),
                }
            }
            SubstituteTarget::AllLines => {
                let replaced: Vec<String> = session
                    .buffer
                    .lines()
                    .iter()
                    .map(|line| line.replacen(old, new, 1))
                    .collect();
                session.buffer.replace_all(replaced);
                CommandResult::success()
            }
        }
    }

    fn execute_list(&self, session: &Session) -> CommandResult {
        if session.buffer.is_empty() {
            return CommandResult::success_unchanged();
        }
        let listing: Vec<String> = session
            .buffer
            .all()
            .map(|(index, line)| format!("{:>8} {}", index, line))
            .collect();
        CommandResult::success_with_message(listing.join("\n"))
    }

    fn execute_save(&self, session: &mut Session, prompter: &mut dyn Prompter) -> CommandResult {
        let answer = match ask(prompter, &format!("save as[{}].. ", session.save_name)) {
            Ok(answer) => answer,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        let filename = resolve_filename(session, answer);

        let path = match file::expand_path(&filename) {
            Ok(path) => path,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        match file::save_lines(&path, session.buffer.lines()) {
            Ok(()) => CommandResult::success(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    /// ファイルを読み込む
    ///
    /// 挿入先の回答が空なら全置換でカーソルは据え置き。番地が与えられ
    /// たらその直後から、対話入力と同じくカーソル経由で一行ずつ入る。
    fn execute_read(&self, session: &mut Session, prompter: &mut dyn Prompter) -> CommandResult {
        let filename_answer = match ask(prompter, &format!("read what[{}].. ", session.save_name))
        {
            Ok(answer) => answer,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        let target_answer = match ask(prompter, "after what line.. ") {
            Ok(answer) => answer,
            Err(err) => return CommandResult::error(err.to_string()),
        };

        let filename = resolve_filename(session, filename_answer);
        let target = if target_answer.is_empty() {
            None
        } else {
            match super::parse_address(&target_answer) {
                Ok(index) => Some(index),
                Err(err) => return CommandResult::error(err.to_string()),
            }
        };

        let path = match file::expand_path(&filename) {
            Ok(path) => path,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        let lines = match file::read_lines(&path) {
            Ok(lines) => lines,
            Err(err) => return CommandResult::error(err.to_string()),
        };

        match target {
            None => {
                session.buffer.replace_all(lines);
                CommandResult::success()
            }
            Some(index) => {
                session.cursor.set_after(index);
                for line in lines {
                    if let Err(err) = session.cursor.add(&mut session.buffer, line) {
                        return CommandResult::error(err.to_string());
                    }
                }
                CommandResult::success()
            }
        }
    }

    fn execute_assemble(&self, session: &Session) -> CommandResult {
        match self.tools.assemble(&session.save_name) {
            Ok(()) => CommandResult::success_unchanged(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    fn execute_emulate(&self, prompter: &mut dyn Prompter) -> CommandResult {
        let flag = match ask(prompter, "Enter -debug for debug run ") {
            Ok(answer) => answer,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        match self.tools.emulate(&flag) {
            Ok(()) => CommandResult::success_unchanged(),
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    fn help_text(&self) -> String {
        let lines = [
            "*********************************************".to_string(),
            "LIST - list source file".to_string(),
            "READ - read in source file overlaying what is".to_string(),
            "       there or inserting after certain line".to_string(),
            "SAVE - write out source file".to_string(),
            format!(
                "ASSM - assemble source file with {}",
                self.tools.assembler_command()
            ),
            format!(
                "EMUL - run emulation with {}",
                self.tools.emulator_command()
            ),
            "HELP - display help text".to_string(),
            "QUIT - quit this program".to_string(),
            " ".to_string(),
            "Edit Commands:".to_string(),
            "In1 - insert next line after line n1".to_string(),
            "Dn1 - delete line n1".to_string(),
            "Dn1,n2 - delete lines n1 to n2 (Block Delete)".to_string(),
            "En1 - replace line n1 with next line entered".to_string(),
            "Cn1,n2 - copy line n1 after line n2".to_string(),
            "Cn1,n2,n3 - copy lines n1 to n2 after line n3 (Block Copy)".to_string(),
            "Mn1,n2 - move line n1 after line n2".to_string(),
            "Mn1,n2,n3 - move lines n1 to n2 after line n3 (Block Move)".to_string(),
            "Gn1/aaa/bbb - on line n1 change text aaa to bbb".to_string(),
            "*********************************************".to_string(),
        ];
        lines.join("\n")
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// サブプロンプトで一行問い合わせる。EOF は空回答として扱う。
fn ask(prompter: &mut dyn Prompter, prompt: &str) -> Result<String> {
    Ok(prompter.read_line(prompt)?.unwrap_or_default())
}

/// 空回答なら記憶済みの保存名を使い、非空なら記憶してから使う
fn resolve_filename(session: &mut Session, answer: String) -> String {
    if answer.is_empty() {
        session.save_name.clone()
    } else {
        session.save_name = answer.clone();
        answer
    }
}
