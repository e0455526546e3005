//! メインアプリケーション構造体
//!
//! セッション状態の管理と read-eval ループを実装。一つの入力を
//! 完全に処理してから次を読む。コマンドの失敗はメッセージとして
//! 報告するだけでループは続く。終了するのは QUIT と EOF のみ。

use crate::commands::{self, CommandProcessor};
use crate::debug::{DebugLogger, SessionState};
use crate::error::Result;
use crate::format::{classify, format_statement, InputLine};
use crate::input::{Prompter, StdinPrompter};
use crate::logging::Logger;
use crate::session::Session;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::io::stdout;

/// バナーの罫線
const BANNER_RULE: &str = "-------------------------";

/// メインアプリケーション構造体
///
/// 全てのコンポーネントを統合し、セッションのライフサイクルを管理
pub struct App<P: Prompter = StdinPrompter> {
    /// アプリケーション実行状態
    running: bool,
    /// 編集セッション
    session: Session,
    /// コマンド処理器
    processor: CommandProcessor,
    /// 行入力の供給元
    prompter: P,
    /// ロガー
    logger: Logger,
    /// デバッグトレース（`BALEDT_DEBUG` 設定時のみ）
    trace: Option<DebugLogger>,
}

impl App<StdinPrompter> {
    /// 標準入力で駆動するアプリケーションを作成
    pub fn new() -> Self {
        Self::with_prompter(StdinPrompter::new())
    }
}

impl Default for App<StdinPrompter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Prompter> App<P> {
    /// 入力供給元を指定してアプリケーションを作成
    pub fn with_prompter(prompter: P) -> Self {
        Self {
            running: true,
            session: Session::new(),
            processor: CommandProcessor::new(),
            prompter,
            logger: Logger::from_env(),
            trace: DebugLogger::from_env(),
        }
    }

    /// メインループを実行
    pub fn run(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.print_banner();
        self.run_loop()
    }

    /// アプリケーションが実行中かどうかを確認
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// アプリケーションを終了状態にする
    pub fn shutdown(&mut self) {
        self.running = false;
    }

    /// セッションへの参照（テスト用途）
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn run_loop(&mut self) -> Result<()> {
        crate::log_debug_here!(self.logger, "session loop started");
        if let Some(trace) = &self.trace {
            let message = format!("session trace: {}", trace.log_path().display());
            crate::log_debug_here!(self.logger, message);
        }

        while self.running {
            match self.prompter.read_line("> ")? {
                Some(line) => self.handle_input(&line)?,
                // EOF はそのまま終了
                None => break,
            }
        }

        crate::log_debug_here!(self.logger, "session loop ended");
        Ok(())
    }

    /// 一行ぶんの入力を処理する
    fn handle_input(&mut self, raw: &str) -> Result<()> {
        match classify(raw) {
            InputLine::Comment(line) => self.add_line(line),
            InputLine::Statement {
                label,
                mnemonic,
                operands,
            } => {
                let line = format_statement(&label, &mnemonic, &operands);
                self.add_line(line)
            }
            InputLine::Command(token) => self.dispatch_command(&token),
        }
        Ok(())
    }

    /// 整形済みの行をカーソル位置へ追加する
    fn add_line(&mut self, line: String) {
        match self.session.add_line(line) {
            Ok(()) => self.log_state(),
            Err(err) => {
                println!("{}", err);
                self.logger
                    .log_warning(err.to_string(), Some("add_line"));
            }
        }
    }

    fn dispatch_command(&mut self, token: &str) {
        println!("cmd : {}", token);

        let command = match commands::parse(token) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                self.logger.log_warning(err.to_string(), Some("parse"));
                if let Some(trace) = &self.trace {
                    trace.log_command(token, "parse error");
                }
                return;
            }
        };

        let result = self
            .processor
            .execute(command, &mut self.session, &mut self.prompter);

        if let Some(message) = &result.message {
            println!("{}", message);
        }
        if !result.success {
            self.logger.log_warning(
                result.message.as_deref().unwrap_or("command failed"),
                Some("execute"),
            );
        }
        if let Some(trace) = &self.trace {
            let outcome = if result.success { "ok" } else { "error" };
            trace.log_command(token, outcome);
        }
        if result.state_changed {
            self.log_state();
        }
        if result.should_quit {
            self.shutdown();
        }
    }

    fn log_state(&self) {
        if let Some(trace) = &self.trace {
            trace.log_state(SessionState::capture(&self.session));
        }
    }

    fn clear_screen(&self) -> Result<()> {
        execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn print_banner(&self) {
        println!("{}", BANNER_RULE);
        println!("Welcome to baledt {}", env!("CARGO_PKG_VERSION"));
        println!("type HELP for a help menu");
        println!("{}", BANNER_RULE);
        println!(" ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cursor;
    use crate::input::ScriptedPrompter;

    fn app_with_input(lines: &[&str]) -> App<ScriptedPrompter> {
        App::with_prompter(ScriptedPrompter::new(lines))
    }

    fn contents(app: &App<ScriptedPrompter>) -> Vec<&str> {
        app.session().buffer.all().map(|(_, line)| line).collect()
    }

    #[test]
    fn statements_are_formatted_and_appended() {
        let mut app = app_with_input(&["balr\tr12,0", "loop\tmvi\t0(r5),c'0'"]);
        app.run_loop().unwrap();

        assert_eq!(
            contents(&app),
            vec!["         BALR  R12,0", "LOOP     MVI   0(R5),C'0'"]
        );
        // 入力が尽きたら EOF 扱いで抜ける
        assert!(app.is_running());
    }

    #[test]
    fn comment_lines_are_added_verbatim() {
        let mut app = app_with_input(&["* main loop"]);
        app.run_loop().unwrap();

        assert_eq!(contents(&app), vec!["* MAIN LOOP"]);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = app_with_input(&["quit", "balr\tr12,0"]);
        app.run_loop().unwrap();

        assert!(!app.is_running());
        assert!(contents(&app).is_empty());
    }

    #[test]
    fn command_errors_keep_the_loop_alive() {
        let mut app = app_with_input(&["D99", "xyzzy", "balr\tr12,0"]);
        app.run_loop().unwrap();

        assert_eq!(contents(&app), vec!["         BALR  R12,0"]);
    }

    #[test]
    fn insert_command_redirects_following_lines() {
        let mut app = app_with_input(&["a\tb", "c\td", "I0", "x\ty"]);
        app.run_loop().unwrap();

        assert_eq!(
            contents(&app),
            vec![
                "         A     B",
                "         X     Y",
                "         C     D"
            ]
        );
        assert_eq!(app.session().cursor, Cursor::At(2));
    }
}
