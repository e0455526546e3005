//! 対話入力
//!
//! プロンプト付きの行入力を細い境界に切り出す。エンジンはこの境界越しに
//! 問い合わせるため、端末なしでもスクリプトで駆動できる。

use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// 行入力の供給元
///
/// `None` は入力の終端（EOF）。サブプロンプトでは空回答として扱われ、
/// メインループでは終了の合図になる。
pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// 標準入力から読むプロンプタ
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// 用意した回答を順に返すプロンプタ（スクリプト実行・テスト向け）
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// 発行されたプロンプトの記録
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<S: AsRef<str>>(answers: &[S]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.as_ref().to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_prompter_replays_answers_in_order() {
        let mut prompter = ScriptedPrompter::new(&["first", "second"]);

        assert_eq!(
            prompter.read_line("> ").unwrap(),
            Some("first".to_string())
        );
        assert_eq!(
            prompter.read_line("next.. ").unwrap(),
            Some("second".to_string())
        );
        assert_eq!(prompter.read_line("> ").unwrap(), None);

        assert_eq!(prompter.prompts, vec!["> ", "next.. ", "> "]);
    }
}
