//! 外部ツール起動
//!
//! 付属のアセンブラとエミュレータを同期サブプロセスとして起動する。
//! 終了ステータスは編集側の動作に影響しない。報告するのは起動失敗のみ。

use crate::error::ToolError;
use std::process::Command;

/// 既定のアセンブラコマンド
const DEFAULT_ASSEMBLER: &str = "s370bal-asm";
/// 既定のエミュレータコマンド
const DEFAULT_EMULATOR: &str = "s370bal-emu";

/// アセンブラ・エミュレータの起動役
#[derive(Debug, Clone)]
pub struct ToolRunner {
    assembler: String,
    emulator: String,
}

impl ToolRunner {
    pub fn new(assembler: impl Into<String>, emulator: impl Into<String>) -> Self {
        Self {
            assembler: assembler.into(),
            emulator: emulator.into(),
        }
    }

    /// `BALEDT_ASSEMBLER` / `BALEDT_EMULATOR` を読んで構築する
    pub fn from_env() -> Self {
        let assembler = std::env::var("BALEDT_ASSEMBLER")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ASSEMBLER.to_string());
        let emulator = std::env::var("BALEDT_EMULATOR")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_EMULATOR.to_string());
        Self::new(assembler, emulator)
    }

    pub fn assembler_command(&self) -> &str {
        &self.assembler
    }

    pub fn emulator_command(&self) -> &str {
        &self.emulator
    }

    /// 保存名を唯一の引数にしてアセンブラを実行する
    ///
    /// 保存名が未設定なら引数なしで起動する。
    pub fn assemble(&self, save_name: &str) -> Result<(), ToolError> {
        let arg = if save_name.is_empty() {
            None
        } else {
            Some(save_name)
        };
        run_tool(&self.assembler, arg)
    }

    /// エミュレータを実行する。`debug_flag` が空でなければ引数で渡す。
    pub fn emulate(&self, debug_flag: &str) -> Result<(), ToolError> {
        let arg = if debug_flag.is_empty() {
            None
        } else {
            Some(debug_flag)
        };
        run_tool(&self.emulator, arg)
    }
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::from_env()
    }
}

fn run_tool(tool: &str, arg: Option<&str>) -> Result<(), ToolError> {
    let mut command = Command::new(tool);
    if let Some(arg) = arg {
        command.arg(arg);
    }

    match command.status() {
        Ok(status) => {
            if !status.success() {
                log::warn!("{} exited with {}", tool, status);
            }
            Ok(())
        }
        Err(err) => Err(ToolError::LaunchFailed {
            tool: tool.to_string(),
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_and_defaults() {
        std::env::remove_var("BALEDT_ASSEMBLER");
        std::env::remove_var("BALEDT_EMULATOR");
        let runner = ToolRunner::from_env();
        assert_eq!(runner.assembler_command(), DEFAULT_ASSEMBLER);
        assert_eq!(runner.emulator_command(), DEFAULT_EMULATOR);

        std::env::set_var("BALEDT_ASSEMBLER", "my-asm");
        std::env::set_var("BALEDT_EMULATOR", "my-emu");
        let runner = ToolRunner::from_env();
        assert_eq!(runner.assembler_command(), "my-asm");
        assert_eq!(runner.emulator_command(), "my-emu");

        std::env::remove_var("BALEDT_ASSEMBLER");
        std::env::remove_var("BALEDT_EMULATOR");
    }

    #[test]
    fn missing_binary_reports_launch_failure() {
        let runner = ToolRunner::new("/nonexistent/baledt-asm", "/nonexistent/baledt-emu");
        let err = runner.assemble("prog.bal").unwrap_err();
        assert!(matches!(err, ToolError::LaunchFailed { .. }));
        assert!(err.to_string().contains("/nonexistent/baledt-asm"));
    }

    #[test]
    fn successful_launch_ignores_exit_status() {
        // `false` は非ゼロ終了するが、起動できた以上はエラーにしない
        let runner = ToolRunner::new("true", "false");
        assert!(runner.assemble("prog.bal").is_ok());
        assert!(runner.assemble("").is_ok());
        assert!(runner.emulate("-debug").is_ok());
        assert!(runner.emulate("").is_ok());
    }
}
