//! エラーハンドリングシステム
//!
//! baledt 全体で使用される統一されたエラー型とユーティリティを定義
//! アドレスエラーはすべてコマンド境界で捕捉し、バッファを無傷のまま報告する

use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum BaledtError {
    /// バッファ操作エラー
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),

    /// コマンド解析・実行エラー
    #[error("Command failed: {0}")]
    Command(#[from] CommandError),

    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// 外部ツール起動エラー
    #[error("Tool invocation failed: {0}")]
    Tool(#[from] ToolError),

    /// アプリケーション論理エラー
    #[error("Application error: {0}")]
    Application(String),
}

/// バッファ操作固有のエラー
///
/// ソースアドレスの検証はすべて変更前に行う。ここでエラーになった操作は
/// 一行も動かしていないことが保証される。
#[derive(Error, Debug, Clone)]
pub enum BufferError {
    #[error("line {index} out of range (buffer has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    #[error("range {begin},{end} out of range (buffer has {len} lines)")]
    RangeOutOfRange { begin: usize, end: usize, len: usize },

    #[error("invalid range: begin {begin} is after end {end}")]
    InvalidRange { begin: usize, end: usize },

    #[error("destination {dest} is inside the moved block {begin},{end}")]
    DestinationInsideBlock {
        begin: usize,
        end: usize,
        dest: usize,
    },
}

/// コマンド解析固有のエラー
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    #[error("unknown command: {name}")]
    Unknown { name: String },

    #[error("invalid address: {text}")]
    InvalidAddress { text: String },

    #[error("wrong number of arguments for {family}: expected {expected}, found {found}")]
    WrongArgumentCount {
        family: char,
        expected: &'static str,
        found: usize,
    },

    #[error("missing '/' delimiter in substitute pattern: {pattern}")]
    MissingDelimiter { pattern: String },
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone)]
pub enum FileError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("invalid path: {path}")]
    InvalidPath { path: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// 外部ツール固有のエラー
///
/// 終了ステータスは検査しない。報告するのは起動自体の失敗のみ。
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("failed to launch {tool}: {message}")]
    LaunchFailed { tool: String, message: String },
}

// std::io::Error から BaledtError への変換
impl From<std::io::Error> for BaledtError {
    fn from(error: std::io::Error) -> Self {
        BaledtError::File(FileError::Io {
            message: error.to_string(),
        })
    }
}

impl From<std::io::Error> for FileError {
    fn from(error: std::io::Error) -> Self {
        FileError::Io {
            message: error.to_string(),
        }
    }
}

/// 致命的エラー処理
pub fn handle_fatal_error(error: &BaledtError, context: &str) -> ! {
    let logger = crate::logging::Logger::for_development();
    logger.log_fatal_with_trace(error.to_string(), Some(context));

    eprintln!("FATAL: Application will terminate immediately");
    std::process::exit(1);
}

/// パニックハンドラの設定
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .unwrap_or_else(|| std::panic::Location::caller());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        eprintln!("PANIC at {}:{}: {}", location.file(), location.line(), message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, BaledtError>;

/// 各モジュール固有のResult型
pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

pub mod command {
    pub type Result<T> = std::result::Result<T, super::CommandError>;
}

pub mod file {
    pub type Result<T> = std::result::Result<T, super::FileError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_error_display() {
        let error = BufferError::LineOutOfRange { index: 7, len: 3 };
        assert_eq!(
            error.to_string(),
            "line 7 out of range (buffer has 3 lines)"
        );

        let error = BufferError::DestinationInsideBlock {
            begin: 1,
            end: 4,
            dest: 2,
        };
        assert!(error.to_string().contains("inside the moved block"));
    }

    #[test]
    fn test_command_error_display() {
        let error = CommandError::Unknown {
            name: "XYZZY".to_string(),
        };
        assert_eq!(error.to_string(), "unknown command: XYZZY");

        let error = CommandError::WrongArgumentCount {
            family: 'M',
            expected: "2 or 3",
            found: 4,
        };
        assert!(error.to_string().contains("expected 2 or 3, found 4"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let error: BaledtError = io_error.into();

        match error {
            BaledtError::File(FileError::Io { message }) => {
                assert!(message.contains("disk gone"));
            }
            _ => panic!("Expected FileError::Io"),
        }
    }

    #[test]
    fn test_nested_error_wrapping() {
        let inner = BufferError::LineOutOfRange { index: 0, len: 0 };
        let error: BaledtError = inner.into();
        assert!(matches!(error, BaledtError::Buffer(_)));
        assert!(error.to_string().contains("Buffer operation failed"));
    }
}
