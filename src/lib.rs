//! baledt - IBM S/370 BAL 向けの行指向エディタ
//!
//! タブ区切りで入力された一文を固定カラムのアセンブラ形式に整形して
//! 蓄積し、一文字コマンドで行の挿入・削除・複写・移動・置換を行う。
//! 外部のアセンブラとエミュレータの起動も担う。

// コアモジュール
pub mod debug;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// 編集層
pub mod commands;
pub mod format;
pub mod session;

// 対話層
pub mod app;
pub mod input;
pub mod tools;

// 公開API
pub use app::App;
pub use buffer::{Cursor, LineBuffer};
pub use commands::{Command, CommandProcessor, CommandResult};
pub use error::{BaledtError, Result};
pub use session::Session;
