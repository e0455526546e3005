//! ファイル操作
//!
//! 一行一レコードのプレーンテキスト入出力とパス展開

pub mod io;

pub use io::{expand_path, read_lines, save_lines};
