//! セッショントレース
//!
//! `BALEDT_DEBUG` 設定時にコマンド実行とセッション状態をJSON行形式で
//! ファイルへ記録する。状態レコードはハッシュで重複排除する。

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fs::{File, OpenOptions};
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// 既定のトレースファイル名
const DEFAULT_TRACE_PATH: &str = "baledt-debug.log";

pub struct DebugLogger {
    file: Mutex<File>,
    last_state_hash: Mutex<Option<u64>>,
    log_path: PathBuf,
}

impl DebugLogger {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            last_state_hash: Mutex::new(None),
            log_path: path.to_path_buf(),
        })
    }

    /// `BALEDT_DEBUG` からトレースを構築する
    ///
    /// 未設定・空なら無効。`1` なら既定パス、それ以外の値はパスとして扱う。
    pub fn from_env() -> Option<Self> {
        let value = std::env::var("BALEDT_DEBUG").ok()?;
        if value.is_empty() {
            return None;
        }
        let path = if value == "1" {
            PathBuf::from(DEFAULT_TRACE_PATH)
        } else {
            PathBuf::from(value)
        };
        match Self::new(&path) {
            Ok(logger) => Some(logger),
            Err(err) => {
                eprintln!("[debug log] failed to open {}: {}", path.display(), err);
                None
            }
        }
    }

    pub fn log_state(&self, state: SessionState) {
        let state_hash = state.content_hash();
        {
            let mut guard = self
                .last_state_hash
                .lock()
                .expect("debug logger last_state_hash poisoned");
            if guard.map(|hash| hash == state_hash).unwrap_or(false) {
                return;
            }
            *guard = Some(state_hash);
        }
        let record = DebugRecord::State(state);
        if let Err(err) = self.write_record(&record) {
            eprintln!("[debug log] failed to write state: {}", err);
        }
    }

    pub fn log_command(&self, input: &str, outcome: &str) {
        let record = DebugRecord::Command(CommandTrace {
            timestamp: current_timestamp(),
            input: input.to_string(),
            outcome: outcome.to_string(),
        });
        if let Err(err) = self.write_record(&record) {
            eprintln!("[debug log] failed to write command: {}", err);
        }
    }

    pub fn log_message(&self, level: &'static str, message: String) {
        let record = DebugRecord::Message(DebugMessage {
            timestamp: current_timestamp(),
            level: level.to_string(),
            message,
        });
        if let Err(err) = self.write_record(&record) {
            eprintln!("[debug log] failed to write message: {}", err);
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_record(&self, record: &DebugRecord) -> std::io::Result<()> {
        let mut file = self.file.lock().expect("debug logger file poisoned");
        let json = serde_json::to_string(record)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "record_type", rename_all = "snake_case")]
enum DebugRecord {
    State(SessionState),
    Command(CommandTrace),
    Message(DebugMessage),
}

/// セッション状態のスナップショット
#[derive(Serialize)]
pub struct SessionState {
    pub timestamp: String,
    pub buffer_len: usize,
    /// 挿入位置。`None` は末尾追記モード
    pub cursor_position: Option<usize>,
    pub save_name: String,
    pub first_line: String,
}

impl SessionState {
    /// タイムスタンプを除いた内容ハッシュ。重複排除に使う。
    fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.buffer_len.hash(&mut hasher);
        self.cursor_position.hash(&mut hasher);
        self.save_name.hash(&mut hasher);
        self.first_line.hash(&mut hasher);
        hasher.finish()
    }

    pub fn capture(session: &crate::session::Session) -> Self {
        let first_line = session
            .buffer
            .all()
            .next()
            .map(|(_, line)| truncate_for_log(line, 40))
            .unwrap_or_default();
        Self {
            timestamp: current_timestamp(),
            buffer_len: session.buffer.len(),
            cursor_position: session.cursor.pending_position(),
            save_name: session.save_name.clone(),
            first_line,
        }
    }
}

#[derive(Serialize)]
struct CommandTrace {
    pub timestamp: String,
    pub input: String,
    pub outcome: String,
}

#[derive(Serialize)]
struct DebugMessage {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

pub fn current_timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => format!("{}.{:09}", duration.as_secs(), duration.subsec_nanos()),
        Err(_) => "0.0".to_string(),
    }
}

pub fn truncate_for_log(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn command_records_are_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.log");
        let logger = DebugLogger::new(&path).unwrap();
        assert_eq!(logger.log_path(), path.as_path());

        logger.log_command("D3", "ok");
        logger.log_message("warn", "something".to_string());

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"record_type\":\"command\""));
        assert!(lines[0].contains("\"input\":\"D3\""));
        assert!(lines[1].contains("\"record_type\":\"message\""));
    }

    #[test]
    fn identical_states_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.log");
        let logger = DebugLogger::new(&path).unwrap();

        let state = |timestamp: &str| SessionState {
            timestamp: timestamp.to_string(),
            buffer_len: 2,
            cursor_position: None,
            save_name: "PROG.BAL".to_string(),
            first_line: "         BALR  R12,0".to_string(),
        };
        logger.log_state(state("1.0"));
        logger.log_state(state("2.0"));

        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_for_log("short", 10), "short");
        let long = "X".repeat(50);
        let truncated = truncate_for_log(&long, 10);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 10);
    }
}
