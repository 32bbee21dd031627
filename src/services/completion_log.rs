//! 已完成案件日志 - 业务能力层
//!
//! 只负责"记住哪些案件已经打开过 PDF"，不关心流程

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// 已完成案件日志
///
/// 文件每行一个编号，只追加不改写；内存中的集合负责去重。
#[derive(Debug)]
pub struct CompletionLog {
    path: PathBuf,
    entries: HashSet<String>,
}

impl CompletionLog {
    /// 读取日志文件，文件不存在时得到空日志
    pub fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("日志文件不存在，从空日志开始: {}", path.display());
                HashSet::new()
            }
            Err(e) => return Err(AppError::file_read_failed(path.display().to_string(), e)),
        };

        info!("📒 已完成日志中有 {} 个案件", entries.len());
        Ok(Self { path, entries })
    }

    pub fn contains(&self, process_number: &str) -> bool {
        self.entries.contains(process_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加一条记录
    ///
    /// 只能在案件的 PDF 查看器确认打开之后调用。
    pub fn append(&mut self, process_number: &str) -> AppResult<()> {
        let write_err = |e| AppError::file_write_failed(self.path.display().to_string(), e);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        // 一次写入整行，崩溃时最多损坏最后一行
        file.write_all(format!("{}\n", process_number).as_bytes())
            .map_err(write_err)?;
        file.flush().map_err(write_err)?;

        self.entries.insert(process_number.to_string());
        info!("📝 案件 '{}' 已记为完成", process_number);
        Ok(())
    }

    /// 表格中尚未完成的案件，保持表格顺序
    pub fn pending(&self, planilha: &[String]) -> Vec<String> {
        planilha
            .iter()
            .filter(|p| !self.contains(p))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_file_gives_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = CompletionLog::load(dir.path().join("log.txt")).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_load_ignores_blank_lines_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "12345678920231400001\n\n  99999999999999999999  \r\n").unwrap();

        let log = CompletionLog::load(&path).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.contains("12345678920231400001"));
        assert!(log.contains("99999999999999999999"));
    }

    #[test]
    fn test_append_then_reload_contains_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let mut log = CompletionLog::load(&path).unwrap();
        log.append("12345678920231400001").unwrap();
        log.append("12345678920231400001").unwrap();
        assert_eq!(log.len(), 1);

        // 磁盘上不去重
        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.lines().count(), 2);

        let reloaded = CompletionLog::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains("12345678920231400001"));
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = CompletionLog::load(dir.path().join("nao").join("log.txt")).unwrap();
        assert!(log.append("12345678920231400001").is_err());
        assert!(!log.contains("12345678920231400001"));
    }

    #[test]
    fn test_pending_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "b\n").unwrap();
        let log = CompletionLog::load(&path).unwrap();

        let planilha: Vec<String> = ["c", "b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(log.pending(&planilha), vec!["c", "a"]);
    }

    proptest! {
        #[test]
        fn prop_pending_is_order_preserving_difference(
            planilha in proptest::collection::vec("[0-9]{3}", 0..30),
            done in proptest::collection::vec("[0-9]{3}", 0..30),
        ) {
            let log = CompletionLog {
                path: PathBuf::from("unused"),
                entries: done.iter().cloned().collect(),
            };

            let pending = log.pending(&planilha);
            let expected: Vec<String> = planilha
                .iter()
                .filter(|p| !done.contains(p))
                .cloned()
                .collect();
            prop_assert_eq!(&pending, &expected);
            prop_assert_eq!(pending.is_empty(), planilha.iter().all(|p| done.contains(p)));
        }
    }
}
