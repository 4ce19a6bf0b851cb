use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

// Lines kept for the on-screen tail
const LOG_CAPACITY: usize = 200;
pub const DEFAULT_LOG_FILE_PATH: &str = "/tmp/hecate-installer.log";

/// Recent lines for the screen plus a plain-text copy on disk.
#[derive(Debug, Default)]
pub struct InstallLog {
    lines: VecDeque<String>,
    file: Option<File>,
}

impl InstallLog {
    /// Truncates `path`. If it cannot be opened the log stays in memory only.
    pub fn open(path: &Path) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .ok();
        let mut log = Self {
            lines: VecDeque::new(),
            file,
        };
        if log.file.is_some() {
            log.push(format!("Logging to {}", path.display()));
        }
        log
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.record(&line);
        while self.lines.len() >= LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Written to the file only, kept off the screen.
    pub fn record(&mut self, line: &str) {
        if let Some(file) = &mut self.file {
            let _ = file.write_all(line.as_bytes());
            let _ = file.write_all(b"\n");
            let _ = file.flush();
        }
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    pub fn tail(&self, count: usize) -> Vec<&str> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines().skip(skip).collect()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}
