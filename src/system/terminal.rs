//! 터미널 Host 구현
//!
//! 입력은 raw 모드를 잠시 끄고 표준 입력에서 한 줄 읽습니다.
//! 다운로드는 다운로드 폴더(없으면 현재 디렉토리)에 저장합니다.

use crate::models::entry::Blob;
use crate::system::host::{Host, PickedFile};
use crate::utils::error::Result;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use std::ffi::OsStr;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub struct TerminalHost {
    download_dir: PathBuf,
}

impl TerminalHost {
    pub fn new(download_dir: PathBuf) -> Self {
        Self { download_dir }
    }

    /// 기본 저장 위치 (다운로드 폴더 → 현재 디렉토리)
    pub fn default_download_dir() -> PathBuf {
        dirs::download_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// 한 줄 입력 (EOF나 읽기 실패는 취소)
    fn read_line(&self, message: &str) -> Option<String> {
        let _cooked = CookedInput::begin();
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\r\n{} ", message);
        let _ = stdout.flush();

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line);

        match read {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// 줄 입력 동안 raw 모드를 끄고, 끝나면 들어올 때의 상태로 되돌림
struct CookedInput {
    restore_raw: bool,
}

impl CookedInput {
    fn begin() -> Self {
        let restore_raw = is_raw_mode_enabled().unwrap_or(false);
        if restore_raw {
            let _ = disable_raw_mode();
        }
        Self { restore_raw }
    }
}

impl Drop for CookedInput {
    fn drop(&mut self) {
        if self.restore_raw {
            let _ = enable_raw_mode();
        }
    }
}

impl Host for TerminalHost {
    fn alert(&mut self, message: &str) {
        let _ = self.read_line(&format!("[!] {} (Enter)", message));
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.read_line(&format!("{} [y/N]:", message))
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y"))
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        let line = if default.is_empty() {
            self.read_line(&format!("{}:", message))?
        } else {
            self.read_line(&format!("{} [{}]:", message, default))?
        };
        // 빈 입력은 기본값 수락
        if line.is_empty() {
            Some(default.to_string())
        } else {
            Some(line)
        }
    }

    fn pick_files(&mut self) -> Vec<PickedFile> {
        let Some(line) = self.read_line("Files to add (comma separated):") else {
            return Vec::new();
        };
        let (files, failures) = read_local_files(&line);
        for (path, err) in failures {
            tracing::warn!(path = %path.display(), error = %err, "cannot read local file");
        }
        files
    }

    fn pick_archive(&mut self) -> Option<Vec<u8>> {
        let line = self.read_line("Zip file to import:")?;
        let path = PathBuf::from(line.trim());
        if path.as_os_str().is_empty() {
            return None;
        }
        match fs::read(&path) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read archive");
                None
            }
        }
    }

    fn save_blob(&mut self, name: &str, blob: Blob) -> Result<()> {
        fs::create_dir_all(&self.download_dir)?;
        let path = next_unique_path(&self.download_dir, name);
        fs::write(&path, &blob.data)?;
        tracing::info!(path = %path.display(), size = blob.len(), "download saved");
        Ok(())
    }
}

/// 쉼표로 구분된 경로들을 읽어 파일 목록으로 변환
///
/// 읽지 못한 경로는 오류와 함께 따로 반환합니다.
pub fn read_local_files(line: &str) -> (Vec<PickedFile>, Vec<(PathBuf, io::Error)>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();
    for raw in line.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let path = PathBuf::from(raw);
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or(raw)
            .to_string();
        match fs::read(&path) {
            Ok(data) => files.push(PickedFile::new(name, data)),
            Err(err) => failures.push((path, err)),
        }
    }
    (files, failures)
}

/// 같은 이름이 있으면 `name_(n).ext` 형태로 비어 있는 경로 생성
pub fn next_unique_path(base_dir: &Path, desired_filename: &str) -> PathBuf {
    let desired = Path::new(desired_filename);
    let stem = desired
        .file_stem()
        .and_then(OsStr::to_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("download");
    let extension = desired
        .extension()
        .and_then(OsStr::to_str)
        .filter(|ext| !ext.is_empty());

    let make_name = |index: usize| -> String {
        let base = if index == 0 {
            stem.to_string()
        } else {
            format!("{}_({})", stem, index)
        };
        match extension {
            Some(ext) => format!("{}.{}", base, ext),
            None => base,
        }
    };

    let mut index = 0usize;
    loop {
        let candidate = base_dir.join(make_name(index));
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_next_unique_path_free_name() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_unique_path(dir.path(), "a.zip"), dir.path().join("a.zip"));
    }

    #[test]
    fn test_next_unique_path_appends_index() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.zip"), b"1").unwrap();
        fs::write(dir.path().join("a_(1).zip"), b"2").unwrap();
        assert_eq!(
            next_unique_path(dir.path(), "a.zip"),
            dir.path().join("a_(2).zip")
        );
    }

    #[test]
    fn test_next_unique_path_without_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes"), b"1").unwrap();
        assert_eq!(
            next_unique_path(dir.path(), "notes"),
            dir.path().join("notes_(1)")
        );
    }

    #[test]
    fn test_save_blob_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut host = TerminalHost::new(dir.path().join("out"));
        host.save_blob("x.txt", Blob::new(b"first".to_vec(), "text/plain"))
            .unwrap();
        host.save_blob("x.txt", Blob::new(b"second".to_vec(), "text/plain"))
            .unwrap();

        let out = dir.path().join("out");
        assert_eq!(fs::read(out.join("x.txt")).unwrap(), b"first");
        assert_eq!(fs::read(out.join("x_(1).txt")).unwrap(), b"second");
    }

    #[test]
    fn test_cooked_input_keeps_cooked_terminal_cooked() {
        assert!(!is_raw_mode_enabled().unwrap());
        let cooked = CookedInput::begin();
        assert!(!cooked.restore_raw);
        drop(cooked);
        assert!(!is_raw_mode_enabled().unwrap());
    }

    #[test]
    fn test_read_local_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, b"alpha").unwrap();
        let missing = dir.path().join("missing.txt");

        let line = format!("{}, ,{}", a.display(), missing.display());
        let (files, failures) = read_local_files(&line);

        assert_eq!(files, vec![PickedFile::new("a.txt", b"alpha".to_vec())]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
    }
}
