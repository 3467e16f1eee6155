use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipManagerError {
    #[error("Entry filename already exists: {name}")]
    NameCollision { name: String },

    #[error("Invalid entry name: {name:?}")]
    InvalidName { name: String },

    #[error("Entry not found")]
    EntryNotFound,

    #[error("Target entry is not a directory")]
    NotADirectory,

    #[error("Entry is not a file")]
    NotAFile,

    #[error("Entry is an ancestor of the target entry")]
    MoveIntoDescendant,

    #[error("Root directory cannot be {operation}")]
    RootImmutable { operation: &'static str },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("download cancelled")]
    DownloadCancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ZipManagerError {
    /// 사용자 취소로 인한 다운로드 중단 여부 (알림 대상 아님)
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ZipManagerError::DownloadCancelled)
    }
}

pub type Result<T> = std::result::Result<T, ZipManagerError>;
