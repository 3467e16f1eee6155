//! 실행 환경 협력자 (알림, 확인, 입력, 파일 선택, 저장)

use crate::models::entry::Blob;
use crate::utils::error::Result;

/// 사용자가 고른 로컬 파일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// 세션이 사용자/환경과 주고받는 창구
///
/// `prompt`가 None(또는 빈 문자열), `confirm`이 false면 사용자가 취소한 것입니다.
pub trait Host: Send {
    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;

    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// 추가할 파일 선택 (취소면 빈 목록)
    fn pick_files(&mut self) -> Vec<PickedFile>;

    /// 가져올 zip 파일 선택
    fn pick_archive(&mut self) -> Option<Vec<u8>>;

    /// 완료된 다운로드 저장
    fn save_blob(&mut self, name: &str, blob: Blob) -> Result<()>;
}

#[cfg(test)]
pub(crate) use scripted::ScriptedHost;
