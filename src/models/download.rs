//! 다운로드(내보내기) 작업 모델

use crate::models::entry::Blob;
use crate::utils::error::{Result, ZipManagerError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// 다운로드 식별자 (세션 동안 단조 증가)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DownloadId(u64);

impl DownloadId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 협조적 취소 신호
///
/// 작업 쪽은 `check()`로 취소 여부를 확인하고 빠져나와야 합니다.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// 취소되었으면 취소 센티널 에러 반환
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ZipManagerError::DownloadCancelled)
        } else {
            Ok(())
        }
    }
}

/// 작업 → 큐 이벤트
#[derive(Debug)]
pub enum DownloadEvent {
    Progress {
        id: DownloadId,
        value: Option<u64>,
        max: Option<u64>,
    },
    Finished {
        id: DownloadId,
        result: Result<Blob>,
    },
}

/// 진행률 보고 채널
#[derive(Debug, Clone)]
pub struct ProgressSink {
    id: DownloadId,
    tx: UnboundedSender<DownloadEvent>,
}

impl ProgressSink {
    pub(crate) fn new(id: DownloadId, tx: UnboundedSender<DownloadEvent>) -> Self {
        Self { id, tx }
    }

    /// 진행률 보고 (None은 진행률 불명)
    pub fn report(&self, value: Option<u64>, max: Option<u64>) {
        // 큐가 먼저 사라졌으면 보고할 곳이 없음
        let _ = self.tx.send(DownloadEvent::Progress {
            id: self.id,
            value,
            max,
        });
    }
}

/// 진행 중인 다운로드
#[derive(Debug, Clone)]
pub struct Download {
    pub id: DownloadId,
    pub name: String,
    pub progress_value: Option<u64>,
    pub progress_max: Option<u64>,
    pub(crate) cancel: CancelSignal,
}

impl Download {
    pub(crate) fn new(id: DownloadId, name: String, cancel: CancelSignal) -> Self {
        Self {
            id,
            name,
            progress_value: None,
            progress_max: None,
            cancel,
        }
    }

    /// 진행률 (0-100). 불명이면 None
    pub fn percentage(&self) -> Option<u8> {
        match (self.progress_value, self.progress_max) {
            (Some(_), Some(0)) => Some(100),
            (Some(value), Some(max)) => Some(((value.min(max) as f64 / max as f64) * 100.0) as u8),
            _ => None,
        }
    }
}

/// 큐와 연결되지 않은 취소 신호/진행률 채널 (작업 단독 실행용)
#[cfg(test)]
pub(crate) fn detached_task_handles() -> (CancelSignal, ProgressSink) {
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    (CancelSignal::new(), ProgressSink::new(DownloadId::new(0), tx))
}
