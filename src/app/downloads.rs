//! 다운로드 큐
//!
//! 작업은 tokio 태스크로 돌고, 진행률/완료는 채널로 돌아와 소유자(메인 루프)만 목록을 바꿉니다.

use crate::models::entry::Blob;
use crate::models::{CancelSignal, Download, DownloadEvent, DownloadId, ProgressSink};
use crate::system::Host;
use crate::utils::error::Result;
use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub struct DownloadQueue {
    /// 진행 중인 다운로드 (최신이 앞)
    active: Vec<Download>,
    last_id: u64,
    /// 아직 완료 이벤트를 받지 못한 태스크 수 (취소된 것 포함)
    in_flight: usize,
    tx: UnboundedSender<DownloadEvent>,
    rx: UnboundedReceiver<DownloadEvent>,
}

impl DownloadQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            active: Vec::new(),
            last_id: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn downloads(&self) -> &[Download] {
        &self.active
    }

    pub fn get(&self, id: DownloadId) -> Option<&Download> {
        self.active.iter().find(|download| download.id == id)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// 다운로드 시작
    ///
    /// 파일명을 사용자에게 확인받고(빈 값/취소면 아무것도 하지 않음) 새 다운로드를 목록 맨 앞에 추가한 뒤
    /// `produce`를 tokio 태스크로 실행합니다. 런타임 컨텍스트 안에서 호출해야 합니다.
    pub fn start<P, Fut>(
        &mut self,
        host: &mut dyn Host,
        message: &str,
        suggested_name: &str,
        produce: P,
    ) -> Option<DownloadId>
    where
        P: FnOnce(CancelSignal, ProgressSink) -> Fut,
        Fut: Future<Output = Result<Blob>> + Send + 'static,
    {
        let name = host
            .prompt(message, suggested_name)
            .filter(|name| !name.is_empty())?;

        self.last_id += 1;
        let id = DownloadId::new(self.last_id);
        let cancel = CancelSignal::new();
        self.active
            .insert(0, Download::new(id, name.clone(), cancel.clone()));

        let task = produce(cancel, ProgressSink::new(id, self.tx.clone()));
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = task.await;
            let _ = tx.send(DownloadEvent::Finished { id, result });
        });

        tracing::info!(id = %id, name = %name, "download started");
        Some(id)
    }

    /// 취소 신호를 보내고 즉시 목록에서 제거
    ///
    /// 이후 도착하는 완료 이벤트는 조용히 버려집니다.
    pub fn abort(&mut self, id: DownloadId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let download = self.active.remove(position);
        download.cancel.cancel();
        tracing::info!(id = %id, name = %download.name, "download aborted");
        true
    }

    /// 진행률 갱신 (목록 순서는 그대로)
    pub fn report_progress(&mut self, id: DownloadId, value: Option<u64>, max: Option<u64>) -> bool {
        match self.active.iter_mut().find(|download| download.id == id) {
            Some(download) => {
                download.progress_value = value;
                download.progress_max = max;
                true
            }
            None => false,
        }
    }

    /// 쌓인 이벤트 반영. 반영한 이벤트 수 반환
    pub fn pump(&mut self, host: &mut dyn Host) -> usize {
        let mut applied = 0usize;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event, host);
            applied += 1;
        }
        applied
    }

    /// 실행 중인 태스크가 모두 끝날 때까지 이벤트 반영
    pub async fn settle(&mut self, host: &mut dyn Host) {
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(event) => self.apply(event, host),
                None => break,
            }
        }
        self.pump(host);
    }

    fn apply(&mut self, event: DownloadEvent, host: &mut dyn Host) {
        match event {
            DownloadEvent::Progress { id, value, max } => {
                self.report_progress(id, value, max);
            }
            DownloadEvent::Finished { id, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let Some(position) = self.position(id) else {
                    tracing::debug!(id = %id, "completion of aborted download discarded");
                    return;
                };
                let download = self.active.remove(position);
                let outcome = result.and_then(|blob| host.save_blob(&download.name, blob));
                match outcome {
                    Ok(()) => {
                        tracing::info!(id = %id, name = %download.name, "download saved");
                    }
                    Err(err) if err.is_cancellation() => {
                        tracing::debug!(id = %id, "download cancelled");
                    }
                    Err(err) => {
                        tracing::warn!(id = %id, name = %download.name, error = %err, "download failed");
                        host.alert(&err.to_string());
                    }
                }
            }
        }
    }

    fn position(&self, id: DownloadId) -> Option<usize> {
        self.active.iter().position(|download| download.id == id)
    }
}

impl Default for DownloadQueue {
    fn default() -> Self {
        Self::new()
    }
}
