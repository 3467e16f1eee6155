use crate::core::actions::ActionStates;
use crate::models::{
    ClipboardController, DownloadId, EntryId, HistoryNavigator, ListItem, SelectionNavigator,
};
use crate::system::{ArchiveFs, Host};
use crate::utils::config::Config;
use crate::utils::error::ZipManagerError;

mod downloads;
mod input;
mod navigation;
mod operations;

pub use downloads::DownloadQueue;
pub use input::{route, Command, KeyInput, KeyTarget};

/// 세션 상태
///
/// 세션 하나에 하나씩 생성되며, 초기화(reset) 시 트리/히스토리/선택/클립보드가 새로 시작됩니다.
pub struct Session {
    /// 설정
    config: Config,
    /// 사용자/환경 창구
    host: Box<dyn Host>,
    /// 엔트리 트리
    fs: ArchiveFs,
    /// 현재 보고 있는 폴더
    current_folder: EntryId,
    /// 폴더 히스토리
    history: HistoryNavigator,
    /// 목록과 하이라이트
    selection: SelectionNavigator,
    /// 클립보드
    clipboard: ClipboardController,
    /// 진행 중인 다운로드
    downloads: DownloadQueue,
    /// 종료 플래그
    should_quit: bool,
}

impl Session {
    pub fn new(config: Config, host: Box<dyn Host>) -> Self {
        let fs = ArchiveFs::new();
        let root = fs.root();
        let mut session = Self {
            config,
            host,
            fs,
            current_folder: root,
            history: HistoryNavigator::new(root),
            selection: SelectionNavigator::new(),
            clipboard: ClipboardController::new(),
            downloads: DownloadQueue::new(),
            should_quit: false,
        };
        session.update_selected_folder();
        session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fs(&self) -> &ArchiveFs {
        &self.fs
    }

    pub fn current_folder(&self) -> EntryId {
        self.current_folder
    }

    pub fn history(&self) -> &HistoryNavigator {
        &self.history
    }

    pub fn selection(&self) -> &SelectionNavigator {
        &self.selection
    }

    pub fn entries(&self) -> &[ListItem] {
        self.selection.items()
    }

    pub fn highlighted(&self) -> Option<ListItem> {
        self.selection.highlighted()
    }

    pub fn clipboard(&self) -> &ClipboardController {
        &self.clipboard
    }

    pub fn downloads(&self) -> &DownloadQueue {
        &self.downloads
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 종료
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// 현재 폴더 목록 다시 읽기 (목록에서 사라진 하이라이트는 해제)
    pub fn update_selected_folder(&mut self) {
        self.selection.refresh(&self.fs, self.current_folder);
    }

    /// 루트부터 현재 폴더까지의 경로
    pub fn breadcrumb(&self) -> Vec<EntryId> {
        self.fs.ancestors(self.current_folder)
    }

    /// 경로 표시용 문자열 (예: `/docs/inner`)
    pub fn breadcrumb_label(&self) -> String {
        let names: Vec<&str> = self
            .breadcrumb()
            .into_iter()
            .skip(1)
            .filter_map(|id| self.fs.name(id))
            .collect();
        format!("/{}", names.join("/"))
    }

    /// 버튼/단축키 활성화 상태
    pub fn action_states(&self) -> ActionStates {
        ActionStates {
            entry_highlighted: self.selection.highlighted_entry().is_some(),
            item_highlighted: self.selection.highlighted().is_some(),
            clipboard_filled: !self.clipboard.is_empty(),
            clipboard_pastable: self.clipboard.is_pastable(&self.fs),
            folder_has_entries: !self.fs.children(self.current_folder).is_empty(),
            can_go_back: self.history.can_go_back(),
            can_go_forward: self.history.can_go_forward(),
        }
    }

    /// 완료/진행 이벤트 반영 (대기하지 않음)
    pub fn pump(&mut self) -> usize {
        self.downloads.pump(self.host.as_mut())
    }

    /// 진행 중인 다운로드가 모두 끝날 때까지 대기
    pub async fn settle(&mut self) {
        self.downloads.settle(self.host.as_mut()).await;
    }

    /// 다운로드 취소
    pub fn abort_download(&mut self, id: DownloadId) -> bool {
        self.downloads.abort(id)
    }

    /// 작업 실패 알림 (세션은 계속 사용 가능)
    fn report_error(&mut self, operation: &str, err: ZipManagerError) {
        tracing::warn!(operation, error = %err, "operation failed");
        self.host.alert(&err.to_string());
    }
}
