use super::input::{self, Command, KeyInput};
use super::*;
use crate::core::actions::Action;
use crate::models::ToggleOutcome;

impl Session {
    // === 키 입력 ===

    /// 키 입력 처리 후 실행한 명령 반환
    pub async fn dispatch(&mut self, key: KeyInput) -> Vec<Command> {
        let states = self.action_states();
        let commands = input::route(&key, &states);
        for command in &commands {
            self.execute_command(*command).await;
        }
        commands
    }

    pub async fn execute_command(&mut self, command: Command) {
        match command {
            Command::Run(action) => self.execute_action(action).await,
            Command::ToggleItem(item) => self.toggle_highlight(item),
            Command::ActivateItem(item) => self.activate(item),
        }
    }

    /// 액션 실행 (활성화 여부는 호출 측에서 확인)
    pub async fn execute_action(&mut self, action: Action) {
        tracing::debug!(?action, "execute action");
        match action {
            Action::CutEntry => self.cut_entry(),
            Action::CopyEntry => self.copy_entry(),
            Action::RenameEntry => self.rename_entry(),
            Action::PasteEntry => self.paste_entry(),
            Action::DeleteEntry => self.delete_entry(),
            Action::ActivateEntry => self.activate_highlighted(),
            Action::CreateFolder => self.create_folder(),
            Action::AddFiles => self.add_files(),
            Action::ImportZip => self.import_zip().await,
            Action::ExportZip => self.export_zip(),
            Action::HistoryBack => self.navigate_back(),
            Action::HistoryForward => self.navigate_forward(),
            Action::HighlightPrevious => self.selection.previous(),
            Action::HighlightNext => self.selection.next(),
            Action::HighlightPreviousPage => self.selection.page_previous(self.config.page_size),
            Action::HighlightNextPage => self.selection.page_next(self.config.page_size),
            Action::HighlightFirst => self.selection.first(),
            Action::HighlightLast => self.selection.last(),
            Action::ResetClipboard => self.reset_clipboard(),
            Action::Reset => self.reset(),
            Action::Quit => self.quit(),
        }
    }

    // === 폴더 이동 ===

    /// 폴더 진입 (앞으로 가기 기록은 버려짐)
    pub fn go_into(&mut self, folder: EntryId) {
        if !self.fs.is_directory(folder) || folder == self.current_folder {
            return;
        }
        self.history.go_into(folder);
        self.set_selected_folder(folder);
    }

    pub fn navigate_back(&mut self) {
        if let Some(folder) = self.history.back() {
            self.set_selected_folder(folder);
        }
    }

    pub fn navigate_forward(&mut self) {
        if let Some(folder) = self.history.forward() {
            self.set_selected_folder(folder);
        }
    }

    /// 경로 표시줄의 상위 폴더로 이동
    pub fn go_to_breadcrumb(&mut self, folder: EntryId) {
        if self.breadcrumb().contains(&folder) {
            self.go_into(folder);
        }
    }

    /// 현재 폴더 변경
    ///
    /// 방금 떠난 폴더가 새 목록에 보이면 그 폴더를 하이라이트합니다.
    fn set_selected_folder(&mut self, folder: EntryId) {
        let previous = self.current_folder;
        self.current_folder = folder;
        self.selection.clear();
        self.update_selected_folder();
        self.selection.highlight_entry(previous);
        tracing::debug!(from = %previous, to = %folder, "folder changed");
    }

    // === 하이라이트 / 실행 ===

    pub fn highlight(&mut self, item: ListItem) -> bool {
        self.selection.set_highlight(item)
    }

    /// 하이라이트 토글 (".." 항목은 실행)
    pub fn toggle_highlight(&mut self, item: ListItem) {
        if self.selection.toggle_highlight(item) == ToggleOutcome::Activate {
            self.activate(item);
        }
    }

    /// 항목 실행: 폴더는 진입, 파일은 다운로드
    pub fn activate(&mut self, item: ListItem) {
        let entry = item.entry_id();
        if self.fs.is_directory(entry) {
            self.go_into(entry);
        } else if self.fs.contains(entry) {
            self.download_file(entry);
        }
    }

    pub fn activate_highlighted(&mut self) {
        if let Some(item) = self.selection.highlighted() {
            self.activate(item);
        }
    }
}
