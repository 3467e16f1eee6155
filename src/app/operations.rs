use super::*;
use std::collections::HashSet;

impl Session {
    // === 폴더 작업 ===

    /// 새 폴더 생성 후 하이라이트
    pub fn create_folder(&mut self) {
        let Some(name) = self.prompt(Prompt::CreateFolder, "") else {
            return;
        };
        match self.fs.add_directory(self.current_folder, &name) {
            Ok(folder) => {
                self.update_selected_folder();
                self.selection.highlight_entry(folder);
                tracing::info!(folder = %folder, name = %name, "folder created");
            }
            Err(err) => {
                self.report_error("create_folder", err);
                self.update_selected_folder();
            }
        }
    }

    /// 선택한 파일들을 현재 폴더에 추가 (실패한 파일마다 알림)
    pub fn add_files(&mut self) {
        let files = self.host.pick_files();
        if files.is_empty() {
            return;
        }
        let mut added = 0usize;
        for file in files {
            match self.fs.add_blob(self.current_folder, &file.name, file.data) {
                Ok(_) => added += 1,
                Err(err) => self.report_error("add_files", err),
            }
        }
        tracing::info!(added, folder = %self.current_folder, "files added");
        self.update_selected_folder();
    }

    /// zip 파일 내용을 현재 폴더에 병합
    pub async fn import_zip(&mut self) {
        let Some(archive) = self.host.pick_archive() else {
            return;
        };
        match self.fs.import_blob(self.current_folder, archive).await {
            Ok(added) => tracing::info!(added, folder = %self.current_folder, "zip imported"),
            Err(err) => self.report_error("import_zip", err),
        }
        self.update_selected_folder();
    }

    /// 현재 폴더를 zip으로 내보내기 (루트면 기본 파일명)
    pub fn export_zip(&mut self) {
        let folder = self.current_folder;
        let suggested = match self.fs.name(folder) {
            Some(name) if !name.is_empty() => format!("{}{}", name, self.config.zip_extension),
            _ => self.config.root_zip_filename.clone(),
        };
        let job = match self.fs.export_job(folder, &self.config.default_mime_type) {
            Ok(job) => job,
            Err(err) => return self.report_error("export_zip", err),
        };
        self.downloads.start(
            self.host.as_mut(),
            &self.config.messages.download_name,
            &suggested,
            move |signal, progress| job.run(signal, progress),
        );
    }

    /// 파일 내용 다운로드
    pub fn download_file(&mut self, file: EntryId) {
        let name = self.fs.name(file).unwrap_or_default().to_string();
        let job = match self.fs.blob_job(file, &self.config.default_mime_type) {
            Ok(job) => job,
            Err(err) => return self.report_error("download_file", err),
        };
        self.downloads.start(
            self.host.as_mut(),
            &self.config.messages.download_name,
            &name,
            move |signal, progress| job.run(signal, progress),
        );
    }

    // === 엔트리 작업 ===

    pub fn copy_entry(&mut self) {
        let Some(entry) = self.selection.highlighted_entry() else {
            return;
        };
        if let Err(err) = self.clipboard.copy(&mut self.fs, entry) {
            self.report_error("copy", err);
        }
    }

    pub fn cut_entry(&mut self) {
        let Some(entry) = self.selection.highlighted_entry() else {
            return;
        };
        if let Err(err) = self.clipboard.cut(&mut self.fs, entry) {
            self.report_error("cut", err);
        }
    }

    /// 클립보드 내용을 현재 폴더에 붙여넣기 (클립보드가 비어 있으면 무시)
    pub fn paste_entry(&mut self) {
        match self.clipboard.paste(&mut self.fs, self.current_folder) {
            Ok(_) => {}
            Err(err) => self.report_error("paste", err),
        }
        self.update_selected_folder();
    }

    pub fn reset_clipboard(&mut self) {
        self.clipboard.reset(&mut self.fs);
        tracing::debug!("clipboard cleared");
    }

    /// 이름 변경 (현재 이름이 기본값, 빈 값이나 같은 이름이면 무시)
    pub fn rename_entry(&mut self) {
        let Some(entry) = self.selection.highlighted_entry() else {
            return;
        };
        let current = self.fs.name(entry).unwrap_or_default().to_string();
        let Some(name) = self.prompt(Prompt::Rename, &current) else {
            return;
        };
        if name == current {
            return;
        }
        if let Err(err) = self.fs.rename(entry, &name) {
            self.report_error("rename", err);
        }
        self.update_selected_folder();
    }

    /// 하이라이트된 엔트리 삭제
    ///
    /// 삭제된 엔트리와 하위 폴더는 히스토리에서도 지워집니다.
    pub fn delete_entry(&mut self) {
        let Some(entry) = self.selection.highlighted_entry() else {
            return;
        };
        if !self.host.confirm(&self.config.messages.delete) {
            return;
        }

        let doomed: HashSet<EntryId> = self.fs.subtree(entry).into_iter().collect();
        if let Err(err) = self.fs.remove(entry) {
            self.report_error("delete", err);
            self.update_selected_folder();
            return;
        }
        self.history.on_entry_removed(|candidate| doomed.contains(&candidate));
        if let Some(current) = self.history.current() {
            self.current_folder = current;
        } else {
            self.history.reset(self.current_folder);
        }
        self.selection.clear();
        self.update_selected_folder();
        tracing::info!(entry = %entry, removed = doomed.len(), "entry deleted");
    }

    /// 세션 초기화 (새 빈 트리, 진행 중인 다운로드는 계속됨)
    pub fn reset(&mut self) {
        if !self.host.confirm(&self.config.messages.reset) {
            return;
        }
        self.fs = ArchiveFs::new();
        let root = self.fs.root();
        self.clipboard.forget();
        self.history.reset(root);
        self.current_folder = root;
        self.selection.clear();
        self.update_selected_folder();
        tracing::info!("session reset");
    }

    fn prompt(&mut self, prompt: Prompt, default: &str) -> Option<String> {
        let message = match prompt {
            Prompt::CreateFolder => &self.config.messages.create_folder,
            Prompt::Rename => &self.config.messages.rename,
        };
        self.host
            .prompt(message, default)
            .filter(|answer| !answer.is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
enum Prompt {
    CreateFolder,
    Rename,
}
