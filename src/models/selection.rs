use crate::models::entry::{EntryId, ListItem};
use crate::system::archive_fs::ArchiveFs;
use std::cmp::Ordering;

/// 하이라이트 토글 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Highlighted,
    Cleared,
    /// ".." 항목은 하이라이트 대신 실행
    Activate,
}

/// 현재 폴더 목록과 하이라이트 커서
///
/// `highlighted`는 항상 `items`의 원소이거나 None입니다.
#[derive(Debug, Clone, Default)]
pub struct SelectionNavigator {
    items: Vec<ListItem>,
    highlighted: Option<ListItem>,
}

impl SelectionNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 폴더 내용으로 목록 재구성
    ///
    /// 디렉토리 먼저, 그다음 파일, 각각 이름순. 상위 폴더가 있으면 ".." 항목이 맨 앞에 옵니다.
    /// 더 이상 목록에 없는 하이라이트는 해제됩니다.
    pub fn refresh(&mut self, fs: &ArchiveFs, folder: EntryId) {
        self.items = sorted_items(fs, folder);
        if let Some(item) = self.highlighted {
            if !self.items.contains(&item) {
                self.highlighted = None;
            }
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn highlighted(&self) -> Option<ListItem> {
        self.highlighted
    }

    /// 엔트리 작업 대상 (".." 항목 제외)
    pub fn highlighted_entry(&self) -> Option<EntryId> {
        self.highlighted.and_then(ListItem::as_entry)
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        let item = self.highlighted?;
        self.items.iter().position(|candidate| *candidate == item)
    }

    /// 하이라이트 지정. 목록에 없는 항목이면 false
    pub fn set_highlight(&mut self, item: ListItem) -> bool {
        if self.items.contains(&item) {
            self.highlighted = Some(item);
            true
        } else {
            false
        }
    }

    /// 엔트리가 목록에 있으면 하이라이트
    pub fn highlight_entry(&mut self, entry: EntryId) -> bool {
        self.set_highlight(ListItem::Entry(entry))
    }

    pub fn clear(&mut self) {
        self.highlighted = None;
    }

    pub fn toggle_highlight(&mut self, item: ListItem) -> ToggleOutcome {
        if item.is_parent() {
            return ToggleOutcome::Activate;
        }
        if self.highlighted == Some(item) {
            self.highlighted = None;
            ToggleOutcome::Cleared
        } else if self.set_highlight(item) {
            ToggleOutcome::Highlighted
        } else {
            ToggleOutcome::Cleared
        }
    }

    /// 다음 항목 (끝에서 처음으로 순환)
    pub fn next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let index = match self.highlighted_index() {
            Some(index) => (index + 1) % len,
            None => 0,
        };
        self.highlight_at(index);
    }

    /// 이전 항목 (처음에서 끝으로 순환)
    pub fn previous(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let index = match self.highlighted_index() {
            Some(index) => (index + len - 1) % len,
            None => len - 1,
        };
        self.highlight_at(index);
    }

    /// 한 페이지 아래 (순환 없음)
    pub fn page_next(&mut self, page_size: usize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let page_size = page_size.max(1);
        let index = match self.highlighted_index() {
            Some(index) => index.saturating_add(page_size),
            None => page_size - 1,
        };
        self.highlight_at(index.min(len - 1));
    }

    /// 한 페이지 위 (순환 없음)
    pub fn page_previous(&mut self, page_size: usize) {
        if self.items.is_empty() {
            return;
        }
        let index = self
            .highlighted_index()
            .map_or(0, |index| index.saturating_sub(page_size.max(1)));
        self.highlight_at(index);
    }

    pub fn first(&mut self) {
        if !self.items.is_empty() {
            self.highlight_at(0);
        }
    }

    pub fn last(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.highlight_at(last);
        }
    }

    fn highlight_at(&mut self, index: usize) {
        self.highlighted = self.items.get(index).copied();
    }
}

fn sorted_items(fs: &ArchiveFs, folder: EntryId) -> Vec<ListItem> {
    let mut children = fs.children(folder).to_vec();
    children.sort_by(|a, b| compare_entries(fs, *a, *b));

    let mut items = Vec::with_capacity(children.len() + 1);
    if let Some(parent) = fs.parent(folder) {
        items.push(ListItem::Parent(parent));
    }
    items.extend(children.into_iter().map(ListItem::Entry));
    items
}

fn compare_entries(fs: &ArchiveFs, a: EntryId, b: EntryId) -> Ordering {
    let a_dir = fs.is_directory(a);
    let b_dir = fs.is_directory(b);
    if a_dir != b_dir {
        return b_dir.cmp(&a_dir);
    }
    let a_name = fs.name(a).unwrap_or_default();
    let b_name = fs.name(b).unwrap_or_default();
    a_name
        .to_lowercase()
        .cmp(&b_name.to_lowercase())
        .then_with(|| a_name.cmp(b_name))
}
