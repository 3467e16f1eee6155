use crate::models::entry::EntryId;

/// 폴더 이동 히스토리 (뒤로/앞으로)
///
/// `entries[index]`는 항상 현재 보고 있는 폴더입니다.
#[derive(Debug, Clone)]
pub struct HistoryNavigator {
    entries: Vec<EntryId>,
    index: usize,
}

impl HistoryNavigator {
    /// 시작 폴더 하나로 생성
    pub fn new(start: EntryId) -> Self {
        Self {
            entries: vec![start],
            index: 0,
        }
    }

    /// 새 트리로 교체 (세션 초기화)
    pub fn reset(&mut self, start: EntryId) {
        self.entries = vec![start];
        self.index = 0;
    }

    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<EntryId> {
        self.entries.get(self.index).copied()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// 폴더 진입 기록
    ///
    /// 현재 위치 이후의 앞으로 가기 기록은 버려집니다.
    pub fn go_into(&mut self, folder: EntryId) {
        if self.entries.is_empty() {
            self.entries.push(folder);
            self.index = 0;
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(folder);
        self.index = self.entries.len() - 1;
    }

    /// 뒤로 이동. 처음이면 None
    pub fn back(&mut self) -> Option<EntryId> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    /// 앞으로 이동. 마지막이면 None
    pub fn forward(&mut self) -> Option<EntryId> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    /// 삭제된 엔트리(및 하위 엔트리) 기록 정리
    ///
    /// `is_removed`가 true인 항목을 지우고, 그 결과 연속으로 붙게 된 같은
    /// 폴더는 하나로 합칩니다. 현재 위치 이전(포함)에서 빠진 개수만큼
    /// 인덱스를 당겨 가장 가까운 유효 단계를 가리키게 합니다.
    pub fn on_entry_removed<F>(&mut self, is_removed: F)
    where
        F: Fn(EntryId) -> bool,
    {
        let mut offset = 0usize;
        let mut previous: Option<EntryId> = None;
        let mut kept = Vec::with_capacity(self.entries.len());

        for (position, &entry) in self.entries.iter().enumerate() {
            let dropped = previous == Some(entry) || is_removed(entry);
            if dropped {
                if position <= self.index {
                    offset += 1;
                }
            } else {
                previous = Some(entry);
                kept.push(entry);
            }
        }

        self.entries = kept;
        self.index = self
            .index
            .saturating_sub(offset)
            .min(self.entries.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntryId {
        EntryId::new(raw)
    }

    fn walk(path: &[u64]) -> HistoryNavigator {
        let mut history = HistoryNavigator::new(id(path[0]));
        for &step in &path[1..] {
            history.go_into(id(step));
        }
        history
    }

    #[test]
    fn test_initial_state() {
        let history = HistoryNavigator::new(id(0));
        assert_eq!(history.current(), Some(id(0)));
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_back_then_forward_restores_folder() {
        let mut history = walk(&[0, 1, 2, 3]);

        assert_eq!(history.back(), Some(id(2)));
        assert_eq!(history.back(), Some(id(1)));
        assert_eq!(history.forward(), Some(id(2)));
        assert_eq!(history.forward(), Some(id(3)));
        assert_eq!(history.current(), Some(id(3)));
    }

    #[test]
    fn test_navigation_past_ends_is_noop() {
        let mut history = walk(&[0, 1]);

        assert_eq!(history.forward(), None);
        assert_eq!(history.index(), 1);
        history.back();
        assert_eq!(history.back(), None);
        assert_eq!(history.index(), 0);
        assert_eq!(history.current(), Some(id(0)));
    }

    #[test]
    fn test_go_into_discards_forward_branch() {
        let mut history = walk(&[0, 1, 2, 3]);
        history.back();
        history.back();

        history.go_into(id(9));

        assert_eq!(history.entries(), &[id(0), id(1), id(9)]);
        assert_eq!(history.index(), 2);
        assert!(!history.can_go_forward());
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_removal_prunes_entry_and_descendants() {
        // 0=root, 1=A, 2=A/B, 3=C
        let mut history = walk(&[0, 1, 2, 3]);

        history.on_entry_removed(|e| e == id(1) || e == id(2));

        assert_eq!(history.entries(), &[id(0), id(3)]);
        assert_eq!(history.index(), 1);
        assert_eq!(history.current(), Some(id(3)));
    }

    #[test]
    fn test_removal_collapses_adjacent_duplicates() {
        // root -> A -> root -> C, A 삭제 후 root가 연속됨
        let mut history = walk(&[0, 1, 0, 3]);

        history.on_entry_removed(|e| e == id(1));

        assert_eq!(history.entries(), &[id(0), id(3)]);
        assert_eq!(history.index(), 1);
        assert_eq!(history.current(), Some(id(3)));
    }

    #[test]
    fn test_removal_of_current_moves_to_nearest_previous_step() {
        let mut history = walk(&[0, 1, 2]);
        history.back();

        history.on_entry_removed(|e| e == id(1));

        assert_eq!(history.entries(), &[id(0), id(2)]);
        assert_eq!(history.current(), Some(id(0)));
    }

    #[test]
    fn test_removal_after_current_keeps_index() {
        let mut history = walk(&[0, 1, 2]);
        history.back();
        history.back();

        history.on_entry_removed(|e| e == id(2));

        assert_eq!(history.index(), 0);
        assert_eq!(history.entries(), &[id(0), id(1)]);
    }

    #[test]
    fn test_removal_of_everything_leaves_empty_history() {
        let mut history = walk(&[5, 6]);

        history.on_entry_removed(|_| true);

        assert!(history.entries().is_empty());
        assert_eq!(history.index(), 0);
        assert_eq!(history.current(), None);

        history.go_into(id(7));
        assert_eq!(history.current(), Some(id(7)));
    }
}
