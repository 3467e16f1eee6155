use crate::models::entry::EntryId;
use crate::system::archive_fs::ArchiveFs;
use crate::utils::error::{Result, ZipManagerError};

/// 클립보드 내용
///
/// `cut`이면 `entry`는 트리에 붙어 있는 원본, 아니면 분리된 복제본입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardContent {
    pub entry: EntryId,
    pub cut: bool,
}

/// 복사/잘라내기/붙여넣기
#[derive(Debug, Clone, Default)]
pub struct ClipboardController {
    content: Option<ClipboardContent>,
}

impl ClipboardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<ClipboardContent> {
        self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// 붙여넣기 가능 여부
    ///
    /// 잘라낸 원본이 이후 삭제되었으면 비울 수만 있습니다.
    pub fn is_pastable(&self, fs: &ArchiveFs) -> bool {
        self.content
            .is_some_and(|content| !content.cut || fs.contains(content.entry))
    }

    /// 깊은 복제본을 클립보드에 보관
    pub fn copy(&mut self, fs: &mut ArchiveFs, entry: EntryId) -> Result<()> {
        let clone = fs.clone_entry(entry, true)?;
        self.replace(
            fs,
            ClipboardContent {
                entry: clone,
                cut: false,
            },
        );
        tracing::debug!(entry = %entry, clone = %clone, "entry copied");
        Ok(())
    }

    /// 원본 참조를 클립보드에 보관 (붙여넣기 전까지 제자리에 남음)
    pub fn cut(&mut self, fs: &mut ArchiveFs, entry: EntryId) -> Result<()> {
        if !fs.contains(entry) {
            return Err(ZipManagerError::EntryNotFound);
        }
        self.replace(fs, ClipboardContent { entry, cut: true });
        tracing::debug!(entry = %entry, "entry cut");
        Ok(())
    }

    /// `target` 폴더에 붙여넣기
    ///
    /// 복사 모드는 보관 중인 복제본을 붙이고 새 복제본으로 클립보드를 채웁니다.
    /// 이름이 겹치면 `stem_(n).ext` 형태로 바꿔 붙입니다.
    /// 잘라내기 모드는 원본을 옮기고 클립보드를 그대로 둡니다.
    /// 실패하면 클립보드는 변경되지 않습니다. 비어 있으면 `Ok(None)`.
    pub fn paste(&mut self, fs: &mut ArchiveFs, target: EntryId) -> Result<Option<EntryId>> {
        let Some(content) = self.content else {
            return Ok(None);
        };

        if content.cut {
            fs.move_entry(content.entry, target)?;
            tracing::debug!(entry = %content.entry, target = %target, "entry moved");
            return Ok(Some(content.entry));
        }

        if !fs.is_directory(target) {
            return Err(ZipManagerError::NotADirectory);
        }
        let held = content.entry;
        let original_name = fs
            .name(held)
            .ok_or(ZipManagerError::EntryNotFound)?
            .to_string();
        let refill = fs.clone_entry(held, true)?;

        let name = fs.unique_child_name(target, &original_name);
        let attached = if name == original_name {
            fs.move_entry(held, target)
        } else {
            fs.rename(held, &name)
                .and_then(|()| fs.move_entry(held, target))
        };
        if let Err(err) = attached {
            if fs.name(held) != Some(original_name.as_str()) {
                let _ = fs.rename(held, &original_name);
            }
            fs.discard(refill);
            return Err(err);
        }

        self.content = Some(ClipboardContent {
            entry: refill,
            cut: false,
        });
        tracing::debug!(entry = %held, target = %target, "copy pasted");
        Ok(Some(held))
    }

    /// 클립보드 비우기
    pub fn reset(&mut self, fs: &mut ArchiveFs) {
        if let Some(previous) = self.content.take() {
            if !previous.cut {
                fs.discard(previous.entry);
            }
        }
    }

    /// 트리가 통째로 교체될 때 (보관 중인 id는 새 트리에서 의미가 없음)
    pub fn forget(&mut self) {
        self.content = None;
    }

    fn replace(&mut self, fs: &mut ArchiveFs, content: ClipboardContent) {
        self.reset(fs);
        self.content = Some(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root/{src/{doc/{a.txt}}, dst/}
    fn setup() -> (ArchiveFs, EntryId, EntryId, EntryId) {
        let mut fs = ArchiveFs::new();
        let root = fs.root();
        let src = fs.add_directory(root, "src").unwrap();
        let doc = fs.add_directory(src, "doc").unwrap();
        fs.add_blob(doc, "a.txt", b"alpha".to_vec()).unwrap();
        let dst = fs.add_directory(root, "dst").unwrap();
        (fs, src, doc, dst)
    }

    #[test]
    fn test_paste_on_empty_clipboard_is_noop() {
        let (mut fs, _, _, dst) = setup();
        let mut clipboard = ClipboardController::new();
        assert_eq!(clipboard.paste(&mut fs, dst).unwrap(), None);
        assert!(fs.children(dst).is_empty());
    }

    #[test]
    fn test_copy_paste_twice_yields_independent_entries() {
        let (mut fs, src, doc, dst) = setup();
        let mut clipboard = ClipboardController::new();
        clipboard.copy(&mut fs, doc).unwrap();

        let first = clipboard.paste(&mut fs, dst).unwrap().unwrap();
        let second = clipboard.paste(&mut fs, dst).unwrap().unwrap();

        assert_ne!(first, doc);
        assert_ne!(second, doc);
        assert_ne!(first, second);
        assert_eq!(fs.children(dst), &[first, second]);
        assert_eq!(fs.name(first), Some("doc"));
        assert_eq!(fs.name(second), Some("doc_(1)"));
        assert!(fs.child_by_name(first, "a.txt").is_some());
        assert!(fs.child_by_name(second, "a.txt").is_some());
        assert_ne!(fs.children(first), fs.children(second));

        // 원본은 제자리
        assert_eq!(fs.parent(doc), Some(src));
        let held = clipboard.content().unwrap();
        assert!(!held.cut);
        assert!(fs.is_detached(held.entry));
    }

    #[test]
    fn test_copy_is_independent_of_later_changes() {
        let (mut fs, _, doc, dst) = setup();
        let mut clipboard = ClipboardController::new();
        clipboard.copy(&mut fs, doc).unwrap();

        fs.rename(doc, "renamed").unwrap();
        let pasted = clipboard.paste(&mut fs, dst).unwrap().unwrap();
        assert_eq!(fs.name(pasted), Some("doc"));
    }

    #[test]
    fn test_cut_paste_moves_same_entry_and_keeps_clipboard() {
        let (mut fs, src, doc, dst) = setup();
        let root = fs.root();
        let mut clipboard = ClipboardController::new();
        clipboard.cut(&mut fs, doc).unwrap();
        assert_eq!(fs.parent(doc), Some(src));

        assert_eq!(clipboard.paste(&mut fs, dst).unwrap(), Some(doc));
        assert_eq!(fs.parent(doc), Some(dst));
        assert!(fs.children(src).is_empty());
        assert_eq!(fs.children(dst), &[doc]);

        // 계속 같은 엔트리를 옮기는 앵커로 남음
        assert_eq!(clipboard.paste(&mut fs, root).unwrap(), Some(doc));
        assert_eq!(fs.parent(doc), Some(root));
        assert_eq!(clipboard.content().unwrap().entry, doc);
    }

    #[test]
    fn test_failed_paste_leaves_clipboard_unchanged() {
        let (mut fs, src, doc, _) = setup();
        let mut clipboard = ClipboardController::new();

        clipboard.cut(&mut fs, src).unwrap();
        let err = clipboard.paste(&mut fs, doc).unwrap_err();
        assert!(matches!(err, ZipManagerError::MoveIntoDescendant));
        assert_eq!(
            clipboard.content(),
            Some(ClipboardContent {
                entry: src,
                cut: true
            })
        );

        let file = fs.children(doc)[0];
        clipboard.copy(&mut fs, doc).unwrap();
        let before = clipboard.content();
        assert!(matches!(
            clipboard.paste(&mut fs, file),
            Err(ZipManagerError::NotADirectory)
        ));
        assert_eq!(clipboard.content(), before);
    }

    #[test]
    fn test_cut_of_removed_entry_is_not_pastable() {
        let (mut fs, src, doc, _) = setup();
        let mut clipboard = ClipboardController::new();
        assert!(!clipboard.is_pastable(&fs));

        clipboard.copy(&mut fs, doc).unwrap();
        fs.remove(src).unwrap();
        assert!(clipboard.is_pastable(&fs));

        let (mut fs, src, doc, _) = setup();
        clipboard.forget();
        clipboard.cut(&mut fs, doc).unwrap();
        assert!(clipboard.is_pastable(&fs));
        fs.remove(src).unwrap();
        assert!(!clipboard.is_pastable(&fs));
        assert!(!clipboard.is_empty());
    }

    #[test]
    fn test_reset_discards_detached_clone() {
        let (mut fs, _, doc, _) = setup();
        let mut clipboard = ClipboardController::new();
        clipboard.copy(&mut fs, doc).unwrap();
        let clone = clipboard.content().unwrap().entry;

        clipboard.reset(&mut fs);
        assert!(clipboard.is_empty());
        assert!(!fs.contains(clone));

        clipboard.cut(&mut fs, doc).unwrap();
        clipboard.reset(&mut fs);
        assert!(fs.contains(doc));
    }

    #[test]
    fn test_copy_replaces_previous_clone() {
        let (mut fs, src, doc, _) = setup();
        let mut clipboard = ClipboardController::new();
        clipboard.copy(&mut fs, doc).unwrap();
        let first_clone = clipboard.content().unwrap().entry;

        clipboard.copy(&mut fs, src).unwrap();
        assert!(!fs.contains(first_clone));
        assert_eq!(
            fs.name(clipboard.content().unwrap().entry),
            Some("src")
        );
    }
}
