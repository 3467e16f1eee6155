use std::fmt;

/// 트리 엔트리 식별자 (세션 내에서 고유)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 내보내기/다운로드 결과물
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Blob {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 현재 폴더 목록의 한 줄
///
/// `Parent`는 상위 폴더로 이동하는 ".." 항목입니다. 정렬 대상이 아니며
/// 엔트리 작업(복사/잘라내기/이름 변경/삭제)의 대상이 될 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListItem {
    Parent(EntryId),
    Entry(EntryId),
}

impl ListItem {
    /// 항목이 가리키는 엔트리
    pub fn entry_id(self) -> EntryId {
        match self {
            ListItem::Parent(id) | ListItem::Entry(id) => id,
        }
    }

    pub fn is_parent(self) -> bool {
        matches!(self, ListItem::Parent(_))
    }

    /// 엔트리 작업 대상이면 해당 엔트리 반환
    pub fn as_entry(self) -> Option<EntryId> {
        match self {
            ListItem::Entry(id) => Some(id),
            ListItem::Parent(_) => None,
        }
    }
}
