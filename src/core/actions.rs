//! 액션 시스템
//!
//! 키 바인딩과 도움말 내용이 모두 이 모듈의 레지스트리를 참조합니다.

use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::LazyLock;

/// 모든 가능한 액션의 열거
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Entry Operations
    CutEntry,
    CopyEntry,
    RenameEntry,
    PasteEntry,
    DeleteEntry,
    ActivateEntry,
    // Folder Operations
    CreateFolder,
    AddFiles,
    ImportZip,
    ExportZip,
    // History
    HistoryBack,
    HistoryForward,
    // Cursor
    HighlightPrevious,
    HighlightNext,
    HighlightPreviousPage,
    HighlightNextPage,
    HighlightFirst,
    HighlightLast,
    // 버튼 전용
    ResetClipboard,
    Reset,
    // System
    Quit,
}

/// 액션 카테고리 (키 입력 처리 단계 순서)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    EntryOperation,
    Deletion,
    Activation,
    FolderOperation,
    History,
    Cursor,
    Session,
    System,
}

impl ActionCategory {
    pub fn label(self) -> &'static str {
        match self {
            ActionCategory::EntryOperation => "Entry",
            ActionCategory::Deletion => "Delete",
            ActionCategory::Activation => "Open",
            ActionCategory::FolderOperation => "Folder",
            ActionCategory::History => "History",
            ActionCategory::Cursor => "Navigation",
            ActionCategory::Session => "Session",
            ActionCategory::System => "System",
        }
    }
}

/// 액션 정의 (메타데이터)
pub struct ActionDef {
    pub action: Action,
    pub label: &'static str,
    pub category: ActionCategory,
    pub shortcut_display: Option<&'static str>,
}

/// 키 바인딩 정의
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: Option<KeyModifiers>, // None = any modifier
    pub action: Action,
}

/// 모든 액션 메타데이터
pub static ACTION_DEFS: &[ActionDef] = &[
    // Entry Operations
    ActionDef {
        action: Action::CutEntry,
        label: "Cut",
        category: ActionCategory::EntryOperation,
        shortcut_display: Some("Ctrl+X"),
    },
    ActionDef {
        action: Action::CopyEntry,
        label: "Copy",
        category: ActionCategory::EntryOperation,
        shortcut_display: Some("Ctrl+C"),
    },
    ActionDef {
        action: Action::RenameEntry,
        label: "Rename",
        category: ActionCategory::EntryOperation,
        shortcut_display: Some("Ctrl+R"),
    },
    ActionDef {
        action: Action::PasteEntry,
        label: "Paste",
        category: ActionCategory::EntryOperation,
        shortcut_display: Some("Ctrl+V"),
    },
    ActionDef {
        action: Action::DeleteEntry,
        label: "Delete",
        category: ActionCategory::Deletion,
        shortcut_display: Some("Del / Backspace"),
    },
    ActionDef {
        action: Action::ActivateEntry,
        label: "Open / Download",
        category: ActionCategory::Activation,
        shortcut_display: Some("Enter"),
    },
    // Folder Operations
    ActionDef {
        action: Action::CreateFolder,
        label: "Create folder",
        category: ActionCategory::FolderOperation,
        shortcut_display: Some("Ctrl+D"),
    },
    ActionDef {
        action: Action::AddFiles,
        label: "Add files",
        category: ActionCategory::FolderOperation,
        shortcut_display: Some("Ctrl+F"),
    },
    ActionDef {
        action: Action::ImportZip,
        label: "Import zip file",
        category: ActionCategory::FolderOperation,
        shortcut_display: Some("Ctrl+O"),
    },
    ActionDef {
        action: Action::ExportZip,
        label: "Export zip file",
        category: ActionCategory::FolderOperation,
        shortcut_display: Some("Ctrl+E"),
    },
    // History
    ActionDef {
        action: Action::HistoryBack,
        label: "Back",
        category: ActionCategory::History,
        shortcut_display: Some("Alt+Left"),
    },
    ActionDef {
        action: Action::HistoryForward,
        label: "Forward",
        category: ActionCategory::History,
        shortcut_display: Some("Alt+Right"),
    },
    // Cursor
    ActionDef {
        action: Action::HighlightPrevious,
        label: "Previous entry",
        category: ActionCategory::Cursor,
        shortcut_display: Some("Up"),
    },
    ActionDef {
        action: Action::HighlightNext,
        label: "Next entry",
        category: ActionCategory::Cursor,
        shortcut_display: Some("Down"),
    },
    ActionDef {
        action: Action::HighlightPreviousPage,
        label: "Page up",
        category: ActionCategory::Cursor,
        shortcut_display: Some("PgUp"),
    },
    ActionDef {
        action: Action::HighlightNextPage,
        label: "Page down",
        category: ActionCategory::Cursor,
        shortcut_display: Some("PgDn"),
    },
    ActionDef {
        action: Action::HighlightFirst,
        label: "First entry",
        category: ActionCategory::Cursor,
        shortcut_display: Some("Home"),
    },
    ActionDef {
        action: Action::HighlightLast,
        label: "Last entry",
        category: ActionCategory::Cursor,
        shortcut_display: Some("End"),
    },
    // 버튼 전용 (키 바인딩 없음)
    ActionDef {
        action: Action::ResetClipboard,
        label: "Reset clipboard",
        category: ActionCategory::Session,
        shortcut_display: None,
    },
    ActionDef {
        action: Action::Reset,
        label: "Reset",
        category: ActionCategory::Session,
        shortcut_display: None,
    },
    // System
    ActionDef {
        action: Action::Quit,
        label: "Quit",
        category: ActionCategory::System,
        shortcut_display: Some("Ctrl+Q / Esc"),
    },
];

fn ctrl(c: char, action: Action) -> KeyBinding {
    KeyBinding {
        code: KeyCode::Char(c),
        modifiers: Some(KeyModifiers::CONTROL),
        action,
    }
}

fn bare(code: KeyCode, action: Action) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: Some(KeyModifiers::NONE),
        action,
    }
}

fn any(code: KeyCode, action: Action) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: None,
        action,
    }
}

fn build_key_bindings() -> Vec<KeyBinding> {
    vec![
        // 엔트리 작업
        ctrl('x', Action::CutEntry),
        ctrl('c', Action::CopyEntry),
        ctrl('r', Action::RenameEntry),
        ctrl('v', Action::PasteEntry),
        // 삭제
        bare(KeyCode::Delete, Action::DeleteEntry),
        bare(KeyCode::Backspace, Action::DeleteEntry),
        // 실행
        bare(KeyCode::Enter, Action::ActivateEntry),
        // 폴더 작업
        ctrl('d', Action::CreateFolder),
        ctrl('f', Action::AddFiles),
        // Ctrl+I는 터미널에서 Tab과 같은 바이트로 들어옴
        ctrl('o', Action::ImportZip),
        ctrl('e', Action::ExportZip),
        // 히스토리
        KeyBinding {
            code: KeyCode::Left,
            modifiers: Some(KeyModifiers::ALT),
            action: Action::HistoryBack,
        },
        KeyBinding {
            code: KeyCode::Right,
            modifiers: Some(KeyModifiers::ALT),
            action: Action::HistoryForward,
        },
        // 커서
        any(KeyCode::Up, Action::HighlightPrevious),
        any(KeyCode::Down, Action::HighlightNext),
        any(KeyCode::PageUp, Action::HighlightPreviousPage),
        any(KeyCode::PageDown, Action::HighlightNextPage),
        any(KeyCode::Home, Action::HighlightFirst),
        any(KeyCode::End, Action::HighlightLast),
        // 종료
        ctrl('q', Action::Quit),
        bare(KeyCode::Esc, Action::Quit),
    ]
}

static KEY_BINDINGS: LazyLock<Vec<KeyBinding>> = LazyLock::new(build_key_bindings);

/// 키 바인딩 목록 조회 (1회 초기화 후 재사용)
pub fn key_bindings() -> &'static [KeyBinding] {
    KEY_BINDINGS.as_slice()
}

impl KeyBinding {
    pub fn matches(&self, modifiers: KeyModifiers, code: KeyCode) -> bool {
        let mod_matches = match self.modifiers {
            None => true, // any modifier
            Some(required) => modifiers == required,
        };
        self.code == code && mod_matches
    }
}

/// 카테고리 안에서 키 입력에 해당하는 액션 조회
pub fn find_action(
    category: ActionCategory,
    modifiers: KeyModifiers,
    code: KeyCode,
) -> Option<Action> {
    key_bindings()
        .iter()
        .find(|binding| binding.action.category() == category && binding.matches(modifiers, code))
        .map(|binding| binding.action)
}

impl Action {
    pub fn def(self) -> Option<&'static ActionDef> {
        ACTION_DEFS.iter().find(|d| d.action == self)
    }

    pub fn category(self) -> ActionCategory {
        self.def()
            .map_or(ActionCategory::System, |def| def.category)
    }
}

/// 도움말용 엔트리 생성
///
/// 반환: (카테고리명, Vec<(단축키, 설명)>) 목록
pub fn generate_help_entries() -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> {
    let categories = [
        ActionCategory::EntryOperation,
        ActionCategory::Deletion,
        ActionCategory::Activation,
        ActionCategory::FolderOperation,
        ActionCategory::History,
        ActionCategory::Cursor,
        ActionCategory::System,
    ];

    categories
        .iter()
        .map(|category| {
            let items: Vec<(&'static str, &'static str)> = ACTION_DEFS
                .iter()
                .filter(|d| d.category == *category)
                .filter_map(|d| d.shortcut_display.map(|shortcut| (shortcut, d.label)))
                .collect();
            (category.label(), items)
        })
        .filter(|(_, items)| !items.is_empty())
        .collect()
}

/// 액션별 활성화 상태
///
/// 화면의 버튼 비활성화 조건과 동일하며, 비활성 액션은 단축키로도 실행되지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStates {
    /// ".."가 아닌 실제 엔트리가 하이라이트됨
    pub entry_highlighted: bool,
    /// 어떤 항목이든 하이라이트됨 (".." 포함)
    pub item_highlighted: bool,
    pub clipboard_filled: bool,
    /// 붙여넣을 수 있는 클립보드 (잘라낸 원본이 삭제되지 않음)
    pub clipboard_pastable: bool,
    pub folder_has_entries: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl ActionStates {
    pub fn is_enabled(&self, action: Action) -> bool {
        match action {
            Action::CutEntry | Action::CopyEntry | Action::RenameEntry | Action::DeleteEntry => {
                self.entry_highlighted
            }
            Action::ActivateEntry => self.item_highlighted,
            Action::PasteEntry => self.clipboard_pastable,
            Action::ResetClipboard => self.clipboard_filled,
            Action::ExportZip | Action::Reset => self.folder_has_entries,
            Action::HistoryBack => self.can_go_back,
            Action::HistoryForward => self.can_go_forward,
            Action::CreateFolder
            | Action::AddFiles
            | Action::ImportZip
            | Action::HighlightPrevious
            | Action::HighlightNext
            | Action::HighlightPreviousPage
            | Action::HighlightNextPage
            | Action::HighlightFirst
            | Action::HighlightLast
            | Action::Quit => true,
        }
    }
}
