//! 키 입력 라우팅
//!
//! 키 하나를 단계 순서(엔트리 작업 → 삭제 → 실행 → 폴더 작업 → 히스토리 → 커서 → 시스템)로
//! 검사해 실행할 명령 목록으로 바꿉니다. 비활성 액션은 단축키로도 실행되지 않습니다.

use crate::core::actions::{find_action, Action, ActionCategory, ActionStates};
use crate::models::ListItem;
use crossterm::event::{KeyCode, KeyModifiers};

/// 키 입력이 발생한 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// 창 전체 (포커스된 요소 없음)
    Window,
    /// 목록 항목의 이름 칸
    EntryName(ListItem),
}

/// 키 입력
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub target: KeyTarget,
}

impl KeyInput {
    pub fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self {
            code,
            modifiers,
            target: KeyTarget::Window,
        }
    }

    pub fn on_entry_name(mut self, item: ListItem) -> Self {
        self.target = KeyTarget::EntryName(item);
        self
    }
}

/// 라우팅 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run(Action),
    /// 이름 칸에서 Space: 하이라이트 토글
    ToggleItem(ListItem),
    /// 이름 칸에서 Enter: 해당 항목 실행
    ActivateItem(ListItem),
}

const ROUTING_PHASES: [ActionCategory; 7] = [
    ActionCategory::EntryOperation,
    ActionCategory::Deletion,
    ActionCategory::Activation,
    ActionCategory::FolderOperation,
    ActionCategory::History,
    ActionCategory::Cursor,
    ActionCategory::System,
];

/// 키 입력을 명령 목록으로 변환
pub fn route(input: &KeyInput, states: &ActionStates) -> Vec<Command> {
    let mut commands = Vec::new();

    if let KeyTarget::EntryName(item) = input.target {
        match input.code {
            KeyCode::Char(' ') if input.modifiers == KeyModifiers::NONE => {
                commands.push(Command::ToggleItem(item));
            }
            KeyCode::Enter if input.modifiers == KeyModifiers::NONE => {
                // 이름 칸에서 처리한 Enter는 창 단계로 전달하지 않음
                return vec![Command::ActivateItem(item)];
            }
            _ => {}
        }
    }

    for phase in ROUTING_PHASES {
        let Some(action) = find_action(phase, input.modifiers, input.code) else {
            continue;
        };
        if states.is_enabled(action) {
            commands.push(Command::Run(action));
        } else {
            tracing::trace!(?action, "shortcut ignored, action disabled");
        }
    }
    commands
}
