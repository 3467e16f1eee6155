//! zip 아카이브 관리 세션
//!
//! 메모리 안의 폴더 트리를 탐색/편집하고 zip으로 가져오기/내보내기 합니다.

pub mod app;
pub mod core;
pub mod models;
pub mod system;
pub mod utils;

pub use app::Session;
pub use system::Host;
pub use utils::config::Config;
