// Core: 액션 정의와 키 바인딩
pub mod actions;
