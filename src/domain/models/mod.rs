//! 요청 범위 모델. 저장되지 않고 요청이 끝나면 사라집니다.

pub mod auth;

pub use auth::RequestIdentity;
