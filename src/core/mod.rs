//! # Core Module
//!
//! 애플리케이션 전역에서 쓰는 기반 타입을 모읍니다.
//!
//! - [`errors`] - `AppError`와 응답 매핑
//! - [`deadline`] - 저장소 호출 시간 제한
//! - [`state`] - 시작 시 한 번 만드는 의존성 묶음 (`AppState`)

pub mod deadline;
pub mod errors;
pub mod state;

pub use deadline::with_deadline;
pub use errors::*;
pub use state::AppState;
