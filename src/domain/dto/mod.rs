//! # Form DTOs
//!
//! 사용자가 제출하는 폼. 각 폼은 [`FormTarget`](crate::validation::FormTarget)으로
//! 자신의 형태를 선언하고, `validator` 필드에 검증 결과를 누적합니다.

pub mod snippets;
pub mod users;

pub use snippets::{PERMITTED_EXPIRES, SnippetCreateForm};
pub use users::{INVALID_CREDENTIALS, LoginForm, SignupForm};

use crate::core::errors::AppResult;
use crate::validation::verify_shape;

/// 모든 폼 형태를 검증합니다. 서버 시작 시 한 번 호출합니다.
pub fn verify_form_shapes() -> AppResult<()> {
    verify_shape::<SnippetCreateForm>()?;
    verify_shape::<SignupForm>()?;
    verify_shape::<LoginForm>()?;
    Ok(())
}
