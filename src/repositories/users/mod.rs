//! 사용자 데이터 액세스 계층
//!
//! [`UserStore`] 계약과 MongoDB/메모리 구현을 제공합니다. 두 구현 모두 비밀번호를
//! bcrypt로 해시하고, 중복 이메일과 잘못된 자격 증명을 같은 센티널 에러로 보고합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! match state.users.authenticate(&form.email, &form.password).await {
//!     Ok(id) => { /* 로그인 */ }
//!     Err(AppError::InvalidCredentials) => form.add_non_field_error(INVALID_CREDENTIALS),
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod memory_user_repo;
pub mod passwords;
pub mod user_repo;

use async_trait::async_trait;

use crate::core::errors::AppResult;

pub use memory_user_repo::MemoryUserRepository;
pub use user_repo::MongoUserRepository;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// 새 사용자를 저장합니다. 이미 쓰인 이메일이면 `AppError::DuplicateEmail`
    async fn insert(&self, name: &str, email: &str, password: &str) -> AppResult<()>;

    /// 자격 증명을 확인하고 사용자 ID를 반환합니다.
    ///
    /// 이메일이 없든 비밀번호가 틀리든 `AppError::InvalidCredentials` 하나로 보고합니다.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<i64>;

    async fn exists(&self, id: i64) -> AppResult<bool>;
}
