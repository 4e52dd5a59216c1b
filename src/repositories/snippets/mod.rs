//! 스니펫 저장소
//!
//! [`SnippetStore`] 계약과 MongoDB/메모리 구현을 제공합니다.

pub mod memory_snippet_repo;
pub mod snippet_repo;

use async_trait::async_trait;

use crate::core::errors::AppResult;
use crate::domain::entities::Snippet;

pub use memory_snippet_repo::MemorySnippetRepository;
pub use snippet_repo::MongoSnippetRepository;

/// 최근 목록에 표시할 스니펫 수
pub const LATEST_LIMIT: usize = 10;

#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// 새 스니펫을 저장하고 ID를 반환합니다.
    async fn insert(&self, title: &str, content: &str, expires_days: i64) -> AppResult<i64>;

    /// 스니펫을 조회합니다.
    ///
    /// 없거나 만료된 스니펫은 `AppError::NotFound`입니다.
    async fn get(&self, id: i64) -> AppResult<Snippet>;

    /// 만료되지 않은 최근 스니펫을 최신순으로 최대 [`LATEST_LIMIT`]개 반환합니다.
    async fn latest(&self) -> AppResult<Vec<Snippet>>;
}
