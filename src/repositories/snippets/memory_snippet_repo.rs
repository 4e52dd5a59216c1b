use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::Snippet;
use crate::repositories::snippets::{LATEST_LIMIT, SnippetStore};

#[derive(Default)]
struct Inner {
    next_id: i64,
    snippets: Vec<Snippet>,
}

/// 프로세스 내 스니펫 저장소
#[derive(Default)]
pub struct MemorySnippetRepository {
    inner: Mutex<Inner>,
}

impl MemorySnippetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::DatabaseError("스니펫 저장소 잠금이 오염되었습니다".to_string()))
    }

    /// 만료 시각을 직접 지정해서 저장합니다. 만료 경계 테스트용입니다.
    pub fn insert_raw(&self, snippet: Snippet) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.next_id = inner.next_id.max(snippet.id);
        inner.snippets.push(snippet);
        Ok(())
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetRepository {
    async fn insert(&self, title: &str, content: &str, expires_days: i64) -> AppResult<i64> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.snippets.push(Snippet::new(
            id,
            title.to_string(),
            content.to_string(),
            expires_days,
        ));
        Ok(id)
    }

    async fn get(&self, id: i64) -> AppResult<Snippet> {
        let now = Utc::now();
        self.lock()?
            .snippets
            .iter()
            .find(|s| s.id == id && s.is_visible_at(now))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("snippet {}", id)))
    }

    async fn latest(&self) -> AppResult<Vec<Snippet>> {
        let now = Utc::now();
        Ok(self
            .lock()?
            .snippets
            .iter()
            .rev()
            .filter(|s| s.is_visible_at(now))
            .take(LATEST_LIMIT)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[actix_web::test]
    async fn test_expired_snippet_is_not_found() {
        let repo = MemorySnippetRepository::new();
        let mut expired = Snippet::new(1, "old".to_string(), "gone".to_string(), 1);
        expired.expires = Utc::now() - Duration::seconds(1);
        repo.insert_raw(expired).unwrap();

        assert!(matches!(repo.get(1).await, Err(AppError::NotFound(_))));
        assert!(repo.latest().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_latest_is_newest_first_and_limited() {
        let repo = MemorySnippetRepository::new();
        for i in 0..12 {
            repo.insert(&format!("t{}", i), "c", 7).await.unwrap();
        }

        let latest = repo.latest().await.unwrap();

        assert_eq!(latest.len(), LATEST_LIMIT);
        assert_eq!(latest[0].id, 12);
        assert_eq!(latest[9].id, 3);
        assert_eq!(repo.get(12).await.unwrap().title, "t11");
    }
}
