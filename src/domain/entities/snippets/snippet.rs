use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// 공유 스니펫
///
/// `expires`가 지나면 저장소에 남아 있어도 조회되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    pub fn new(id: i64, title: String, content: String, expires_days: i64) -> Self {
        let created = Utc::now();
        Self {
            id,
            title,
            content,
            created,
            expires: created + Duration::days(expires_days),
        }
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires
    }
}
