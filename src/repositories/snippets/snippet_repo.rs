use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Collection, IndexModel};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppError, AppResult};
use crate::db::Database;
use crate::domain::entities::Snippet;
use crate::repositories::snippets::{LATEST_LIMIT, SnippetStore};

const COLLECTION: &str = "snippets";

/// `snippets` 컬렉션 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnippetDocument {
    #[serde(rename = "_id")]
    id: i64,
    title: String,
    content: String,
    created: bson::DateTime,
    expires: bson::DateTime,
}

impl From<&Snippet> for SnippetDocument {
    fn from(s: &Snippet) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            content: s.content.clone(),
            created: to_bson(s.created),
            expires: to_bson(s.expires),
        }
    }
}

impl From<SnippetDocument> for Snippet {
    fn from(d: SnippetDocument) -> Self {
        Self {
            id: d.id,
            title: d.title,
            content: d.content,
            created: from_bson(d.created),
            expires: from_bson(d.expires),
        }
    }
}

fn to_bson(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson(dt: bson::DateTime) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(dt.timestamp_millis())
        .single()
        .unwrap_or_default()
}

/// MongoDB 스니펫 저장소
///
/// ID는 `counters` 컬렉션의 `snippets` 시퀀스에서 발급합니다. 만료 여부는
/// 조회 쿼리의 `expires > now` 조건으로 걸러냅니다.
pub struct MongoSnippetRepository {
    db: Database,
}

impl MongoSnippetRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<SnippetDocument> {
        self.db.collection::<SnippetDocument>(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let expires_index = IndexModel::builder()
            .keys(doc! { "expires": 1 })
            .options(IndexOptions::builder().name("expires_asc".to_string()).build())
            .build();

        self.collection()
            .create_index(expires_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SnippetStore for MongoSnippetRepository {
    async fn insert(&self, title: &str, content: &str, expires_days: i64) -> AppResult<i64> {
        let id = self.db.next_sequence(COLLECTION).await?;
        let snippet = Snippet::new(id, title.to_string(), content.to_string(), expires_days);

        self.collection()
            .insert_one(SnippetDocument::from(&snippet))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> AppResult<Snippet> {
        self.collection()
            .find_one(doc! { "_id": id, "expires": { "$gt": bson::DateTime::now() } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .map(Snippet::from)
            .ok_or_else(|| AppError::NotFound(format!("snippet {}", id)))
    }

    async fn latest(&self) -> AppResult<Vec<Snippet>> {
        let cursor = self
            .collection()
            .find(doc! { "expires": { "$gt": bson::DateTime::now() } })
            .sort(doc! { "_id": -1 })
            .limit(LATEST_LIMIT as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let documents: Vec<SnippetDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(documents.into_iter().map(Snippet::from).collect())
    }
}
