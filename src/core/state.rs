//! 애플리케이션 의존성 묶음
//!
//! 시작 시 한 번 만들어 `web::Data`로 공유합니다. 핸들러와 인터셉터는 전역 상태에
//! 접근하지 않고 이 값만 받습니다.

use std::sync::Arc;

use log::info;

use crate::caching::RedisClient;
use crate::config::{AppSettings, StorageBackend};
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::repositories::{
    MemorySnippetRepository, MemoryUserRepository, MongoSnippetRepository, MongoUserRepository,
    SnippetStore, UserStore,
};
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::views::TemplateEngine;

#[derive(Clone)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub templates: Arc<TemplateEngine>,
    pub settings: Arc<AppSettings>,
}

impl AppState {
    /// 설정된 저장소 백엔드에 연결하고 상태를 만듭니다.
    pub async fn connect(settings: AppSettings) -> AppResult<Self> {
        match settings.storage.clone() {
            StorageBackend::Memory => {
                info!("💾 메모리 저장소 사용");
                Self::in_memory(settings)
            }
            StorageBackend::Mongo {
                mongodb_uri,
                database_name,
                redis_url,
            } => {
                info!("📡 데이터베이스 연결 중...");
                let database = Database::connect(&mongodb_uri, &database_name).await?;
                let redis = RedisClient::new(&redis_url).await?;

                let snippets = MongoSnippetRepository::new(database.clone());
                snippets.create_indexes().await?;
                let users = MongoUserRepository::new(database, settings.bcrypt_cost);
                users.create_indexes().await?;

                Ok(Self {
                    snippets: Arc::new(snippets),
                    users: Arc::new(users),
                    sessions: Arc::new(RedisSessionStore::new(redis)),
                    templates: Arc::new(TemplateEngine::new()?),
                    settings: Arc::new(settings),
                })
            }
        }
    }

    /// 모든 저장소를 프로세스 내 구현으로 채운 상태
    pub fn in_memory(settings: AppSettings) -> AppResult<Self> {
        Ok(Self {
            snippets: Arc::new(MemorySnippetRepository::new()),
            users: Arc::new(MemoryUserRepository::new(settings.bcrypt_cost)),
            sessions: Arc::new(MemorySessionStore::new()),
            templates: Arc::new(TemplateEngine::new()?),
            settings: Arc::new(settings),
        })
    }
}
