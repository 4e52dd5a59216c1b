use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::core::errors::{AppError, AppResult};
use crate::session::data::{SessionData, SessionValue};
use crate::session::store::{SessionStore, generate_token};

/// 프로세스 내 세션 저장소 (개발/테스트용)
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<String, SessionData>>> {
        self.sessions
            .lock()
            .map_err(|_| AppError::SessionError("세션 저장소 잠금이 오염되었습니다".to_string()))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> AppResult<Option<SessionData>> {
        let mut sessions = self.lock()?;
        match sessions.get(token) {
            Some(data) if data.is_expired() => {
                sessions.remove(token);
                Ok(None)
            }
            Some(data) => Ok(Some(data.clone())),
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str, data: &SessionData) -> AppResult<()> {
        let mut sessions = self.lock()?;
        if data.is_expired() {
            sessions.remove(token);
        } else {
            sessions.insert(token.to_string(), data.clone());
        }
        Ok(())
    }

    async fn renew_token(&self, token: &str) -> AppResult<String> {
        let new_token = generate_token();
        let mut sessions = self.lock()?;
        if let Some(data) = sessions.remove(token) {
            sessions.insert(new_token.clone(), data);
        }
        Ok(new_token)
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.lock()?.remove(token);
        Ok(())
    }

    async fn pop(&self, token: &str, key: &str) -> AppResult<Option<SessionValue>> {
        let mut sessions = self.lock()?;
        Ok(sessions
            .get_mut(token)
            .filter(|data| !data.is_expired())
            .and_then(|data| data.values.remove(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::data::FLASH_KEY;
    use chrono::Duration;

    fn flashed() -> SessionData {
        let mut data = SessionData::new(Duration::hours(12));
        data.values
            .insert(FLASH_KEY.to_string(), SessionValue::Str("saved".to_string()));
        data
    }

    #[actix_web::test]
    async fn test_expired_session_loads_as_missing() {
        let store = MemorySessionStore::new();
        let mut data = flashed();
        data.deadline = chrono::Utc::now() - Duration::seconds(1);
        store.sessions.lock().unwrap().insert("t".to_string(), data);

        assert_eq!(store.load("t").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_renew_moves_data_and_invalidates_old_token() {
        let store = MemorySessionStore::new();
        store.save("old", &flashed()).await.unwrap();

        let new_token = store.renew_token("old").await.unwrap();

        assert_ne!(new_token, "old");
        assert_eq!(store.load("old").await.unwrap(), None);
        let moved = store.load(&new_token).await.unwrap().unwrap();
        assert_eq!(moved.values, flashed().values);
    }

    #[actix_web::test]
    async fn test_pop_returns_value_once() {
        let store = MemorySessionStore::new();
        store.save("t", &flashed()).await.unwrap();

        assert_eq!(
            store.pop("t", FLASH_KEY).await.unwrap(),
            Some(SessionValue::Str("saved".to_string()))
        );
        assert_eq!(store.pop("t", FLASH_KEY).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_tokens_do_not_share_state() {
        let store = MemorySessionStore::new();
        store.save("a", &flashed()).await.unwrap();
        store.save("b", &SessionData::new(Duration::hours(1))).await.unwrap();

        store.pop("a", FLASH_KEY).await.unwrap();

        assert!(store.load("b").await.unwrap().unwrap().values.is_empty());
        store.destroy("a").await.unwrap();
        assert!(store.load("b").await.unwrap().is_some());
    }
}
