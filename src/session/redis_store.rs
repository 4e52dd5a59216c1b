use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::Script;
use sha2::{Digest, Sha256};

use crate::caching::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::session::data::{SessionData, SessionValue};
use crate::session::store::{SessionStore, generate_token};

/// 키를 읽고 지운 뒤 남은 데이터를 TTL 그대로 다시 기록합니다.
static POP_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local raw = redis.call('GET', KEYS[1])
if not raw then return nil end
local data = cjson.decode(raw)
if type(data['values']) ~= 'table' then return nil end
local value = data['values'][ARGV[1]]
if value == nil then return nil end
data['values'][ARGV[1]] = nil
redis.call('SET', KEYS[1], cjson.encode(data), 'KEEPTTL')
return cjson.encode(value)
"#,
    )
});

static RENAME_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  redis.call('RENAME', KEYS[1], KEYS[2])
  return 1
end
return 0
"#,
    )
});

/// Redis 기반 세션 저장소
///
/// 토큰 원문은 저장하지 않습니다. 키는 `session:<sha256(token)>`이며, TTL은
/// 세션의 남은 절대 수명과 같습니다.
pub struct RedisSessionStore {
    redis: RedisClient,
}

impl RedisSessionStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

fn session_key(token: &str) -> String {
    format!("session:{:x}", Sha256::digest(token.as_bytes()))
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> AppResult<Option<SessionData>> {
        let data: Option<SessionData> = self.redis.get(&session_key(token)).await?;
        Ok(data.filter(|d| !d.is_expired()))
    }

    async fn save(&self, token: &str, data: &SessionData) -> AppResult<()> {
        let key = session_key(token);
        match data.remaining_secs() {
            0 => self.redis.del(&key).await,
            ttl => self.redis.set_with_expiry(&key, data, ttl).await,
        }
    }

    async fn renew_token(&self, token: &str) -> AppResult<String> {
        let new_token = generate_token();
        let _moved: i64 = self
            .redis
            .eval(
                &RENAME_SCRIPT,
                &[session_key(token).as_str(), session_key(&new_token).as_str()],
                &[],
            )
            .await?;
        Ok(new_token)
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.redis.del(&session_key(token)).await
    }

    async fn pop(&self, token: &str, key: &str) -> AppResult<Option<SessionValue>> {
        let raw: Option<String> = self
            .redis
            .eval(&POP_SCRIPT, &[session_key(token).as_str()], &[key])
            .await?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::SessionError(format!("세션 값 역직렬화 실패: {}", e)))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_hides_token() {
        let key = session_key("raw-token");

        assert!(key.starts_with("session:"));
        assert!(!key.contains("raw-token"));
        assert_eq!(key.len(), "session:".len() + 64);
        assert_eq!(key, session_key("raw-token"));
    }
}
