use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 인증된 사용자 ID (정수)
pub const AUTH_USER_ID_KEY: &str = "authenticatedUserID";
/// 한 번만 표시되는 알림 메시지 (문자열)
pub const FLASH_KEY: &str = "flash";
/// CSRF 토큰 서명용 시드 (바이트열)
pub const CSRF_SEED_KEY: &str = "csrf_seed";

/// 세션에 저장되는 값
///
/// 저장소에는 `{"t": "...", "v": ...}` 형태의 JSON으로 기록됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum SessionValue {
    Int(i64),
    Str(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

/// 세션 상태
///
/// 키-값 쌍과 절대 만료 시각을 가집니다. 만료 시각은 세션 생성 또는 토큰 갱신
/// 시점에서만 정해지며, 요청이 올 때마다 연장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub values: HashMap<String, SessionValue>,
    pub deadline: DateTime<Utc>,
}

impl SessionData {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            values: HashMap::new(),
            deadline: Utc::now() + lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.deadline <= Utc::now()
    }

    /// 만료까지 남은 시간 (초). 이미 만료되었으면 0
    pub fn remaining_secs(&self) -> u64 {
        (self.deadline - Utc::now()).num_seconds().max(0) as u64
    }
}

mod base64_bytes {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
