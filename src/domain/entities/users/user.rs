use chrono::{DateTime, Utc};
use serde::Serialize;

/// 가입한 사용자
///
/// 이메일은 저장소 전체에서 유일합니다. 비밀번호는 bcrypt 해시로만 보관합니다.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created: DateTime<Utc>,
}

impl User {
    pub fn new(id: i64, name: String, email: String, hashed_password: String) -> Self {
        Self {
            id,
            name,
            email,
            hashed_password,
            created: Utc::now(),
        }
    }
}
