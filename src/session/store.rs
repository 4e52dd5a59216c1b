use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::core::errors::AppResult;
use crate::session::data::{SessionData, SessionValue};

/// 세션 토큰 바이트 수
pub const TOKEN_BYTES: usize = 32;

/// 세션 저장소 어댑터
///
/// 토큰으로 세션 상태를 조회/저장합니다. 만료는 저장소가 강제하며, 만료된
/// 토큰에 대한 `load`는 `None`(없음)과 같습니다.
///
/// 서로 다른 토큰에 대한 동시 호출은 서로 섞이지 않아야 합니다. 같은 토큰에
/// 대한 동시 저장은 마지막 쓰기가 이깁니다.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> AppResult<Option<SessionData>>;

    async fn save(&self, token: &str, data: &SessionData) -> AppResult<()>;

    /// 데이터를 새 토큰으로 옮기고 이전 토큰을 무효화한 뒤 새 토큰을 반환합니다.
    ///
    /// 이전 토큰에 데이터가 없으면 옮길 것 없이 새 토큰만 발급합니다.
    async fn renew_token(&self, token: &str) -> AppResult<String>;

    async fn destroy(&self, token: &str) -> AppResult<()>;

    /// `key`의 값을 읽고 같은 연산 안에서 삭제합니다.
    ///
    /// 같은 세션을 쓰는 동시 요청 중 오직 하나만 값을 받습니다.
    async fn pop(&self, token: &str, key: &str) -> AppResult<Option<SessionValue>>;
}

/// 추측 불가능한 세션 토큰을 생성합니다.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
