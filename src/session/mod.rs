//! # Session Module
//!
//! 불투명한 세션 토큰으로 식별되는 서버 측 세션 상태를 관리합니다.
//!
//! - [`store`] - 저장소 어댑터 계약 ([`SessionStore`])과 토큰 생성
//! - [`redis_store`] - Redis 어댑터 (운영)
//! - [`memory_store`] - 프로세스 내 어댑터 (개발, 테스트)
//! - [`handle`] - 요청 범위 세션 핸들 ([`Session`])
//!
//! ## 세션 생명주기
//!
//! ```text
//! 요청 ─▶ 쿠키 토큰으로 load ─▶ 핸들러가 put/pop/remove ─▶ 응답 후 commit ─▶ Set-Cookie
//!                │                                                    │
//!                └── 없음/만료 → 새 세션 (토큰은 첫 commit 때 발급)         └── 변경 없으면 생략
//! ```

pub mod data;
pub mod handle;
pub mod memory_store;
pub mod redis_store;
pub mod store;

pub use data::{AUTH_USER_ID_KEY, CSRF_SEED_KEY, FLASH_KEY, SessionData, SessionValue};
pub use handle::{CommitGuard, SESSION_COOKIE, Session, SessionConfig, SessionStatus};
pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use store::{SessionStore, generate_token};
