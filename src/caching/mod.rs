//! # Caching Module
//!
//! Redis 접근 계층. 세션 저장소 어댑터가 이 모듈을 통해서만 Redis를 사용합니다.

pub mod redis;

pub use self::redis::RedisClient;
