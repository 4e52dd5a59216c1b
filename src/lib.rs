//! Snippetbox 백엔드
//!
//! 익명 방문자는 유효 기간이 있는 짧은 텍스트 스니펫을 둘러보고, 가입한 사용자는
//! 새 스니펫을 작성하는 웹 서비스입니다.
//!
//! # Features
//!
//! - **세션 인증**: 서버 측 세션, 로그인/로그아웃 시 토큰 갱신 (세션 고정 방지)
//! - **CSRF 보호**: 세션 시드로 검증하는 요청별 마스킹 토큰
//! - **플래시 메시지**: 원자적 pop으로 정확히 한 번만 표시
//! - **폼 바인딩/검증**: 바인딩 실패(400)와 검증 실패(422)를 구분
//! - **MongoDB**: 스니펫/사용자 영구 저장
//! - **Redis**: 세션 저장소
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Pipeline       │ ← 패닉 복구, 로깅, 보안 헤더, 세션, CSRF, 인증
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 폼 바인딩/검증, 템플릿 렌더링
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← SnippetStore, UserStore
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소 (또는 메모리)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use snippetbox_backend::config::AppSettings;
//! use snippetbox_backend::core::AppState;
//!
//! let settings = AppSettings::from_env()?;
//! let state = AppState::connect(settings).await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod utils;
pub mod validation;
pub mod views;
