//! # Configuration Module
//!
//! 환경 변수 기반 설정을 관리합니다. `.env.dev` / `.env.prod` / `.env` 파일은
//! `PROFILE`에 따라 `main`에서 먼저 로드됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, bcrypt 비용, 저장소 백엔드
//! - [`app_settings`] - 시작 시 한 번 만드는 불변 설정 묶음 ([`AppSettings`])
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{AppSettings, ServerConfig};
//!
//! let settings = AppSettings::from_env()?;
//! let bind = (ServerConfig::host(), ServerConfig::port());
//! ```

pub mod app_settings;
pub mod data_config;

pub use app_settings::AppSettings;
pub use data_config::*;
