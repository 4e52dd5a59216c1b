//! # Application Settings
//!
//! 시작 시 한 번 만들어지는 불변 설정 묶음입니다. 모든 컴포넌트는 전역 상태 대신
//! [`AppState`](crate::core::state::AppState)를 통해 이 값을 전달받습니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! DEBUG=true                    # 서버 에러 응답에 상세 내용 출력
//! SESSION_LIFETIME_HOURS=12     # 세션 절대 수명
//! SESSION_COOKIE_SECURE=true    # 기본값: development 외 환경에서 true
//! STORE_TIMEOUT_MS=3000         # 저장소 호출 시간 제한
//! ```

use std::env;
use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::config::data_config::{Environment, PasswordConfig, StorageBackend};
use crate::core::errors::{AppError, AppResult};
use crate::session::SessionConfig;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub environment: Environment,
    pub debug: bool,
    pub session_lifetime: Duration,
    pub cookie_secure: bool,
    pub store_timeout: StdDuration,
    pub bcrypt_cost: u32,
    pub storage: StorageBackend,
}

impl AppSettings {
    /// 환경 변수에서 설정을 읽습니다.
    ///
    /// 값이 있는데 해석할 수 없으면 기본값으로 넘어가지 않고 `ConfigError`를
    /// 반환합니다.
    pub fn from_env() -> AppResult<Self> {
        let environment = Environment::current();

        let debug = parse_var::<bool>("DEBUG")?.unwrap_or(environment.is_development());
        let lifetime_hours = parse_var::<i64>("SESSION_LIFETIME_HOURS")?.unwrap_or(12);
        if lifetime_hours <= 0 {
            return Err(AppError::ConfigError(
                "SESSION_LIFETIME_HOURS는 1 이상이어야 합니다".to_string(),
            ));
        }
        let cookie_secure =
            parse_var::<bool>("SESSION_COOKIE_SECURE")?.unwrap_or(!environment.is_development());
        let store_timeout_ms = parse_var::<u64>("STORE_TIMEOUT_MS")?.unwrap_or(3000);

        Ok(Self {
            debug,
            session_lifetime: Duration::hours(lifetime_hours),
            cookie_secure,
            store_timeout: StdDuration::from_millis(store_timeout_ms),
            bcrypt_cost: PasswordConfig::bcrypt_cost(&environment),
            storage: StorageBackend::from_env(),
            environment,
        })
    }

    /// 메모리 저장소를 쓰는 테스트용 설정
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Test,
            debug: false,
            session_lifetime: Duration::hours(12),
            cookie_secure: true,
            store_timeout: StdDuration::from_secs(3),
            bcrypt_cost: PasswordConfig::bcrypt_cost_for_env(&Environment::Test),
            storage: StorageBackend::Memory,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            lifetime: self.session_lifetime,
            cookie_secure: self.cookie_secure,
            store_timeout: self.store_timeout,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> AppResult<Option<T>> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::ConfigError(format!("{}={} 값을 해석할 수 없습니다", name, raw))),
        _ => Ok(None),
    }
}
