//! # Data & Server Configuration
//!
//! 실행 환경, 서버 바인딩, 비밀번호 해싱 비용, 저장소 백엔드 설정을 환경 변수에서
//! 읽습니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! ENVIRONMENT=production        # development, test, staging, production
//! HOST=0.0.0.0
//! PORT=4000
//! WORKERS=4
//! BCRYPT_COST=12                # 4-15 범위
//! STORAGE_BACKEND=mongo         # mongo | memory
//! MONGODB_URI=mongodb://localhost:27017
//! DATABASE_NAME=snippetbox
//! REDIS_URL=redis://localhost:6379
//! ```

use std::env;

/// 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수에서 현재 환경을 결정합니다. 기본값은 `Production`
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// 비밀번호 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST`가 4..=15 범위의 숫자면 그 값을, 아니면 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost(env: &Environment) -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return cost;
                }
            }
        }

        Self::bcrypt_cost_for_env(env)
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn workers() -> usize {
        env::var("WORKERS")
            .ok()
            .and_then(|w| w.parse().ok())
            .filter(|w| *w > 0)
            .unwrap_or(4)
    }
}

/// 스니펫/사용자/세션 저장소 선택
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// MongoDB(스니펫, 사용자) + Redis(세션)
    Mongo {
        mongodb_uri: String,
        database_name: String,
        redis_url: String,
    },
    /// 프로세스 내 저장소
    Memory,
}

impl StorageBackend {
    pub fn from_env() -> Self {
        match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "mongo".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::Mongo {
                mongodb_uri: env::var("MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                database_name: env::var("DATABASE_NAME")
                    .unwrap_or_else(|_| "snippetbox".to_string()),
                redis_url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Mongo { .. } => "mongo",
            StorageBackend::Memory => "memory",
        }
    }
}
