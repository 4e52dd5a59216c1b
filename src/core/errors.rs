use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::validation::BindError;

/// 애플리케이션 전역 에러 타입
///
/// 요청 파이프라인에서 발생할 수 있는 모든 실패를 하나의 열거형으로 모읍니다.
/// `actix_web::ResponseError`를 구현하므로 핸들러와 인터셉터는 에러를 직접
/// 응답에 쓰지 않고 반드시 이 타입을 통해 응답을 만듭니다.
///
/// ## 에러 카테고리
///
/// ### 1. 클라이언트 에러 (4xx)
/// - `BindError`: 폼 데이터 자체를 해석할 수 없음 (400)
/// - `BadRequest`: 잘못된 경로 파라미터 등 (400)
/// - `CsrfError`: CSRF 토큰 누락/불일치 (403)
/// - `NotFound`: 없거나 만료된 리소스 (404)
///
/// ### 2. 저장소 센티널
/// - `InvalidCredentials`: 이메일 또는 비밀번호 불일치 (핸들러가 폼 에러로 변환)
/// - `DuplicateEmail`: 이메일 유니크 제약 위반 (핸들러가 필드 에러로 변환)
///
/// ### 3. 서버 에러 (500)
/// - `DatabaseError`, `RedisError`, `SessionError`, `TemplateError`,
///   `Timeout`, `InternalError`, `ConfigError`
///
/// ## 에러 변환 패턴
///
/// ```rust,ignore
/// collection.find_one(filter).await
///     .map_err(|e| AppError::DatabaseError(e.to_string()))?;
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// 폼 바인딩 실패 (400 Bad Request)
    #[error("Bind error: {0}")]
    BindError(#[from] BindError),

    /// 잘못된 요청 (400 Bad Request)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// CSRF 검증 실패 (403 Forbidden)
    #[error("CSRF error: {0}")]
    CsrfError(String),

    /// 리소스 찾을 수 없음 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 이메일/비밀번호 불일치
    ///
    /// 어느 쪽이 틀렸는지는 절대 구분하지 않습니다.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 이미 사용 중인 이메일 (409 Conflict)
    #[error("Duplicate email")]
    DuplicateEmail,

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 세션 데이터 처리 에러 (500 Internal Server Error)
    #[error("Session error: {0}")]
    SessionError(String),

    /// 템플릿 렌더링 에러 (500 Internal Server Error)
    #[error("Template error: {0}")]
    TemplateError(String),

    /// 저장소 호출 시간 초과 (500 Internal Server Error)
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 시작 시점 설정 검증 실패
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 서버 측 실패인지 여부
    ///
    /// 서버 에러는 가장 바깥쪽 인터셉터에서 메서드/URI와 함께 한 번만 로깅됩니다.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BindError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CsrfError(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 클라이언트 에러는 상태 코드의 표준 문구만, 서버 에러는 일반 메시지만
    /// 내려보냅니다. 상세 내용은 로그(디버그 모드에서는 응답 본문)에만 남습니다.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = status.canonical_reason().unwrap_or("Error");

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
