//! 저장소 호출 시간 제한
//!
//! 파이프라인은 재시도를 하지 않습니다. 시간 안에 끝나지 않은 저장소 호출은
//! `AppError::Timeout`으로 한 번만 보고됩니다.

use std::future::Future;
use std::time::Duration;

use actix_web::rt::time::timeout;

use crate::core::errors::{AppError, AppResult};

/// `limit` 안에 `fut`가 끝나지 않으면 `AppError::Timeout`을 반환합니다.
///
/// # Examples
///
/// ```rust,ignore
/// let exists = with_deadline(settings.store_timeout, "user exists", users.exists(id)).await?;
/// ```
pub async fn with_deadline<T, F>(limit: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{} 호출이 {}ms 안에 끝나지 않았습니다",
            operation,
            limit.as_millis()
        ))),
    }
}
