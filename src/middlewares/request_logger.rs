//! 요청 로깅
//!
//! 접근 로그 한 줄(주소, 요청 줄, 상태, 크기, 소요 시간)은 actix `Logger`가 info로
//! 남깁니다. 체인 안의 [`RequestLogger`]는 바깥 체인에서 요청이 어느 단계까지
//! 진행했는지 debug로 추적합니다.

use std::time::Instant;

use actix_web::Error;
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use async_trait::async_trait;
use log::debug;

use crate::middlewares::pipeline::{Interceptor, Next};

/// `ip - "GET / HTTP/1.1" 200 1024 0.001234`
pub const ACCESS_LOG_FORMAT: &str = r#"%{r}a - "%r" %s %b %T"#;

/// App에 감싸는 접근 로그 미들웨어
///
/// ```rust,ignore
/// App::new()
///     .wrap(access_log())
///     .wrap(Pipeline::outer(&state))
/// ```
pub fn access_log() -> Logger {
    Logger::new(ACCESS_LOG_FORMAT)
}

pub struct RequestLogger;

#[async_trait(?Send)]
impl Interceptor for RequestLogger {
    fn name(&self) -> &'static str {
        "request_logger"
    }

    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let method = req.method().clone();
        let uri = req.uri().clone();
        debug!("→ {:?} {} {}", req.version(), method, uri);

        let started = Instant::now();
        let res = next.run(req).await?;
        debug!(
            "← {} {} {} ({:?})",
            method,
            uri,
            res.status().as_u16(),
            started.elapsed()
        );

        Ok(res)
    }
}
