//! 가장 바깥 단계: 패닉 복구와 서버 에러 보고
//!
//! 하위 단계 어디서 패닉이 나도 연결을 닫는 500 응답으로 바꿉니다. 서버 에러(5xx)를
//! 담은 응답은 여기서 메서드/URI, 에러, 백트레이스와 함께 한 번만 로깅됩니다.

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::AssertUnwindSafe;

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use actix_web::{Error, HttpResponse, ResponseError};
use async_trait::async_trait;
use futures_util::FutureExt;
use log::error;

use crate::middlewares::pipeline::{Interceptor, Next};

const GENERIC_BODY: &str = "Internal Server Error";

pub struct RecoverPanic {
    /// 응답 본문에 에러와 백트레이스를 그대로 싣는지 여부
    debug: bool,
}

impl RecoverPanic {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn report(&self, res: ServiceResponse<BoxBody>) -> ServiceResponse<BoxBody> {
        if !res.status().is_server_error() {
            return res;
        }
        let Some(detail) = res.response().error().map(|e| e.to_string()) else {
            return res;
        };

        let trace = Backtrace::force_capture();
        error!(
            "❌ {} {} - {}\n{}",
            res.request().method(),
            res.request().uri(),
            detail,
            trace
        );

        if !self.debug {
            return res;
        }
        let body = format!("{}\n{}", detail, trace);
        res.map_body(|head, _| {
            head.headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            BoxBody::new(body)
        })
    }
}

#[async_trait(?Send)]
impl Interceptor for RecoverPanic {
    fn name(&self) -> &'static str {
        "recover_panic"
    }

    /// 라우팅 전에 실행되므로 `HttpRequest`를 복제해 두지 않습니다. 라우터는
    /// 요청을 단독으로 소유해야 매칭 정보를 기록할 수 있습니다.
    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        match AssertUnwindSafe(next.run(req)).catch_unwind().await {
            Ok(Ok(res)) => Ok(self.report(res)),
            Ok(Err(e)) => {
                if e.as_response_error().status_code().is_server_error() {
                    error!("❌ {} {} - {}\n{}", method, uri, e, Backtrace::force_capture());
                }
                Err(e)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let trace = Backtrace::force_capture();
                error!("💥 패닉 복구: {} {} - {}\n{}", method, uri, message, trace);

                let body = if self.debug {
                    format!("{}\n{}", message, trace)
                } else {
                    GENERIC_BODY.to_string()
                };
                Err(RecoveredPanic { body }.into())
            }
        }
    }
}

/// 복구된 패닉. 연결을 닫는 500 응답으로 바뀝니다.
#[derive(Debug)]
struct RecoveredPanic {
    body: String,
}

impl fmt::Display for RecoveredPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("recovered from panic")
    }
}

impl ResponseError for RecoveredPanic {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError()
            .force_close()
            .content_type("text/plain; charset=utf-8")
            .body(self.body.clone())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
