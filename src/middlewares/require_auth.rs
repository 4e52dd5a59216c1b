use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{CACHE_CONTROL, HeaderValue, LOCATION};
use actix_web::{Error, HttpMessage, HttpResponse};
use async_trait::async_trait;
use log::debug;

use crate::domain::models::RequestIdentity;
use crate::middlewares::pipeline::{Interceptor, Next};

/// 로그인 진입점. 원래 요청한 경로는 보존하지 않습니다.
pub const LOGIN_PATH: &str = "/user/login";

/// 인증 게이트
///
/// 익명 요청은 핸들러를 호출하지 않고 로그인 페이지로 보냅니다. 통과한 응답과
/// 리다이렉트 모두 브라우저 캐시에 남지 않도록 `Cache-Control: no-store`를 붙입니다.
pub struct RequireAuth;

#[async_trait(?Send)]
impl Interceptor for RequireAuth {
    fn name(&self) -> &'static str {
        "require_auth"
    }

    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let identity = req
            .extensions()
            .get::<RequestIdentity>()
            .copied()
            .unwrap_or_default();

        if !identity.is_authenticated() {
            debug!("인증 필요: {} → {}", req.uri(), LOGIN_PATH);
            let response = HttpResponse::SeeOther()
                .insert_header((LOCATION, LOGIN_PATH))
                .insert_header((CACHE_CONTROL, "no-store"))
                .finish();
            return Ok(req.into_response(response));
        }

        let mut res = next.run(req).await?;
        res.headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        Ok(res)
    }
}
