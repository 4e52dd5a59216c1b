use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{
    CONTENT_SECURITY_POLICY, HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use actix_web::Error;
use async_trait::async_trait;

use crate::middlewares::pipeline::{Interceptor, Next};

pub const CONTENT_SECURITY: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

/// 모든 응답에 브라우저 보안 헤더를 붙입니다.
pub struct SecureHeaders;

#[async_trait(?Send)]
impl Interceptor for SecureHeaders {
    fn name(&self) -> &'static str {
        "secure_headers"
    }

    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let mut res = next.run(req).await?;

        let headers = res.headers_mut();
        headers.insert(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY),
        );
        headers.insert(
            REFERRER_POLICY,
            HeaderValue::from_static("origin-when-cross-origin"),
        );
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("0"));

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{self, TestRequest};
    use actix_web::{App, HttpResponse, web};

    use crate::middlewares::pipeline::Pipeline;

    #[actix_web::test]
    async fn test_headers_are_set() {
        let app = test::init_service(
            App::new()
                .wrap(Pipeline::builder().with(SecureHeaders).build())
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

        let cases = [
            ("content-security-policy", CONTENT_SECURITY),
            ("referrer-policy", "origin-when-cross-origin"),
            ("x-content-type-options", "nosniff"),
            ("x-frame-options", "deny"),
            ("x-xss-protection", "0"),
        ];
        for (name, want) in cases {
            assert_eq!(res.headers().get(name).unwrap(), want, "header {}", name);
        }
    }
}
