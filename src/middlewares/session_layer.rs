//! 세션 로드/저장 단계
//!
//! 디스패치 전에 쿠키의 토큰으로 세션을 불러와 요청 확장에 넣고, 응답이 만들어진
//! 뒤 변경 내용을 커밋해 쿠키를 붙입니다. 하위 단계가 패닉하거나 요청이
//! 취소되어도 [`CommitGuard`]가 커밋을 마무리합니다.

use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use async_trait::async_trait;

use crate::core::errors::AppError;
use crate::middlewares::pipeline::{Interceptor, Next};
use crate::session::{CommitGuard, SESSION_COOKIE, Session, SessionConfig, SessionStore};

pub struct SessionLayer {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionLayer {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }
}

/// 세션 단계 뒤에서 실행되는 인터셉터가 현재 세션을 꺼낼 때 사용합니다.
pub fn session_of(req: &ServiceRequest) -> Result<Session, AppError> {
    req.extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::SessionError("세션 계층보다 앞에서 호출되었습니다".to_string()))
}

#[async_trait(?Send)]
impl Interceptor for SessionLayer {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
        let session = match Session::load(self.store.clone(), self.config.clone(), token).await {
            Ok(session) => session,
            Err(e) => return Ok(req.error_response(e)),
        };
        req.extensions_mut().insert(session.clone());

        let guard = CommitGuard::new(session.clone());
        let mut res = next.run(req).await?;
        guard.disarm();

        match session.commit().await {
            Ok(Some(cookie)) => {
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    return Ok(res.error_response(AppError::SessionError(e.to_string())));
                }
            }
            Ok(None) => {}
            Err(e) => return Ok(res.error_response(e)),
        }

        Ok(res)
    }
}
