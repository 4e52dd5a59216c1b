//! 요청 인증 상태 결정
use std::sync::Arc;
use std::time::Duration;

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use async_trait::async_trait;
use log::{debug, warn};

use crate::core::deadline::with_deadline;
use crate::domain::models::RequestIdentity;
use crate::middlewares::pipeline::{Interceptor, Next};
use crate::middlewares::session_layer::session_of;
use crate::repositories::UserStore;
use crate::session::AUTH_USER_ID_KEY;

/// 세션의 사용자 표시와 사용자 존재 여부로 [`RequestIdentity`]를 만들어 요청 확장에 넣습니다.
///
/// - 표시 없음 → 익명
/// - 표시 있음, 사용자 존재 → 인증됨
/// - 표시 있음, 사용자 없음 → 익명, 세션에서 표시 제거
/// - 저장소 실패 → 500
pub struct AuthContext {
    users: Arc<dyn UserStore>,
    store_timeout: Duration,
}

impl AuthContext {
    pub fn new(users: Arc<dyn UserStore>, store_timeout: Duration) -> Self {
        Self {
            users,
            store_timeout,
        }
    }
}

#[async_trait(?Send)]
impl Interceptor for AuthContext {
    fn name(&self) -> &'static str {
        "auth_context"
    }

    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let session = match session_of(&req) {
            Ok(session) => session,
            Err(e) => return Ok(req.error_response(e)),
        };

        let identity = match session.get_int(AUTH_USER_ID_KEY) {
            None => RequestIdentity::anonymous(),
            Some(user_id) => {
                let exists = with_deadline(
                    self.store_timeout,
                    "user exists",
                    self.users.exists(user_id),
                )
                .await;
                match exists {
                    Ok(true) => {
                        debug!("인증된 요청: 사용자 ID {}", user_id);
                        RequestIdentity::authenticated(user_id)
                    }
                    Ok(false) => {
                        warn!("⚠️ 세션의 사용자 {}가 존재하지 않아 인증 표시를 제거합니다", user_id);
                        session.remove(AUTH_USER_ID_KEY);
                        RequestIdentity::anonymous()
                    }
                    Err(e) => return Ok(req.error_response(e)),
                }
            }
        };

        req.extensions_mut().insert(identity);
        next.run(req).await
    }
}
