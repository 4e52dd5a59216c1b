use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

/// 요청 범위 인증 상태
///
/// 인증 컨텍스트 인터셉터가 요청마다 한 번 만들어 요청 확장에 넣습니다.
/// 필드는 비공개이고 생성 후 바뀌지 않으므로, 하위 컴포넌트는 읽기만 할 수
/// 있습니다. 저장되지 않습니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// pub async fn home(identity: RequestIdentity) -> AppResult<HttpResponse> {
///     if identity.is_authenticated() {
///         log::debug!("user {:?}", identity.user_id());
///     }
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestIdentity {
    user_id: Option<i64>,
}

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}

/// 인증 컨텍스트가 설치되지 않은 경로에서는 익명으로 취급합니다.
impl FromRequest for RequestIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(req
            .extensions()
            .get::<RequestIdentity>()
            .copied()
            .unwrap_or_default()))
    }
}
