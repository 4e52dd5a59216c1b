//! 인터셉터 파이프라인
//!
//! 순서가 고정된 인터셉터 목록을 하나의 ActixWeb 미들웨어로 감쌉니다. 각
//! 인터셉터는 [`Interceptor::handle`]에서 요청과 [`Next`]를 받아 다음 단계를
//! 직접 호출하거나, 호출하지 않고 응답을 만들어 체인을 끊습니다.
//!
//! 세 가지 체인이 있습니다.
//!
//! - outer: 패닉 복구 → 요청 로깅 → 보안 헤더 (모든 경로)
//! - dynamic: 세션 → CSRF → 인증 컨텍스트 (세션을 쓰는 페이지)
//! - protected: dynamic + 인증 게이트

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use async_trait::async_trait;

use crate::core::state::AppState;
use crate::middlewares::auth_context::AuthContext;
use crate::middlewares::csrf::CsrfGuard;
use crate::middlewares::pipeline_inner::PipelineService;
use crate::middlewares::recover_panic::RecoverPanic;
use crate::middlewares::request_logger::RequestLogger;
use crate::middlewares::require_auth::RequireAuth;
use crate::middlewares::secure_headers::SecureHeaders;
use crate::middlewares::session_layer::SessionLayer;

pub use crate::middlewares::pipeline_inner::Next;

/// 파이프라인의 한 단계
///
/// 인터셉터는 `Err`를 반환하지 않습니다. 실패는 `req.error_response(AppError)`로
/// 응답을 만들어 반환하고, 그 응답은 가장 바깥 단계에서 한 번 로깅됩니다.
#[async_trait(?Send)]
pub trait Interceptor {
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error>;
}

/// 인터셉터 목록을 순서대로 쌓는 빌더
#[derive(Default)]
pub struct PipelineBuilder {
    chain: Vec<Rc<dyn Interceptor>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 체인 끝에 인터셉터를 추가합니다.
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.chain.push(Rc::new(interceptor));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            chain: self.chain.into(),
        }
    }
}

/// 인터셉터 체인 미들웨어
///
/// `Rc`를 담고 있으므로 `HttpServer::new` 팩토리 안에서(워커마다) 만듭니다.
///
/// ```rust,ignore
/// App::new()
///     .wrap(Pipeline::outer(&state))
///     .service(
///         web::resource("/snippet/create")
///             .route(web::get().to(snippets::snippet_create))
///             .wrap(Pipeline::protected(&state)),
///     )
/// ```
#[derive(Clone)]
pub struct Pipeline {
    chain: Rc<[Rc<dyn Interceptor>]>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// 모든 경로에 적용되는 바깥 체인
    pub fn outer(state: &AppState) -> Self {
        Self::builder()
            .with(RecoverPanic::new(state.settings.debug))
            .with(RequestLogger)
            .with(SecureHeaders)
            .build()
    }

    /// 세션을 쓰는 공개 페이지 체인
    pub fn dynamic(state: &AppState) -> Self {
        Self::dynamic_builder(state).build()
    }

    /// 인증이 필요한 페이지 체인
    pub fn protected(state: &AppState) -> Self {
        Self::dynamic_builder(state).with(RequireAuth).build()
    }

    fn dynamic_builder(state: &AppState) -> PipelineBuilder {
        Self::builder()
            .with(SessionLayer::new(
                state.sessions.clone(),
                state.settings.session_config(),
            ))
            .with(CsrfGuard)
            .with(AuthContext::new(
                state.users.clone(),
                state.settings.store_timeout,
            ))
    }

    /// 실행 순서대로의 인터셉터 이름
    pub fn names(&self) -> Vec<&'static str> {
        self.chain.iter().map(|i| i.name()).collect()
    }
}

impl<S, B> Transform<S, ServiceRequest> for Pipeline
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = PipelineService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PipelineService::new(Rc::new(service), self.chain.clone())))
    }
}
