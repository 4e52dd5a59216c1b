//! Pipeline 미들웨어의 실행 부분
use std::rc::Rc;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, forward_ready};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;

use crate::middlewares::pipeline::Interceptor;

type Endpoint =
    Rc<dyn Fn(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<BoxBody>, Error>>>;

/// 체인의 나머지 단계
///
/// 마지막 인터셉터 뒤에는 감싸고 있는 서비스(라우트/핸들러)가 옵니다.
pub struct Next {
    chain: Rc<[Rc<dyn Interceptor>]>,
    position: usize,
    endpoint: Endpoint,
}

impl Next {
    /// 다음 인터셉터를, 남은 인터셉터가 없으면 감싼 서비스를 호출합니다.
    pub async fn run(self, req: ServiceRequest) -> Result<ServiceResponse<BoxBody>, Error> {
        match self.chain.get(self.position).cloned() {
            Some(interceptor) => {
                let next = Next {
                    chain: self.chain,
                    position: self.position + 1,
                    endpoint: self.endpoint,
                };
                interceptor.handle(req, next).await
            }
            None => (self.endpoint)(req).await,
        }
    }
}

/// 인터셉터 체인을 실행하는 서비스
pub struct PipelineService<S> {
    service: Rc<S>,
    chain: Rc<[Rc<dyn Interceptor>]>,
    endpoint: Endpoint,
}

impl<S, B> PipelineService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    pub fn new(service: Rc<S>, chain: Rc<[Rc<dyn Interceptor>]>) -> Self {
        let inner = service.clone();
        let endpoint: Endpoint = Rc::new(move |req| {
            let fut = inner.call(req);
            Box::pin(async move { fut.await.map(ServiceResponse::map_into_boxed_body) })
        });

        Self {
            service,
            chain,
            endpoint,
        }
    }
}

impl<S, B> Service<ServiceRequest> for PipelineService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let next = Next {
            chain: self.chain.clone(),
            position: 0,
            endpoint: self.endpoint.clone(),
        };

        Box::pin(next.run(req))
    }
}
