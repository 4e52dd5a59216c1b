//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인을 구성하는 인터셉터들을 제공합니다. 각 인터셉터는
//! [`Interceptor`] 트레이트를 구현하고, [`Pipeline`]이 정해진 순서대로 묶어
//! 하나의 ActixWeb 미들웨어로 감쌉니다.
//!
//! # 체인 구성
//!
//! ```text
//! outer (App 전체)
//! ├── recover_panic    패닉 → 500 + 연결 종료, 서버 에러 로깅
//! ├── request_logger   단계 진행/지연 시간 (debug)
//! └── secure_headers   CSP, Referrer-Policy, nosniff, X-Frame-Options ...
//!
//! access_log (App, outer 안쪽)  actix Logger 접근 로그 (info)
//!
//! dynamic (세션을 쓰는 페이지)
//! ├── session          세션 로드, 응답 후 커밋 + Set-Cookie
//! ├── csrf             상태 변경 메서드의 토큰 검증 (실패 시 403)
//! └── auth_context     RequestIdentity 주입
//!
//! protected = dynamic + require_auth (익명이면 /user/login으로 303)
//! ```
//!
//! 순서가 곧 보장입니다. CSRF는 어떤 핸들러보다 먼저, 인증 컨텍스트는 게이트보다
//! 먼저 실행되며, 패닉 복구는 나머지 전부를 감쌉니다.
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(access_log())
//!     .wrap(Pipeline::outer(&state))
//!     .service(
//!         web::resource("/")
//!             .route(web::get().to(snippets::home))
//!             .wrap(Pipeline::dynamic(&state)),
//!     )
//!     .service(
//!         web::resource("/user/logout")
//!             .route(web::post().to(users::logout))
//!             .wrap(Pipeline::protected(&state)),
//!     )
//! ```

pub mod auth_context;
pub mod csrf;
pub mod pipeline;
mod pipeline_inner;
pub mod recover_panic;
pub mod request_logger;
pub mod require_auth;
pub mod secure_headers;
pub mod session_layer;

// 미들웨어 재export
pub use csrf::{CSRF_FIELD, CSRF_HEADER, token_for};
pub use pipeline::{Interceptor, Next, Pipeline, PipelineBuilder};
pub use request_logger::access_log;
pub use require_auth::LOGIN_PATH;
