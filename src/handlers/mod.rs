//! # HTTP Request Handlers Module
//!
//! HTML 페이지를 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Browser
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Pipeline (middlewares) - 세션, CSRF, 인증
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - 폼 바인딩/검증, 렌더링     ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - SnippetStore, UserStore        ← Repository Layer
//! ├─────────────────────────────────────────────┤
//!   Entities/DTOs - 도메인 모델                    ← Domain Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 핸들러 규칙
//!
//! - 의존성은 `web::Data<AppState>`, [`Session`](crate::session::Session),
//!   [`RequestIdentity`](crate::domain::models::RequestIdentity) 추출기로만 받습니다.
//! - 실패는 `AppResult`의 `Err`로 반환합니다. 상태 코드와 본문은
//!   [`AppError`](crate::core::AppError)의 `ResponseError` 구현이 한 번만 만듭니다.
//! - 상태를 바꾸는 POST는 성공 시 303으로 조회 페이지에 보냅니다 (post-redirect-get).
//! - 검증 실패는 입력값과 에러를 담아 같은 폼을 422로 다시 렌더링합니다.
//!
//! ```rust,ignore
//! pub async fn snippet_create_post(
//!     state: web::Data<AppState>,
//!     session: Session,
//!     identity: RequestIdentity,
//!     form: PostForm<SnippetCreateForm>,
//! ) -> AppResult<HttpResponse> {
//!     let mut form = form.into_inner();
//!     if !form.validate() {
//!         let data = template_data(&session, identity).await?.with_form(&form)?;
//!         return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "create", &data);
//!     }
//!     ...
//! }
//! ```

pub mod helpers;
pub mod snippets;
pub mod users;
