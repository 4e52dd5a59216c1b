//! # User HTTP Handlers
//!
//! 회원 가입, 로그인, 로그아웃을 처리합니다.
//!
//! | 메서드 | 경로 | 체인 | 성공 시 |
//! |--------|------|------|---------|
//! | `GET` | `/user/signup` | dynamic | 200 폼 |
//! | `POST` | `/user/signup` | dynamic | 303 `/user/login` + 플래시 |
//! | `GET` | `/user/login` | dynamic | 200 폼 |
//! | `POST` | `/user/login` | dynamic | 303 `/snippet/create` |
//! | `POST` | `/user/logout` | protected | 303 `/` + 플래시 |
//!
//! ## 세션 고정 방지
//!
//! 인증 상태가 바뀌는 로그인과 로그아웃은 세션 값을 바꾸기 전에 반드시
//! [`Session::renew_token`]을 호출합니다. 이전 토큰은 무효화되고 CSRF 시드도
//! 새로 만들어집니다.
//!
//! ## 에러 처리 패턴
//!
//! 저장소가 돌려주는 `DuplicateEmail`과 `InvalidCredentials`는 클라이언트에 그대로
//! 나가지 않고 폼 에러로 바뀌어 422로 다시 렌더링됩니다. 나머지 에러는 그대로
//! 전파되어 500이 됩니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use log::info;

use crate::core::deadline::with_deadline;
use crate::core::errors::{AppError, AppResult};
use crate::core::state::AppState;
use crate::domain::dto::{INVALID_CREDENTIALS, LoginForm, SignupForm};
use crate::domain::models::RequestIdentity;
use crate::handlers::helpers::{redirect, render, template_data};
use crate::middlewares::LOGIN_PATH;
use crate::session::{AUTH_USER_ID_KEY, FLASH_KEY, Session};
use crate::validation::{PostForm, Validated};

pub async fn signup(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
) -> AppResult<HttpResponse> {
    let data = template_data(&session, identity)
        .await?
        .with_form(&SignupForm::default())?;
    render(&state, StatusCode::OK, "signup", &data)
}

pub async fn signup_post(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
    form: PostForm<SignupForm>,
) -> AppResult<HttpResponse> {
    let mut form = form.into_inner();

    if form.validate() {
        let inserted = with_deadline(
            state.settings.store_timeout,
            "user insert",
            state.users.insert(&form.name, &form.email, &form.password),
        )
        .await;

        match inserted {
            Ok(()) => {
                info!("👤 회원 가입: {}", form.email);
                session.put(FLASH_KEY, "Your signup was successful. Please log in.");
                return Ok(redirect(LOGIN_PATH));
            }
            Err(AppError::DuplicateEmail) => {
                form.add_field_error("email", "Email address is already in use");
            }
            Err(e) => return Err(e),
        }
    }

    let data = template_data(&session, identity).await?.with_form(&form)?;
    render(&state, StatusCode::UNPROCESSABLE_ENTITY, "signup", &data)
}

pub async fn login(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
) -> AppResult<HttpResponse> {
    let data = template_data(&session, identity)
        .await?
        .with_form(&LoginForm::default())?;
    render(&state, StatusCode::OK, "login", &data)
}

/// 로그인
///
/// 없는 이메일과 틀린 비밀번호는 같은 폼 수준 에러 하나로 보고됩니다.
pub async fn login_post(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
    form: PostForm<LoginForm>,
) -> AppResult<HttpResponse> {
    let mut form = form.into_inner();

    if form.validate() {
        let authenticated = with_deadline(
            state.settings.store_timeout,
            "user authenticate",
            state.users.authenticate(&form.email, &form.password),
        )
        .await;

        match authenticated {
            Ok(user_id) => {
                session.renew_token().await?;
                session.put(AUTH_USER_ID_KEY, user_id);
                info!("🔑 로그인 성공: 사용자 ID {}", user_id);
                return Ok(redirect("/snippet/create"));
            }
            Err(AppError::InvalidCredentials) => {
                form.add_non_field_error(INVALID_CREDENTIALS);
            }
            Err(e) => return Err(e),
        }
    }

    let data = template_data(&session, identity).await?.with_form(&form)?;
    render(&state, StatusCode::UNPROCESSABLE_ENTITY, "login", &data)
}

pub async fn logout(session: Session) -> AppResult<HttpResponse> {
    session.renew_token().await?;
    session.remove(AUTH_USER_ID_KEY);
    session.put(FLASH_KEY, "You've been logged out successfully!");

    Ok(redirect("/"))
}
