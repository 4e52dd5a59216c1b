//! 핸들러 공용 응답 도우미
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;

use crate::core::errors::AppResult;
use crate::core::state::AppState;
use crate::domain::models::RequestIdentity;
use crate::middlewares::token_for;
use crate::session::{FLASH_KEY, Session};
use crate::views::TemplateData;

/// 모든 페이지가 공통으로 쓰는 템플릿 데이터
///
/// 플래시 메시지는 여기서 꺼내는 순간 세션에서 삭제되므로 한 번만 표시됩니다.
pub async fn template_data(
    session: &Session,
    identity: RequestIdentity,
) -> AppResult<TemplateData> {
    let flash = session.pop_string(FLASH_KEY).await?;

    Ok(TemplateData::new(
        flash,
        identity.is_authenticated(),
        token_for(session),
    ))
}

/// 페이지를 끝까지 렌더링한 뒤 응답을 만듭니다.
pub fn render(
    state: &AppState,
    status: StatusCode,
    page: &str,
    data: &TemplateData,
) -> AppResult<HttpResponse> {
    let html = state.templates.render(page, data)?;

    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// 상태 변경 후 조회 페이지로 보내는 303 응답
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}
