//! # Snippet HTTP Handlers
//!
//! | 메서드 | 경로 | 체인 | 설명 |
//! |--------|------|------|------|
//! | `GET` | `/` | dynamic | 최근 스니펫 목록 |
//! | `GET` | `/snippet/view/{id}` | dynamic | 스니펫 조회 (없거나 만료 시 404) |
//! | `GET` | `/snippet/create` | protected | 작성 폼 |
//! | `POST` | `/snippet/create` | protected | 작성 → 303 `/snippet/view/{id}` |

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use log::info;

use crate::core::deadline::with_deadline;
use crate::core::errors::{AppError, AppResult};
use crate::core::state::AppState;
use crate::domain::dto::SnippetCreateForm;
use crate::domain::models::RequestIdentity;
use crate::handlers::helpers::{redirect, render, template_data};
use crate::session::{FLASH_KEY, Session};
use crate::validation::PostForm;

pub async fn home(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
) -> AppResult<HttpResponse> {
    let snippets = with_deadline(
        state.settings.store_timeout,
        "snippet latest",
        state.snippets.latest(),
    )
    .await?;

    let mut data = template_data(&session, identity).await?;
    data.snippets = snippets;
    render(&state, StatusCode::OK, "home", &data)
}

/// 스니펫 조회
///
/// ID가 양의 정수가 아니면 400, 저장소에 없거나 만료되었으면 404입니다.
pub async fn snippet_view(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let snippet = with_deadline(
        state.settings.store_timeout,
        "snippet get",
        state.snippets.get(id),
    )
    .await?;

    let mut data = template_data(&session, identity).await?;
    data.snippet = Some(snippet);
    render(&state, StatusCode::OK, "view", &data)
}

pub async fn snippet_create(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
) -> AppResult<HttpResponse> {
    let data = template_data(&session, identity)
        .await?
        .with_form(&SnippetCreateForm::default())?;
    render(&state, StatusCode::OK, "create", &data)
}

/// 스니펫 작성
///
/// 검증에 실패하면 입력값과 에러를 담아 422로 폼을 다시 보여주고, 저장소는
/// 호출하지 않습니다.
pub async fn snippet_create_post(
    state: web::Data<AppState>,
    session: Session,
    identity: RequestIdentity,
    form: PostForm<SnippetCreateForm>,
) -> AppResult<HttpResponse> {
    let mut form = form.into_inner();

    if !form.validate() {
        let data = template_data(&session, identity).await?.with_form(&form)?;
        return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "create", &data);
    }

    let id = with_deadline(
        state.settings.store_timeout,
        "snippet insert",
        state.snippets.insert(&form.title, &form.content, form.expires),
    )
    .await?;
    info!("📝 스니펫 생성: ID {}", id);

    session.put(FLASH_KEY, "Snippet successfully created!");
    Ok(redirect(&format!("/snippet/view/{}", id)))
}

fn parse_id(raw: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::BadRequest(format!("invalid snippet id: {}", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let cases = [
            ("1", true),
            ("42", true),
            ("0", false),
            ("-3", false),
            ("1.5", false),
            ("abc", false),
            ("", false),
        ];

        for (raw, ok) in cases {
            assert_eq!(parse_id(raw).is_ok(), ok, "id {:?}", raw);
        }
    }
}
