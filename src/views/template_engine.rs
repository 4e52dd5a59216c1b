//! HTML 템플릿 엔진
//!
//! Handlebars 템플릿은 `include_str!`로 바이너리에 포함됩니다. 페이지 템플릿은
//! `title`/`main` 인라인 파셜을 정의하고 `base` 레이아웃을 호출합니다.

use chrono::{DateTime, Utc};
use handlebars::{
    Context, Handlebars, Helper, Output, RenderContext, RenderError,
};
use serde::Serialize;

use crate::core::errors::{AppError, AppResult};

const PAGES: [(&str, &str); 5] = [
    ("home", include_str!("templates/home.hbs")),
    ("view", include_str!("templates/view.hbs")),
    ("create", include_str!("templates/create.hbs")),
    ("signup", include_str!("templates/signup.hbs")),
    ("login", include_str!("templates/login.hbs")),
];

/// 페이지 템플릿 렌더러
///
/// 시작 시 모든 템플릿을 컴파일하므로, 문법 오류는 요청 시점이 아니라
/// [`TemplateEngine::new`]에서 드러납니다.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> AppResult<Self> {
        let mut hb = Handlebars::new();

        hb.register_partial("base", include_str!("templates/base.hbs"))
            .map_err(|e| AppError::ConfigError(format!("base 레이아웃 등록 실패: {}", e)))?;

        for (name, source) in PAGES {
            hb.register_template_string(name, source).map_err(|e| {
                AppError::ConfigError(format!("{} 템플릿 등록 실패: {}", name, e))
            })?;
        }

        hb.register_helper("human_date", Box::new(human_date_helper));

        Ok(Self { handlebars: hb })
    }

    /// 페이지를 문자열로 렌더링합니다.
    ///
    /// 응답을 쓰기 전에 전체를 렌더링하므로, 실패해도 일부만 전송된 응답이
    /// 남지 않습니다.
    pub fn render(&self, page: &str, data: &impl Serialize) -> AppResult<String> {
        if !self.handlebars.has_template(page) {
            return Err(AppError::TemplateError(format!(
                "The template {} does not exist",
                page
            )));
        }

        self.handlebars
            .render(page, data)
            .map_err(|e| AppError::TemplateError(format!("{} 렌더링 실패: {}", page, e)))
    }
}

/// 시각을 UTC 기준 `02 Jan 2006 at 15:04 UTC` 형식으로 표시합니다.
///
/// 값이 없거나 RFC 3339 시각으로 해석할 수 없으면 빈 문자열입니다.
pub fn human_date(value: Option<&str>) -> String {
    value
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%d %b %Y at %H:%M UTC")
                .to_string()
        })
        .unwrap_or_default()
}

fn human_date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> Result<(), RenderError> {
    let value = h.param(0).and_then(|p| p.value().as_str());
    out.write(&human_date(value))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_human_date() {
        let cases = [
            ("UTC", Some("2023-03-17T10:15:00Z"), "17 Mar 2023 at 10:15 UTC"),
            ("Empty", None, ""),
            ("CET", Some("2023-03-17T10:15:00+01:00"), "17 Mar 2023 at 09:15 UTC"),
            ("Garbage", Some("yesterday"), ""),
        ];

        for (name, input, want) in cases {
            assert_eq!(human_date(input), want, "case {}", name);
        }
    }

    #[test]
    fn test_all_pages_render_with_layout() {
        let engine = TemplateEngine::new().unwrap();
        let data = json!({
            "current_year": 2024,
            "csrf_token": "tok",
            "is_authenticated": false,
            "snippets": [],
            "form": {"expires": 365, "validator": {"field_errors": {}, "non_field_errors": []}},
        });

        for (page, _) in PAGES {
            let html = engine.render(page, &data).unwrap();
            assert!(html.contains("<title>"), "{} has no layout", page);
            assert!(html.contains("Powered by Rust in 2024"));
        }
    }

    #[test]
    fn test_unknown_page_is_template_error() {
        let engine = TemplateEngine::new().unwrap();

        assert!(matches!(
            engine.render("missing", &json!({})),
            Err(AppError::TemplateError(_))
        ));
    }

    #[test]
    fn test_flash_is_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render("home", &json!({"flash": "<b>hi</b>", "csrf_token": "t"}))
            .unwrap();

        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
    }
}
