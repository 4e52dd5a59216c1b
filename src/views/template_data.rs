use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::Snippet;

/// 모든 페이지 템플릿에 전달되는 데이터
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: Option<serde_json::Value>,
}

impl TemplateData {
    pub fn new(flash: Option<String>, is_authenticated: bool, csrf_token: String) -> Self {
        Self {
            current_year: Utc::now().year(),
            flash,
            is_authenticated,
            csrf_token,
            snippet: None,
            snippets: Vec::new(),
            form: None,
        }
    }

    /// 폼(입력값과 검증 결과)을 템플릿 데이터에 싣습니다.
    pub fn with_form(mut self, form: &impl Serialize) -> AppResult<Self> {
        let value = serde_json::to_value(form)
            .map_err(|e| AppError::TemplateError(format!("폼 직렬화 실패: {}", e)))?;
        self.form = Some(value);
        Ok(self)
    }
}
