use serde::Serialize;

use crate::validation::{
    BindError, BoundValue, FormShape, FormTarget, Validated, Validator, max_chars, not_blank,
    permitted_value, unsupported,
};

pub const PERMITTED_EXPIRES: [i64; 3] = [1, 7, 365];

/// 스니펫 생성 폼
///
/// 검증 실패 시 입력값을 그대로 다시 렌더링하므로 `Serialize`를 구현합니다.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i64,
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    /// 모든 구조 검사를 다시 실행하고 결과를 반환합니다.
    pub fn validate(&mut self) -> bool {
        self.validator.reset();

        self.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        self.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        self.check_field(not_blank(&self.content), "content", "This field cannot be blank");
        self.check_field(
            permitted_value(&self.expires, &PERMITTED_EXPIRES),
            "expires",
            "This field must equal 1, 7 or 365",
        );

        self.valid()
    }
}

impl Validated for SnippetCreateForm {
    fn validator(&self) -> &Validator {
        &self.validator
    }

    fn validator_mut(&mut self) -> &mut Validator {
        &mut self.validator
    }
}

impl FormTarget for SnippetCreateForm {
    const NAME: &'static str = "snippet_create";

    fn shape() -> FormShape {
        FormShape::new()
            .text("title")
            .text("content")
            .integer("expires")
            .ignored("validator")
    }

    fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError> {
        match (field, value) {
            ("title", BoundValue::Text(v)) => self.title = v,
            ("content", BoundValue::Text(v)) => self.content = v,
            ("expires", BoundValue::Integer(v)) => self.expires = v,
            (field, value) => return Err(unsupported(field, &value)),
        }
        Ok(())
    }
}
