use serde::Serialize;

use crate::validation::{
    BindError, BoundValue, EMAIL_RX, FormShape, FormTarget, Validated, Validator, matches,
    not_blank, unsupported,
};

/// 로그인 실패 시 폼 수준 에러 메시지
///
/// 이메일과 비밀번호 중 어느 쪽이 틀렸는지 구분하지 않습니다.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// 로그인 폼
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub validator: Validator,
}

impl LoginForm {
    pub fn validate(&mut self) -> bool {
        self.validator.reset();

        self.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        self.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        self.check_field(not_blank(&self.password), "password", "This field cannot be blank");

        self.valid()
    }
}

impl Validated for LoginForm {
    fn validator(&self) -> &Validator {
        &self.validator
    }

    fn validator_mut(&mut self) -> &mut Validator {
        &mut self.validator
    }
}

impl FormTarget for LoginForm {
    const NAME: &'static str = "login";

    fn shape() -> FormShape {
        FormShape::new()
            .text("email")
            .text("password")
            .ignored("validator")
    }

    fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError> {
        match (field, value) {
            ("email", BoundValue::Text(v)) => self.email = v,
            ("password", BoundValue::Text(v)) => self.password = v,
            (field, value) => return Err(unsupported(field, &value)),
        }
        Ok(())
    }
}
