use serde::Serialize;

use crate::validation::{
    BindError, BoundValue, EMAIL_RX, FormShape, FormTarget, Validated, Validator, matches,
    min_chars, not_blank, unsupported,
};

/// 회원 가입 폼
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    /// 다시 렌더링할 때 노출하지 않습니다.
    #[serde(skip_serializing)]
    pub password: String,
    pub validator: Validator,
}

impl SignupForm {
    pub fn validate(&mut self) -> bool {
        self.validator.reset();

        self.check_field(not_blank(&self.name), "name", "This field cannot be blank");
        self.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        self.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        self.check_field(not_blank(&self.password), "password", "This field cannot be blank");
        self.check_field(
            min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );

        self.valid()
    }
}

impl Validated for SignupForm {
    fn validator(&self) -> &Validator {
        &self.validator
    }

    fn validator_mut(&mut self) -> &mut Validator {
        &mut self.validator
    }
}

impl FormTarget for SignupForm {
    const NAME: &'static str = "signup";

    fn shape() -> FormShape {
        FormShape::new()
            .text("name")
            .text("email")
            .text("password")
            .ignored("validator")
    }

    fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError> {
        match (field, value) {
            ("name", BoundValue::Text(v)) => self.name = v,
            ("email", BoundValue::Text(v)) => self.email = v,
            ("password", BoundValue::Text(v)) => self.password = v,
            (field, value) => return Err(unsupported(field, &value)),
        }
        Ok(())
    }
}
