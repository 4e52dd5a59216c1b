//! # 폼 검증 규칙과 에러 누적기
//!
//! 규칙 함수는 모두 순수 함수이며 `bool`만 반환합니다. 에러 메시지는
//! [`Validator`]가 필드별로 누적합니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! let mut v = Validator::default();
//! v.check_field(not_blank(&form.title), "title", "This field cannot be blank");
//! v.check_field(max_chars(&form.title, 100), "title", "This field cannot be more than 100 characters long");
//!
//! // 저장소에서만 알 수 있는 실패는 나중에 추가
//! v.add_field_error("email", "Email address is already in use");
//!
//! if !v.valid() {
//!     // 422 + 폼 재렌더링
//! }
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::ValidateLength;

/// 이메일 형식 검사용 정규식 (W3C HTML 이메일 입력 규칙)
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("EMAIL_RX는 컴파일 가능한 정규식이어야 합니다")
});

/// 공백을 제외한 문자가 하나 이상 있으면 `true`
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// 문자(char) 수가 `n` 이하이면 `true`
pub fn max_chars(value: &str, n: usize) -> bool {
    value.validate_length(None, Some(n as u64), None)
}

/// 문자(char) 수가 `n` 이상이면 `true`
pub fn min_chars(value: &str, n: usize) -> bool {
    value.validate_length(Some(n as u64), None, None)
}

/// `value`가 허용 목록에 있으면 `true`
pub fn permitted_value<T: PartialEq>(value: &T, allowed: &[T]) -> bool {
    allowed.contains(value)
}

/// `value`가 정규식과 일치하면 `true`
pub fn matches(value: &str, pattern: &Regex) -> bool {
    pattern.is_match(value)
}

/// 필드 에러 누적기
///
/// 필드당 메시지는 하나만 유지합니다. 처음 실패한 규칙의 메시지가 남고,
/// 이후 같은 필드에 대한 검사는 아무 일도 하지 않습니다.
///
/// 폼 타입은 이 타입을 상속하지 않고 `validator` 필드로 보유하며,
/// 검사 메서드를 위임해서 노출합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    field_errors: BTreeMap<String, String>,
    non_field_errors: Vec<String>,
}

impl Validator {
    /// 필드/비필드 에러가 모두 없으면 `true`
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// `ok`가 `false`일 때만 `field`에 `message`를 기록합니다.
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_field_error(field, message);
        }
    }

    /// 필드 에러를 추가합니다. 이미 에러가 있는 필드는 덮어쓰지 않습니다.
    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// 특정 필드에 속하지 않는 폼 수준 에러를 추가합니다.
    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }

    /// 누적된 에러를 모두 지웁니다.
    ///
    /// 같은 폼을 다시 검증할 때 이전 결과가 섞이지 않도록 사용합니다.
    pub fn reset(&mut self) {
        self.field_errors.clear();
        self.non_field_errors.clear();
    }
}

/// 검증 누적기를 필드로 보유한 폼
///
/// 폼은 `validator` 필드에 대한 접근자만 구현하고, 검사 메서드는 기본 구현으로
/// 위임받습니다.
pub trait Validated {
    fn validator(&self) -> &Validator;

    fn validator_mut(&mut self) -> &mut Validator;

    fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        self.validator_mut().check_field(ok, field, message);
    }

    fn add_field_error(&mut self, field: &str, message: &str) {
        self.validator_mut().add_field_error(field, message);
    }

    fn add_non_field_error(&mut self, message: &str) {
        self.validator_mut().add_non_field_error(message);
    }

    fn valid(&self) -> bool {
        self.validator().valid()
    }
}
