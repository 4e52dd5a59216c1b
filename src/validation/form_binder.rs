//! # 폼 바인더
//!
//! `application/x-www-form-urlencoded` 본문을 다중 값 필드 집합([`FormValues`])으로
//! 해석하고, 폼 타입이 선언한 형태([`FormShape`])에 따라 스칼라 필드(문자열, 정수)를
//! 채웁니다.
//!
//! ## 실패 분류
//!
//! | 상황 | 결과 |
//! |------|------|
//! | 본문 자체를 해석할 수 없음 | `BindError::Malformed` → 400 |
//! | 정수 슬롯에 숫자가 아닌 값 | `BindError::InvalidValue` → 400 |
//! | 선언된 슬롯 타입을 폼이 받지 못함 | `BindError::UnsupportedSlot` → 시작 시 `ConfigError` |
//!
//! 바인드 에러는 검증 에러(422)와 절대 섞이지 않습니다. 검증은 바인딩이 끝난 뒤
//! 핸들러에서 [`Validator`](crate::validation::Validator)로 수행합니다.
//!
//! ## 형태 검증
//!
//! 폼 형태는 요청마다 검사하지 않습니다. 서버 시작 시 [`verify_shape`]로 한 번
//! 검사하고, 잘못된 형태는 `ConfigError`로 기동을 중단시킵니다.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use url::form_urlencoded;

use crate::core::errors::{AppError, AppResult};

/// 폼 바인딩 실패
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// 본문을 필드 집합으로 해석할 수 없음
    #[error("malformed form body: {0}")]
    Malformed(String),

    /// 값이 슬롯 타입으로 변환되지 않음
    #[error("field `{field}` cannot hold value `{value}`")]
    InvalidValue { field: String, value: String },

    /// 폼 타입이 해당 슬롯 종류를 지원하지 않음
    #[error("field `{field}` does not support {kind:?} values")]
    UnsupportedSlot { field: String, kind: SlotKind },
}

/// 요청 본문에서 해석한 다중 값 필드 집합
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, Vec<String>>,
}

impl FormValues {
    /// urlencoded 본문을 해석합니다.
    ///
    /// 본문이 UTF-8이 아니면 `BindError::Malformed`를 반환합니다. 퍼센트 인코딩을
    /// 푼 바이트가 UTF-8이 아니면 대체 문자(U+FFFD)로 바뀝니다.
    pub fn parse(body: &[u8]) -> Result<Self, BindError> {
        std::str::from_utf8(body)
            .map_err(|e| BindError::Malformed(format!("body is not utf-8: {}", e)))?;

        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(body) {
            values.entry(key.into_owned()).or_default().push(value.into_owned());
        }

        Ok(Self { values })
    }

    /// `key`의 첫 번째 값
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// `key`의 모든 값
    pub fn all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
}

/// 폼 슬롯 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Text,
    Integer,
    /// 입력에 같은 이름의 키가 있어도 무시하는 슬롯
    Ignored,
}

/// 슬롯에 대입되는 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Text(String),
    Integer(i64),
}

impl BoundValue {
    fn kind(&self) -> SlotKind {
        match self {
            BoundValue::Text(_) => SlotKind::Text,
            BoundValue::Integer(_) => SlotKind::Integer,
        }
    }
}

/// 폼 필드 이름 → 슬롯 종류 매핑
#[derive(Debug, Clone, Default)]
pub struct FormShape {
    slots: Vec<(&'static str, SlotKind)>,
}

impl FormShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &'static str) -> Self {
        self.slots.push((name, SlotKind::Text));
        self
    }

    pub fn integer(mut self, name: &'static str) -> Self {
        self.slots.push((name, SlotKind::Integer));
        self
    }

    pub fn ignored(mut self, name: &'static str) -> Self {
        self.slots.push((name, SlotKind::Ignored));
        self
    }

    pub fn slots(&self) -> &[(&'static str, SlotKind)] {
        &self.slots
    }
}

/// 폼 바인딩 대상
///
/// 구현 타입은 자신의 형태를 선언하고, 선언한 슬롯에 대해서만 값을 받습니다.
///
/// # Examples
///
/// ```rust,ignore
/// impl FormTarget for LoginForm {
///     fn shape() -> FormShape {
///         FormShape::new().text("email").text("password").ignored("validator")
///     }
///
///     fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError> {
///         match (field, value) {
///             ("email", BoundValue::Text(v)) => self.email = v,
///             ("password", BoundValue::Text(v)) => self.password = v,
///             (field, value) => return Err(unsupported(field, &value)),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait FormTarget: Default {
    /// 폼 이름 (로그/설정 에러 메시지용)
    const NAME: &'static str;

    fn shape() -> FormShape;

    fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError>;
}

/// `assign` 구현에서 처리하지 못한 조합에 대한 에러
pub fn unsupported(field: &str, value: &BoundValue) -> BindError {
    BindError::UnsupportedSlot {
        field: field.to_string(),
        kind: value.kind(),
    }
}

/// 필드 집합을 `T`로 바인딩합니다.
///
/// 각 슬롯은 같은 이름의 첫 번째 값으로 채워집니다. 값이 없거나 빈 문자열인
/// 정수 슬롯은 기본값을 유지합니다.
pub fn bind<T: FormTarget>(values: &FormValues) -> Result<T, BindError> {
    let mut target = T::default();

    for &(name, kind) in T::shape().slots() {
        let Some(raw) = values.first(name) else {
            continue;
        };

        let value = match kind {
            SlotKind::Ignored => continue,
            SlotKind::Text => BoundValue::Text(raw.to_string()),
            SlotKind::Integer => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let parsed = trimmed.parse::<i64>().map_err(|_| BindError::InvalidValue {
                    field: name.to_string(),
                    value: raw.to_string(),
                })?;
                BoundValue::Integer(parsed)
            }
        };

        target.assign(name, value)?;
    }

    Ok(target)
}

/// 폼 형태를 시작 시점에 한 번 검증합니다.
///
/// - 빈 필드 이름, 중복 필드 이름 금지
/// - 선언된 모든 텍스트/정수 슬롯이 실제로 값을 받을 수 있어야 함
pub fn verify_shape<T: FormTarget>() -> AppResult<()> {
    let shape = T::shape();
    let mut seen = HashSet::new();
    let mut probe = T::default();

    for &(name, kind) in shape.slots() {
        if name.trim().is_empty() {
            return Err(AppError::ConfigError(format!(
                "{} 폼에 이름 없는 슬롯이 있습니다",
                T::NAME
            )));
        }
        if !seen.insert(name) {
            return Err(AppError::ConfigError(format!(
                "{} 폼에 `{}` 슬롯이 중복 선언되었습니다",
                T::NAME,
                name
            )));
        }

        let sample = match kind {
            SlotKind::Text => BoundValue::Text(String::new()),
            SlotKind::Integer => BoundValue::Integer(0),
            SlotKind::Ignored => continue,
        };
        probe.assign(name, sample).map_err(|e| {
            AppError::ConfigError(format!("{} 폼 형태가 잘못되었습니다: {}", T::NAME, e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct SampleForm {
        title: String,
        expires: i64,
    }

    impl FormTarget for SampleForm {
        const NAME: &'static str = "sample";

        fn shape() -> FormShape {
            FormShape::new().text("title").integer("expires").ignored("validator")
        }

        fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError> {
            match (field, value) {
                ("title", BoundValue::Text(v)) => self.title = v,
                ("expires", BoundValue::Integer(v)) => self.expires = v,
                (field, value) => return Err(unsupported(field, &value)),
            }
            Ok(())
        }
    }

    /// 정수 슬롯을 선언했지만 받을 수 없는 잘못된 폼
    #[derive(Debug, Default)]
    struct BrokenForm {
        title: String,
    }

    impl FormTarget for BrokenForm {
        const NAME: &'static str = "broken";

        fn shape() -> FormShape {
            FormShape::new().text("title").integer("count")
        }

        fn assign(&mut self, field: &str, value: BoundValue) -> Result<(), BindError> {
            match (field, value) {
                ("title", BoundValue::Text(v)) => self.title = v,
                (field, value) => return Err(unsupported(field, &value)),
            }
            Ok(())
        }
    }

    #[test]
    fn test_parse_decodes_plus_and_percent() {
        let values = FormValues::parse(b"title=Hello+World&content=a%26b%3Dc&title=second").unwrap();

        assert_eq!(values.first("title"), Some("Hello World"));
        assert_eq!(values.all("title").len(), 2);
        assert_eq!(values.first("content"), Some("a&b=c"));
        assert_eq!(values.first("missing"), None);
    }

    #[test]
    fn test_parse_rejects_non_utf8() {
        assert!(matches!(FormValues::parse(&[0x66, 0xff, 0x3d]), Err(BindError::Malformed(_))));

        let values = FormValues::parse(b"title=%ff%fe").unwrap();
        assert_eq!(values.first("title"), Some("\u{FFFD}\u{FFFD}"));
    }

    #[test]
    fn test_parse_keeps_empty_and_valueless_keys() {
        let values = FormValues::parse(b"title=&flag&&content=x%20y").unwrap();

        assert_eq!(values.first("title"), Some(""));
        assert_eq!(values.first("flag"), Some(""));
        assert_eq!(values.first("content"), Some("x y"));
    }

    #[test]
    fn test_bind_uses_first_value_and_ignores_unknown_keys() {
        let values =
            FormValues::parse(b"title=first&title=second&expires=7&csrf_token=abc&validator=x").unwrap();
        let form: SampleForm = bind(&values).unwrap();

        assert_eq!(form.title, "first");
        assert_eq!(form.expires, 7);
    }

    #[test]
    fn test_bind_rejects_non_numeric_integer() {
        let values = FormValues::parse(b"title=t&expires=soon").unwrap();
        let err = bind::<SampleForm>(&values).unwrap_err();

        assert_eq!(
            err,
            BindError::InvalidValue {
                field: "expires".to_string(),
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_bind_keeps_default_for_empty_integer() {
        let values = FormValues::parse(b"title=t&expires=").unwrap();
        let form: SampleForm = bind(&values).unwrap();

        assert_eq!(form.expires, 0);
    }

    #[test]
    fn test_verify_shape_accepts_valid_form() {
        assert!(verify_shape::<SampleForm>().is_ok());
    }

    #[test]
    fn test_verify_shape_rejects_unsupported_slot() {
        let err = verify_shape::<BrokenForm>().unwrap_err();

        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("count")));
    }
}
