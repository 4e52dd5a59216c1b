//! # Validation Module
//!
//! 사용자가 제출한 폼 데이터를 두 단계로 처리합니다.
//!
//! 1. [`form_binder`] - 원시 필드 집합을 타입이 있는 폼으로 바인딩 (실패 시 400)
//! 2. [`validator`] - 바인딩된 값에 규칙을 적용하고 필드 에러를 누적 (실패 시 422)

pub mod extract;
pub mod form_binder;
pub mod validator;

pub use extract::{BufferedForm, PostForm};
pub use form_binder::{
    BindError, BoundValue, FormShape, FormTarget, FormValues, SlotKind, bind, unsupported,
    verify_shape,
};
pub use validator::{
    EMAIL_RX, Validated, Validator, matches, max_chars, min_chars, not_blank, permitted_value,
};
