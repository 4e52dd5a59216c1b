//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - 저장소가 소유하는 영속 객체 (Snippet, User)
//! ├── DTOs      - 사용자가 제출하는 폼과 검증 규칙
//! └── Models    - 요청 범위 모델 (RequestIdentity)
//! ```

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::{
    INVALID_CREDENTIALS, LoginForm, PERMITTED_EXPIRES, SignupForm, SnippetCreateForm,
    verify_form_shapes,
};
pub use entities::{Snippet, User};
pub use models::RequestIdentity;
