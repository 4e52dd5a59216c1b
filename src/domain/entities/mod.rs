//! 영속 엔티티. 저장소 어댑터가 소유하며 핸들러와 템플릿은 읽기만 합니다.

pub mod snippets;
pub mod users;

pub use snippets::Snippet;
pub use users::User;
