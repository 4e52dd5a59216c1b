//! # Repositories
//!
//! 영속 데이터 접근 계층. 파이프라인과 핸들러는 구체 타입이 아니라
//! [`SnippetStore`]와 [`UserStore`] 트레이트 객체만 봅니다.
//!
//! | 구현 | 용도 |
//! |------|------|
//! | `Mongo*Repository` | 운영 (`STORAGE_BACKEND=mongo`) |
//! | `Memory*Repository` | 개발, 테스트 (`STORAGE_BACKEND=memory`) |

pub mod snippets;
pub mod users;

pub use snippets::{MemorySnippetRepository, MongoSnippetRepository, SnippetStore};
pub use users::{MemoryUserRepository, MongoUserRepository, UserStore};
