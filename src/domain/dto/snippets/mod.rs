pub mod snippet_create_form;

pub use snippet_create_form::{PERMITTED_EXPIRES, SnippetCreateForm};
