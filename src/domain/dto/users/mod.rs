pub mod login_form;
pub mod signup_form;

pub use login_form::{INVALID_CREDENTIALS, LoginForm};
pub use signup_form::SignupForm;
