//! # Views
//!
//! Handlebars 기반 HTML 렌더링. 핸들러는 [`TemplateData`]를 채워
//! [`TemplateEngine::render`]에 넘기기만 합니다.

pub mod template_data;
pub mod template_engine;

pub use template_data::TemplateData;
pub use template_engine::{TemplateEngine, human_date};
