//! POST 폼 추출기
//!
//! CSRF 가드가 본문을 이미 읽었다면 요청 확장에 남긴 [`BufferedForm`]을 사용하고,
//! 그렇지 않으면 페이로드를 직접 읽습니다. 어느 경우든 본문은 한 번만 해석됩니다.

use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::web::Bytes;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::AppError;
use crate::validation::form_binder::{BindError, FormTarget, FormValues, bind};

/// 인터셉터가 미리 읽어 둔 폼 본문
#[derive(Debug, Clone)]
pub struct BufferedForm(pub Result<FormValues, BindError>);

/// 바인딩된 POST 폼
///
/// ```rust,ignore
/// pub async fn snippet_create_post(form: PostForm<SnippetCreateForm>) -> AppResult<HttpResponse> {
///     let mut form = form.into_inner();
///     form.validate();
///     ...
/// }
/// ```
#[derive(Debug)]
pub struct PostForm<T>(pub T);

impl<T> PostForm<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for PostForm<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for PostForm<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> FromRequest for PostForm<T>
where
    T: FormTarget + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if let Some(BufferedForm(values)) = req.extensions_mut().remove::<BufferedForm>() {
            return Box::pin(async move { Ok(PostForm(bind::<T>(&values?)?)) });
        }

        let body = Bytes::from_request(req, payload);
        Box::pin(async move {
            let body = body
                .await
                .map_err(|e| BindError::Malformed(e.to_string()))?;
            let values = FormValues::parse(&body)?;
            Ok(PostForm(bind::<T>(&values)?))
        })
    }
}
