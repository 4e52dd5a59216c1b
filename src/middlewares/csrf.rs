//! CSRF 가드
//!
//! 세션마다 32바이트 시드를 두고, 응답에 싣는 토큰은 요청마다 새 패드로 시드를
//! 가린 값입니다.
//!
//! ```text
//! token = base64url( pad || pad XOR seed )
//! ```
//!
//! 토큰은 응답마다 달라지지만 모두 같은 시드로 검증됩니다. 시드는 세션 토큰이
//! 갱신될 때(로그인, 로그아웃)만 새로 만들어지고, 검증 실패로는 바뀌지 않습니다.

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::web::Bytes;
use actix_web::{Error, HttpMessage};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::warn;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::core::errors::AppError;
use crate::middlewares::pipeline::{Interceptor, Next};
use crate::middlewares::session_layer::session_of;
use crate::session::{CSRF_SEED_KEY, Session};
use crate::validation::{BindError, BufferedForm, FormValues};

pub const CSRF_FIELD: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

const SEED_BYTES: usize = 32;
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub struct CsrfGuard;

#[async_trait(?Send)]
impl Interceptor for CsrfGuard {
    fn name(&self) -> &'static str {
        "csrf"
    }

    async fn handle(
        &self,
        mut req: ServiceRequest,
        next: Next,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let session = match session_of(&req) {
            Ok(session) => session,
            Err(e) => return Ok(req.error_response(e)),
        };
        let seed = ensure_seed(&session);

        if !is_state_changing(req.method()) {
            return next.run(req).await;
        }

        let submitted = submitted_token(&mut req).await;
        match submitted {
            Some(token) if verify(&token, &seed) => next.run(req).await,
            Some(_) => {
                warn!("🚫 CSRF 토큰 불일치: {} {}", req.method(), req.uri());
                Ok(req.error_response(AppError::CsrfError("token mismatch".to_string())))
            }
            None => {
                warn!("🚫 CSRF 토큰 없음: {} {}", req.method(), req.uri());
                Ok(req.error_response(AppError::CsrfError("token missing".to_string())))
            }
        }
    }
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// 헤더를 먼저 보고, 없으면 urlencoded 본문의 `csrf_token` 필드를 읽습니다.
///
/// 본문을 읽은 경우 해석 결과를 [`BufferedForm`]으로 남겨 폼 추출기가 다시 쓰게 합니다.
async fn submitted_token(req: &mut ServiceRequest) -> Option<String> {
    if let Some(token) = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(token.to_string());
    }

    if req.content_type() != FORM_CONTENT_TYPE {
        return None;
    }

    let parsed = match req.extract::<Bytes>().await {
        Ok(body) => FormValues::parse(&body),
        Err(e) => Err(BindError::Malformed(e.to_string())),
    };
    let token = parsed
        .as_ref()
        .ok()
        .and_then(|values| values.first(CSRF_FIELD))
        .map(str::to_string);
    req.extensions_mut().insert(BufferedForm(parsed));

    token
}

fn ensure_seed(session: &Session) -> Vec<u8> {
    match session.get_bytes(CSRF_SEED_KEY) {
        Some(seed) if seed.len() == SEED_BYTES => seed,
        _ => {
            let mut seed = vec![0u8; SEED_BYTES];
            rand::rng().fill_bytes(&mut seed);
            session.put(CSRF_SEED_KEY, seed.clone());
            seed
        }
    }
}

/// 템플릿에 심을 현재 세션의 CSRF 토큰
///
/// 시드가 없으면(토큰 갱신 직후 등) 새로 만듭니다.
pub fn token_for(session: &Session) -> String {
    mask(&ensure_seed(session))
}

fn mask(seed: &[u8]) -> String {
    let mut pad = vec![0u8; seed.len()];
    rand::rng().fill_bytes(&mut pad);

    let masked: Vec<u8> = pad.iter().zip(seed).map(|(p, s)| p ^ s).collect();
    pad.extend(masked);
    URL_SAFE_NO_PAD.encode(pad)
}

/// 제출된 토큰의 가림을 풀어 시드와 상수 시간으로 비교합니다.
pub fn verify(token: &str, seed: &[u8]) -> bool {
    let Ok(raw) = URL_SAFE_NO_PAD.decode(token.trim()) else {
        return false;
    };
    if seed.len() != SEED_BYTES || raw.len() != SEED_BYTES * 2 {
        return false;
    }

    let (pad, masked) = raw.split_at(SEED_BYTES);
    let unmasked: Vec<u8> = pad.iter().zip(masked).map(|(p, m)| p ^ m).collect();
    unmasked.ct_eq(seed).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> Vec<u8> {
        vec![byte; SEED_BYTES]
    }

    #[test]
    fn test_masked_tokens_differ_but_verify() {
        let seed = seed(7);
        let a = mask(&seed);
        let b = mask(&seed);

        assert_ne!(a, b);
        assert!(verify(&a, &seed));
        assert!(verify(&b, &seed));
    }

    #[test]
    fn test_token_for_other_seed_is_rejected() {
        let token = mask(&seed(1));

        assert!(!verify(&token, &seed(2)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let seed = seed(3);
        let short = URL_SAFE_NO_PAD.encode([0u8; 10]);

        let cases = ["", "not base64 !!", short.as_str()];
        for token in cases {
            assert!(!verify(token, &seed), "token {:?}", token);
        }
    }

    #[test]
    fn test_state_changing_methods() {
        assert!(is_state_changing(&Method::POST));
        assert!(is_state_changing(&Method::PUT));
        assert!(is_state_changing(&Method::PATCH));
        assert!(is_state_changing(&Method::DELETE));
        assert!(!is_state_changing(&Method::GET));
        assert!(!is_state_changing(&Method::HEAD));
    }
}
