//! 요청 범위 세션 핸들
//!
//! 세션 계층 인터셉터가 요청마다 하나씩 만들어 요청 확장에 넣습니다. 핸들러와
//! 다른 인터셉터는 같은 핸들을 복제해서 씁니다. 변경 내용은 응답이 만들어진 뒤
//! 한 번에 저장소로 커밋됩니다.

use std::cell::RefCell;
use std::collections::HashSet;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use log::{debug, error};

use crate::core::deadline::with_deadline;
use crate::core::errors::{AppError, AppResult};
use crate::session::data::{CSRF_SEED_KEY, SessionData, SessionValue};
use crate::session::store::{SessionStore, generate_token};

pub const SESSION_COOKIE: &str = "session";

/// 세션 수명과 쿠키 속성
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 생성 또는 토큰 갱신 시점부터의 절대 수명
    pub lifetime: Duration,
    pub cookie_secure: bool,
    pub store_timeout: StdDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unmodified,
    Modified,
    Destroyed,
}

struct SessionState {
    /// 저장소에 기록된 토큰. 아직 한 번도 저장되지 않았으면 `None`
    token: Option<String>,
    data: SessionData,
    status: SessionStatus,
    /// 이번 요청에서 `put`한 키. 아직 저장소에 없는 값입니다.
    written: HashSet<String>,
}

struct SessionInner {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
    state: RefCell<SessionState>,
}

/// 요청 범위 세션 핸들
///
/// ## 사용 예제
///
/// ```rust,ignore
/// pub async fn logout(session: Session) -> AppResult<HttpResponse> {
///     session.renew_token().await?;
///     session.remove(AUTH_USER_ID_KEY);
///     session.put(FLASH_KEY, "You've been logged out successfully!");
///     Ok(redirect("/"))
/// }
/// ```
#[derive(Clone)]
pub struct Session(Rc<SessionInner>);

impl Session {
    /// 쿠키로 받은 토큰의 세션을 불러옵니다.
    ///
    /// 토큰이 없거나, 저장소에 없거나, 만료되었으면 새 세션을 시작합니다.
    pub async fn load(
        store: Arc<dyn SessionStore>,
        config: SessionConfig,
        token: Option<String>,
    ) -> AppResult<Self> {
        let loaded = match token {
            Some(token) => {
                let data = with_deadline(config.store_timeout, "session load", store.load(&token))
                    .await?;
                data.map(|data| (token, data))
            }
            None => None,
        };

        let state = match loaded {
            Some((token, data)) => SessionState {
                token: Some(token),
                data,
                status: SessionStatus::Unmodified,
                written: HashSet::new(),
            },
            None => SessionState {
                token: None,
                data: SessionData::new(config.lifetime),
                status: SessionStatus::Unmodified,
                written: HashSet::new(),
            },
        };

        Ok(Self(Rc::new(SessionInner {
            store,
            config,
            state: RefCell::new(state),
        })))
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.state.borrow().data.values.get(key) {
            Some(SessionValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.0.state.borrow().data.values.get(key) {
            Some(SessionValue::Str(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.0.state.borrow().data.values.get(key) {
            Some(SessionValue::Bytes(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.0.state.borrow().data.values.contains_key(key)
    }

    pub fn put(&self, key: &str, value: impl Into<SessionValue>) {
        let mut state = self.0.state.borrow_mut();
        state.data.values.insert(key.to_string(), value.into());
        state.written.insert(key.to_string());
        state.status = SessionStatus::Modified;
    }

    pub fn remove(&self, key: &str) {
        let mut state = self.0.state.borrow_mut();
        if state.data.values.remove(key).is_some() {
            state.status = SessionStatus::Modified;
        }
    }

    /// 문자열 값을 읽고 삭제합니다.
    ///
    /// 저장된 세션이면 다른 키의 변경 여부와 관계없이 저장소의 원자적 `pop`을
    /// 사용하므로, 같은 세션의 동시 요청 중 하나만 값을 받습니다. 이번 요청에서
    /// `put`한 키만 로컬 값이 기준입니다.
    pub async fn pop_string(&self, key: &str) -> AppResult<Option<String>> {
        let (local, written, token) = {
            let mut state = self.0.state.borrow_mut();
            let local = state.data.values.remove(key);
            let written = state.written.remove(key);
            let token = match state.status {
                SessionStatus::Destroyed => None,
                SessionStatus::Unmodified | SessionStatus::Modified => state.token.clone(),
            };
            (local, written, token)
        };

        let stored = match token {
            Some(ref token) => {
                with_deadline(
                    self.0.config.store_timeout,
                    "session pop",
                    self.0.store.pop(token, key),
                )
                .await?
            }
            None => None,
        };
        let value = if written || token.is_none() { local } else { stored };

        Ok(match value {
            Some(SessionValue::Str(s)) => Some(s),
            _ => None,
        })
    }

    /// 세션 토큰을 새로 발급합니다.
    ///
    /// 저장된 데이터는 새 토큰으로 옮겨지고 이전 토큰은 무효화됩니다. 절대 수명은
    /// 지금부터 다시 계산되고, CSRF 시드는 폐기되어 다음 토큰 발급 때 새로 만들어집니다.
    pub async fn renew_token(&self) -> AppResult<()> {
        let old_token = self.0.state.borrow().token.clone();

        let new_token = match old_token {
            Some(old) => {
                with_deadline(
                    self.0.config.store_timeout,
                    "session renew",
                    self.0.store.renew_token(&old),
                )
                .await?
            }
            None => generate_token(),
        };

        let mut state = self.0.state.borrow_mut();
        state.token = Some(new_token);
        state.data.deadline = Utc::now() + self.0.config.lifetime;
        state.data.values.remove(CSRF_SEED_KEY);
        state.status = SessionStatus::Modified;
        debug!("세션 토큰 갱신");
        Ok(())
    }

    /// 세션을 폐기합니다. 커밋 시 저장소에서 삭제되고 쿠키가 제거됩니다.
    pub fn destroy(&self) {
        let mut state = self.0.state.borrow_mut();
        state.data.values.clear();
        state.written.clear();
        state.status = SessionStatus::Destroyed;
    }

    pub fn status(&self) -> SessionStatus {
        self.0.state.borrow().status
    }

    /// 현재 토큰 (아직 발급되지 않았으면 `None`)
    pub fn token(&self) -> Option<String> {
        self.0.state.borrow().token.clone()
    }

    /// 변경 내용을 저장소에 기록하고 응답에 실을 쿠키를 반환합니다.
    ///
    /// 변경이 없으면 아무 것도 하지 않고 `None`을 반환합니다.
    pub async fn commit(&self) -> AppResult<Option<Cookie<'static>>> {
        let (status, token, data) = {
            let mut state = self.0.state.borrow_mut();
            if state.status == SessionStatus::Unmodified {
                return Ok(None);
            }
            if state.token.is_none() {
                state.token = Some(generate_token());
            }
            (state.status, state.token.clone().unwrap_or_default(), state.data.clone())
        };

        let timeout = self.0.config.store_timeout;
        let cookie = match status {
            SessionStatus::Destroyed => {
                with_deadline(timeout, "session destroy", self.0.store.destroy(&token)).await?;
                let mut cookie = self.cookie(String::new(), &data);
                cookie.make_removal();
                cookie
            }
            _ => {
                with_deadline(timeout, "session save", self.0.store.save(&token, &data)).await?;
                self.cookie(token, &data)
            }
        };

        let mut state = self.0.state.borrow_mut();
        state.status = SessionStatus::Unmodified;
        state.written.clear();
        Ok(Some(cookie))
    }

    fn cookie(&self, token: String, data: &SessionData) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.0.config.cookie_secure)
            .same_site(SameSite::Lax)
            .finish();
        if let Ok(expires) = OffsetDateTime::from_unix_timestamp(data.deadline.timestamp()) {
            cookie.set_expires(expires);
        }
        cookie
    }
}

impl From<i64> for SessionValue {
    fn from(v: i64) -> Self {
        SessionValue::Int(v)
    }
}

impl From<&str> for SessionValue {
    fn from(v: &str) -> Self {
        SessionValue::Str(v.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(v: String) -> Self {
        SessionValue::Str(v)
    }
}

impl From<Vec<u8>> for SessionValue {
    fn from(v: Vec<u8>) -> Self {
        SessionValue::Bytes(v)
    }
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .ok_or_else(|| AppError::SessionError("세션 계층이 설치되지 않은 경로입니다".to_string())),
        )
    }
}

/// 응답이 정상적으로 만들어지지 않은 경우(패닉, 요청 취소)에도 커밋을 보장하는 가드
///
/// 정상 경로에서는 [`CommitGuard::disarm`]으로 해제하고 직접 커밋합니다. 요청에
/// 세션 쿠키가 없었던 새 세션은 저장하지 않습니다. 중단된 응답에는 Set-Cookie가
/// 실리지 않아 클라이언트가 그 토큰을 받을 수 없기 때문입니다.
pub struct CommitGuard {
    session: Option<Session>,
}

impl CommitGuard {
    pub fn new(session: Session) -> Self {
        let session = session.token().is_some().then_some(session);
        Self { session }
    }

    pub fn disarm(mut self) {
        self.session = None;
    }
}

impl Drop for CommitGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let pending = session
            .0
            .state
            .try_borrow()
            .map(|s| s.status != SessionStatus::Unmodified)
            .unwrap_or(false);
        if !pending {
            return;
        }

        actix_web::rt::spawn(async move {
            if let Err(e) = session.commit().await {
                error!("중단된 요청의 세션 커밋 실패: {}", e);
            }
        });
    }
}
