//! 라우트 설정 모듈
//!
//! 페이지 라우트를 체인별로 묶어 등록합니다. 바깥 체인(`Pipeline::outer`)은
//! `App`에 한 번 감싸고, 세션을 쓰는 리소스에는 dynamic 또는 protected 체인을
//! 리소스 단위로 감쌉니다.
//!
//! # Route Groups
//!
//! ## 바깥 체인만
//! - `GET /health`
//!
//! ## Dynamic (세션 + CSRF + 인증 컨텍스트)
//! - `GET /`
//! - `GET /snippet/view/{id}`
//! - `GET|POST /user/signup`
//! - `GET|POST /user/login`
//!
//! ## Protected (dynamic + 인증 게이트)
//! - `GET|POST /snippet/create`
//!
//! `GET` 페이지는 모두 `HEAD`도 받습니다.
//! - `POST /user/logout`
//!
//! 그 외 경로는 404, 알려진 경로의 잘못된 메서드는 라우터가 405로 응답합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! let state = web::Data::new(AppState::connect(settings).await?);
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .wrap(access_log())
//!         .wrap(Pipeline::outer(&state))
//!         .app_data(state.clone())
//!         .configure(|cfg| configure_all_routes(cfg, &state))
//! })
//! ```

use crate::core::errors::{AppError, AppResult};
use crate::core::state::AppState;
use crate::handlers::{snippets, users};
use crate::middlewares::Pipeline;
use actix_web::{HttpResponse, Route, guard, web};
use serde_json::json;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    // Health check endpoint
    cfg.service(health_check);

    configure_snippet_routes(cfg, state);
    configure_user_routes(cfg, state);

    cfg.default_service(web::to(not_found));
}

/// 페이지 조회 라우트 (GET, HEAD)
///
/// HEAD도 GET과 같은 핸들러와 체인을 거치며 본문만 전송되지 않습니다.
fn page() -> Route {
    web::route().guard(guard::Any(guard::Get()).or(guard::Head()))
}

fn configure_snippet_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(
        web::resource("/")
            .route(page().to(snippets::home))
            .wrap(Pipeline::dynamic(state)),
    );
    cfg.service(
        web::resource("/snippet/view/{id}")
            .route(page().to(snippets::snippet_view))
            .wrap(Pipeline::dynamic(state)),
    );

    // Protected routes
    cfg.service(
        web::resource("/snippet/create")
            .route(page().to(snippets::snippet_create))
            .route(web::post().to(snippets::snippet_create_post))
            .wrap(Pipeline::protected(state)),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(
        web::resource("/user/signup")
            .route(page().to(users::signup))
            .route(web::post().to(users::signup_post))
            .wrap(Pipeline::dynamic(state)),
    );
    cfg.service(
        web::resource("/user/login")
            .route(page().to(users::login))
            .route(web::post().to(users::login_post))
            .wrap(Pipeline::dynamic(state)),
    );

    // Protected routes
    cfg.service(
        web::resource("/user/logout")
            .route(web::post().to(users::logout))
            .wrap(Pipeline::protected(state)),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 세션 체인을 거치지 않으므로 세션 쿠키를 만들지 않습니다.
///
/// ```bash
/// curl http://localhost:4000/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "snippetbox_backend",
///   "version": "0.1.0",
///   "timestamp": "2024-01-01T00:00:00Z",
///   "storage": "mongo"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "storage": state.settings.storage.name(),
    }))
}

async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("no route".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::body::MessageBody;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::header::{CACHE_CONTROL, LOCATION};
    use actix_web::http::{Method, StatusCode};
    use actix_web::test::{self, TestRequest};
    use actix_web::App;
    use async_trait::async_trait;

    use crate::config::AppSettings;
    use crate::domain::entities::Snippet;
    use crate::middlewares::{CSRF_HEADER, LOGIN_PATH, access_log};
    use crate::repositories::{MemorySnippetRepository, MemoryUserRepository, SnippetStore, UserStore};
    use crate::session::{
        AUTH_USER_ID_KEY, MemorySessionStore, SESSION_COOKIE, SessionData, SessionValue,
    };
    use crate::views::TemplateEngine;

    const EMAIL: &str = "alice@example.com";
    const PASSWORD: &str = "pa$$word";

    struct Fixture {
        state: AppState,
        snippets: Arc<MemorySnippetRepository>,
        users: Arc<MemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let settings = AppSettings::for_tests();
        let snippets = Arc::new(MemorySnippetRepository::new());
        let users = Arc::new(MemoryUserRepository::new(settings.bcrypt_cost));
        let state = AppState {
            snippets: snippets.clone(),
            users: users.clone(),
            sessions: Arc::new(MemorySessionStore::new()),
            templates: Arc::new(TemplateEngine::new().unwrap()),
            settings: Arc::new(settings),
        };

        Fixture {
            state,
            snippets,
            users,
        }
    }

    macro_rules! init_app {
        ($state:expr) => {{
            let state = $state.clone();
            test::init_service(
                App::new()
                    .wrap(access_log())
                    .wrap(Pipeline::outer(&state))
                    .app_data(web::Data::new(state.clone()))
                    .configure(|cfg| configure_all_routes(cfg, &state)),
            )
            .await
        }};
    }

    /// 세션 쿠키를 기억하는 최소한의 브라우저
    #[derive(Default)]
    struct Browser {
        session: Option<Cookie<'static>>,
    }

    impl Browser {
        fn get(&self, uri: &str) -> TestRequest {
            self.with_cookie(TestRequest::get().uri(uri))
        }

        fn post(&self, uri: &str, fields: &[(&str, &str)]) -> TestRequest {
            self.with_cookie(TestRequest::post().uri(uri).set_form(fields))
        }

        fn with_cookie(&self, req: TestRequest) -> TestRequest {
            match &self.session {
                Some(cookie) => req.cookie(cookie.clone()),
                None => req,
            }
        }

        fn remember<B>(&mut self, res: &ServiceResponse<B>) {
            if let Some(cookie) = res
                .response()
                .cookies()
                .find(|c| c.name() == SESSION_COOKIE)
            {
                self.session = if cookie.value().is_empty() {
                    None
                } else {
                    Some(cookie.into_owned())
                };
            }
        }

        fn token(&self) -> String {
            self.session
                .as_ref()
                .map(|c| c.value().to_string())
                .unwrap_or_default()
        }
    }

    async fn body_of<B: MessageBody>(res: ServiceResponse<B>) -> String {
        String::from_utf8(test::read_body(res).await.to_vec()).unwrap()
    }

    fn csrf_token(html: &str) -> String {
        let marker = r#"name="csrf_token" value=""#;
        let start = html.find(marker).expect("page has no csrf field") + marker.len();
        let end = html[start..].find('"').unwrap() + start;
        html[start..end].to_string()
    }

    fn location<B>(res: &ServiceResponse<B>) -> &str {
        res.headers().get(LOCATION).unwrap().to_str().unwrap()
    }

    /// 페이지를 열고 (쿠키 갱신) 본문을 돌려줍니다.
    macro_rules! visit {
        ($app:expr, $browser:expr, $uri:expr) => {{
            let res = test::call_service(&$app, $browser.get($uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "GET {}", $uri);
            $browser.remember(&res);
            body_of(res).await
        }};
    }

    /// 폼이 있는 페이지를 열고 본문과 CSRF 토큰을 돌려줍니다.
    macro_rules! open_page {
        ($app:expr, $browser:expr, $uri:expr) => {{
            let html = visit!($app, $browser, $uri);
            let token = csrf_token(&html);
            (html, token)
        }};
    }

    macro_rules! submit {
        ($app:expr, $browser:expr, $uri:expr, $fields:expr) => {{
            let res = test::call_service(&$app, $browser.post($uri, $fields).to_request()).await;
            $browser.remember(&res);
            res
        }};
    }

    macro_rules! log_in {
        ($app:expr, $browser:expr) => {{
            let (_, token) = open_page!($app, $browser, "/user/login");
            let res = submit!(
                $app,
                $browser,
                "/user/login",
                &[("email", EMAIL), ("password", PASSWORD), ("csrf_token", token.as_str())]
            );
            assert_eq!(res.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&res), "/snippet/create");
        }};
    }

    async fn register(fx: &Fixture) {
        fx.users.insert("Alice", EMAIL, PASSWORD).await.unwrap();
    }

    #[actix_web::test]
    async fn test_home_renders_with_security_headers_and_session() {
        let fx = fixture();
        let app = init_app!(fx.state);

        let res = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-frame-options").unwrap(), "deny");
        assert!(res.response().cookies().any(|c| c.name() == SESSION_COOKIE));
        let html = body_of(res).await;
        assert!(html.contains("There's nothing to see here"));
    }

    #[actix_web::test]
    async fn test_health_check_has_no_session() {
        let fx = fixture();
        let app = init_app!(fx.state);

        let res = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.response().cookies().count(), 0);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"], "memory");
    }

    #[actix_web::test]
    async fn test_whole_app_routes_through_outer_chain() {
        let fx = fixture();
        let app = init_app!(fx.state);

        let cases = [
            ("/health", StatusCode::OK),
            ("/", StatusCode::OK),
            ("/user/login", StatusCode::OK),
            ("/snippet/create", StatusCode::SEE_OTHER),
        ];
        for (uri, want) in cases {
            let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), want, "GET {}", uri);
            assert!(res.response().head().keep_alive(), "GET {}", uri);
        }
    }

    #[actix_web::test]
    async fn test_head_is_served_like_get() {
        let fx = fixture();
        let app = init_app!(fx.state);

        let res = test::call_service(&app, TestRequest::default().method(Method::HEAD).uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-frame-options").unwrap(), "deny");
        assert!(res.response().cookies().any(|c| c.name() == SESSION_COOKIE));

        let res = test::call_service(
            &app,
            TestRequest::default().method(Method::HEAD).uri("/snippet/create").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), LOGIN_PATH);
    }

    #[actix_web::test]
    async fn test_unknown_route_and_wrong_method() {
        let fx = fixture();
        let app = init_app!(fx.state);
        let mut browser = Browser::default();

        let res = test::call_service(&app, browser.get("/missing").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let (_, token) = open_page!(app, browser, "/user/login");
        let req = browser
            .with_cookie(TestRequest::post().uri("/"))
            .insert_header((CSRF_HEADER, token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_snippet_view_statuses() {
        let fx = fixture();
        let id = fx.snippets.insert("An old silent pond", "frog", 7).await.unwrap();
        fx.snippets
            .insert_raw(Snippet::new(50, "Gone".to_string(), "x".to_string(), -1))
            .unwrap();
        let app = init_app!(fx.state);

        let res = test::call_service(
            &app,
            TestRequest::get().uri(&format!("/snippet/view/{}", id)).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_of(res).await.contains("An old silent pond"));

        let cases = [
            ("/snippet/view/50", StatusCode::NOT_FOUND),
            ("/snippet/view/99", StatusCode::NOT_FOUND),
            ("/snippet/view/0", StatusCode::BAD_REQUEST),
            ("/snippet/view/-1", StatusCode::BAD_REQUEST),
            ("/snippet/view/abc", StatusCode::BAD_REQUEST),
        ];
        for (uri, want) in cases {
            let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), want, "GET {}", uri);
        }
    }

    #[actix_web::test]
    async fn test_protected_routes_redirect_anonymous() {
        let fx = fixture();
        let app = init_app!(fx.state);
        let mut browser = Browser::default();

        let res = test::call_service(&app, browser.get("/snippet/create").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), LOGIN_PATH);
        assert_eq!(res.headers().get(CACHE_CONTROL).unwrap(), "no-store");

        let (_, token) = open_page!(app, browser, "/user/login");
        let res = submit!(
            app,
            browser,
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "7"), ("csrf_token", token.as_str())]
        );
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), LOGIN_PATH);
        assert!(fx.snippets.latest().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_missing_or_foreign_csrf_token_never_reaches_handler() {
        let fx = fixture();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let state = fx.state.clone();
        let app = test::init_service(
            App::new()
                .wrap(Pipeline::outer(&state))
                .app_data(web::Data::new(state.clone()))
                .service(
                    web::resource("/probe")
                        .route(web::get().to(|| async { HttpResponse::Ok().finish() }))
                        .route(web::post().to(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                            async { HttpResponse::Ok().finish() }
                        }))
                        .wrap(Pipeline::dynamic(&state)),
                )
                .configure(|cfg| configure_all_routes(cfg, &state)),
        )
        .await;

        let mut browser = Browser::default();
        let (_, own_token) = open_page!(app, browser, "/user/login");
        let mut stranger = Browser::default();
        let (_, foreign_token) = open_page!(app, stranger, "/user/login");

        let cases = [
            ("missing", vec![]),
            ("garbage", vec![("csrf_token", "garbage")]),
            ("foreign", vec![("csrf_token", foreign_token.as_str())]),
        ];
        for (name, fields) in cases {
            let res = submit!(app, browser, "/probe", &fields);
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "case {}", name);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let res = submit!(
            app,
            browser,
            "/user/signup",
            &[("name", "Mallory"), ("email", "m@example.com"), ("password", "longenough")]
        );
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(matches!(
            fx.users.authenticate("m@example.com", "longenough").await,
            Err(AppError::InvalidCredentials)
        ));

        let res = submit!(app, browser, "/probe", &[("csrf_token", own_token.as_str())]);
        assert_eq!(res.status(), StatusCode::OK);
        let req = browser
            .with_cookie(TestRequest::post().uri("/probe"))
            .insert_header((CSRF_HEADER, own_token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn test_empty_title_is_rejected_without_insert() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        log_in!(app, browser);

        let (_, token) = open_page!(app, browser, "/snippet/create");
        let res = submit!(
            app,
            browser,
            "/snippet/create",
            &[("title", ""), ("content", "kept after failure"), ("expires", "7"), ("csrf_token", token.as_str())]
        );

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_of(res).await;
        assert!(html.contains("This field cannot be blank"));
        assert!(html.contains("kept after failure"));
        assert!(fx.snippets.latest().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_snippet_create_redirects_and_flashes_once() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        log_in!(app, browser);

        let (_, token) = open_page!(app, browser, "/snippet/create");
        let res = submit!(
            app,
            browser,
            "/snippet/create",
            &[("title", "Haiku"), ("content", "over the wintry"), ("expires", "1"), ("csrf_token", token.as_str())]
        );
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/snippet/view/1");

        let (html, _) = open_page!(app, browser, "/snippet/view/1");
        assert!(html.contains("Snippet successfully created!"));
        assert!(html.contains("over the wintry"));

        let (html, _) = open_page!(app, browser, "/snippet/view/1");
        assert!(!html.contains("Snippet successfully created!"));
    }

    #[actix_web::test]
    async fn test_bind_error_is_400() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        log_in!(app, browser);

        let (_, token) = open_page!(app, browser, "/snippet/create");
        let res = submit!(
            app,
            browser,
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "soon"), ("csrf_token", token.as_str())]
        );

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(fx.snippets.latest().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_signup_validation_errors() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();

        let (_, token) = open_page!(app, browser, "/user/signup");
        let res = submit!(
            app,
            browser,
            "/user/signup",
            &[("name", "Bob"), ("email", "bob@example.com"), ("password", "12345"), ("csrf_token", token.as_str())]
        );
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_of(res).await;
        assert!(html.contains("This field must be at least 8 characters long"));
        assert!(html.contains("bob@example.com"));
        assert!(!html.contains("12345"));

        let res = submit!(
            app,
            browser,
            "/user/signup",
            &[("name", "Alice"), ("email", EMAIL), ("password", "another-password"), ("csrf_token", token.as_str())]
        );
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_of(res).await.contains("Email address is already in use"));
    }

    #[actix_web::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        let (_, token) = open_page!(app, browser, "/user/login");

        let mut bodies = Vec::new();
        for email in [EMAIL, "nobody@example.com"] {
            let res = submit!(
                app,
                browser,
                "/user/login",
                &[("email", email), ("password", "wrong-password"), ("csrf_token", token.as_str())]
            );
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
            let html = body_of(res).await;
            assert!(html.contains("Invalid email or password"));
            bodies.push(html.replace(email, "").replace(&csrf_token(&html), ""));
        }

        assert_eq!(bodies[0], bodies[1]);
    }

    #[actix_web::test]
    async fn test_signup_then_login_reaches_protected_route() {
        let fx = fixture();
        let app = init_app!(fx.state);
        let mut browser = Browser::default();

        let (_, token) = open_page!(app, browser, "/user/signup");
        let res = submit!(
            app,
            browser,
            "/user/signup",
            &[("name", "Alice"), ("email", EMAIL), ("password", PASSWORD), ("csrf_token", token.as_str())]
        );
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), LOGIN_PATH);

        let (html, token) = open_page!(app, browser, "/user/login");
        assert!(html.contains("Your signup was successful. Please log in."));
        let (html, _) = open_page!(app, browser, "/user/login");
        assert!(!html.contains("Your signup was successful."));

        let before = browser.token();
        let res = submit!(
            app,
            browser,
            "/user/login",
            &[("email", EMAIL), ("password", PASSWORD), ("csrf_token", token.as_str())]
        );
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let after = browser.token();
        assert_ne!(before, after);

        let session = fx.state.sessions.load(&after).await.unwrap().unwrap();
        assert!(matches!(
            session.values.get(AUTH_USER_ID_KEY),
            Some(SessionValue::Int(_))
        ));
        assert!(fx.state.sessions.load(&before).await.unwrap().is_none());

        let res = test::call_service(&app, browser.get("/snippet/create").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(CACHE_CONTROL).unwrap(), "no-store");
    }

    #[actix_web::test]
    async fn test_logout_rotates_token_and_flashes() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        log_in!(app, browser);

        let (_, token) = open_page!(app, browser, "/snippet/create");
        let before = browser.token();
        let res = submit!(app, browser, "/user/logout", &[("csrf_token", token.as_str())]);
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");
        assert_ne!(before, browser.token());

        let html = visit!(app, browser, "/");
        assert!(html.contains("You&#x27;ve been logged out successfully!"));
        let html = visit!(app, browser, "/");
        assert!(!html.contains("logged out successfully"));

        let res = test::call_service(&app, browser.get("/snippet/create").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn test_token_from_before_login_is_dead() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        let _ = visit!(app, browser, "/");
        let attacker = Browser {
            session: browser.session.clone(),
        };

        log_in!(app, browser);

        let res = test::call_service(&app, attacker.get("/snippet/create").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), LOGIN_PATH);
    }

    #[actix_web::test]
    async fn test_deleted_user_becomes_anonymous() {
        let fx = fixture();
        register(&fx).await;
        let app = init_app!(fx.state);
        let mut browser = Browser::default();
        log_in!(app, browser);

        fx.users.delete(1).unwrap();
        let res = test::call_service(&app, browser.get("/snippet/create").to_request()).await;
        browser.remember(&res);

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let session = fx.state.sessions.load(&browser.token()).await.unwrap().unwrap();
        assert!(!session.values.contains_key(AUTH_USER_ID_KEY));
    }

    struct BrokenUsers;

    #[async_trait]
    impl UserStore for BrokenUsers {
        async fn insert(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
            Err(AppError::DatabaseError("down".to_string()))
        }

        async fn authenticate(&self, _: &str, _: &str) -> AppResult<i64> {
            Err(AppError::DatabaseError("down".to_string()))
        }

        async fn exists(&self, _: i64) -> AppResult<bool> {
            Err(AppError::DatabaseError("down".to_string()))
        }
    }

    #[actix_web::test]
    async fn test_user_store_failure_is_500() {
        let mut fx = fixture();
        fx.state.users = Arc::new(BrokenUsers);

        let mut data = SessionData::new(fx.state.settings.session_lifetime);
        data.values
            .insert(AUTH_USER_ID_KEY.to_string(), SessionValue::Int(1));
        fx.state.sessions.save("known-token", &data).await.unwrap();
        let app = init_app!(fx.state);

        let req = TestRequest::get()
            .uri("/")
            .cookie(Cookie::new(SESSION_COOKIE, "known-token"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(res).await, "Internal Server Error");
    }
}
