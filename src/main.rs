//! Snippetbox 메인 애플리케이션
//!
//! 설정을 읽고 저장소에 연결한 뒤 Actix-web HTTP 서버를 구동합니다.

use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use snippetbox_backend::config::{AppSettings, ServerConfig};
use snippetbox_backend::core::{AppResult, AppState};
use snippetbox_backend::domain::dto::verify_form_shapes;
use snippetbox_backend::middlewares::{Pipeline, access_log};
use snippetbox_backend::routes::configure_all_routes;
use snippetbox_backend::utils::display_terminal::{
    print_boxed_title, print_startup_summary, print_step_complete, print_step_start,
    print_sub_task,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 Snippetbox 서버 시작중...");

    let state = match initialize_state().await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ 초기화 실패: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    info!("✅ 초기화가 완료되었습니다");

    start_http_server(state).await
}

/// 설정 로드, 폼 형태 검증, 저장소 연결을 차례로 수행합니다
///
/// 잘못된 설정이나 폼 형태는 요청을 받기 전에 여기서 `ConfigError`로 드러납니다.
async fn initialize_state() -> AppResult<AppState> {
    print_boxed_title("Snippetbox");

    print_step_start(1, "Loading settings");
    let settings = AppSettings::from_env()?;
    print_sub_task("environment", &format!("{:?}", settings.environment));
    print_sub_task("storage", settings.storage.name());
    print_step_complete(1, "Settings loaded");

    print_step_start(2, "Verifying form shapes");
    verify_form_shapes()?;
    print_step_complete(2, "Form shapes verified");

    print_step_start(3, "Connecting storage");
    let state = AppState::connect(settings).await?;
    print_step_complete(3, "Storage ready");

    Ok(state)
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 바깥 파이프라인(패닉 복구, 요청 로깅, 보안 헤더)은 App 전체에, 세션/CSRF/인증
/// 체인은 라우트 설정에서 리소스별로 적용됩니다. 접근 로그는 바깥 파이프라인
/// 안쪽에서 남기므로 패닉은 복구 단계가 대신 기록합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(state: AppState) -> std::io::Result<()> {
    let host = ServerConfig::host();
    let port = ServerConfig::port();
    let workers = ServerConfig::workers();
    let bind_address = format!("{}:{}", host, port);

    print_startup_summary(&state.settings, &bind_address, workers);
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(access_log())
            .wrap(Pipeline::outer(&state))
            .app_data(state.clone())
            .configure(|cfg| configure_all_routes(cfg, &state))
    })
    .bind((host.as_str(), port))?
    .workers(workers)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// ```bash
/// PROFILE=prod cargo run
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
///
/// ```bash
/// RUST_LOG=snippetbox_backend::middlewares=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}
