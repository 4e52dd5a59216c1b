//! 터미널 출력 포맷팅 유틸리티
//!
//! 서버 시작 과정에서 단계별 진행 상황과 최종 설정 요약을 출력합니다.

use crate::config::AppSettings;

const CONTENT_WIDTH: usize = 50;

/// 박스 형태로 둘러싼 제목 문자열을 만듭니다. 텍스트는 중앙 정렬됩니다.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                    Snippetbox                    ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn boxed_title(title: &str) -> String {
    let border = "═".repeat(CONTENT_WIDTH);
    format!(
        "╔{}╗\n║{:^width$}║\n╚{}╝",
        border,
        title,
        border,
        width = CONTENT_WIDTH
    )
}

pub fn print_boxed_title(title: &str) {
    println!("{}", boxed_title(title));
}

/// ```text
/// → Step 1: Loading settings
/// ```
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str) {
    println!("✓ Step {}: {}", step, description);
}

/// ```text
///    ├─ storage: mongo
/// ```
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 서버가 뜨기 직전의 설정 요약
pub fn print_startup_summary(settings: &AppSettings, bind_address: &str, workers: usize) {
    println!();
    print_boxed_title("🎉 SNIPPETBOX READY");
    println!("   🌐 Listening: http://{}", bind_address);
    println!("   🧵 Workers: {}", workers);
    println!("   💾 Storage: {}", settings.storage.name());
    println!(
        "   🍪 Session lifetime: {}h (secure cookie: {})",
        settings.session_lifetime.num_hours(),
        settings.cookie_secure
    );
    println!("   🐞 Debug responses: {}", settings.debug);
    println!();
}
