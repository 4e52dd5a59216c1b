use bcrypt::{hash, verify};
use log::debug;

use crate::core::errors::{AppError, AppResult};

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let hash_start = std::time::Instant::now();
    let hashed = hash(password, cost)
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
    debug!("Password hashing took: {:?}", hash_start.elapsed());
    Ok(hashed)
}

/// 해시가 손상된 경우도 불일치로 취급합니다.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("pa$$word", 4).unwrap();

        assert!(verify_password("pa$$word", &hashed));
        assert!(!verify_password("wrong", &hashed));
        assert!(!verify_password("pa$$word", "not-a-hash"));
    }
}
