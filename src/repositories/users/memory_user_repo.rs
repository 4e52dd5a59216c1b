use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::User;
use crate::repositories::users::UserStore;
use crate::repositories::users::passwords::{hash_password, verify_password};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: Vec<User>,
}

/// 프로세스 내 사용자 저장소
pub struct MemoryUserRepository {
    inner: Mutex<Inner>,
    bcrypt_cost: u32,
}

impl MemoryUserRepository {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            bcrypt_cost,
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::DatabaseError("사용자 저장소 잠금이 오염되었습니다".to_string()))
    }

    /// 사용자를 삭제합니다. 세션에 남은 사용자 ID가 무효화되는 상황을 재현할 때 씁니다.
    pub fn delete(&self, id: i64) -> AppResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        Ok(inner.users.len() != before)
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> AppResult<()> {
        let hashed_password = hash_password(password, self.bcrypt_cost)?;

        let mut inner = self.lock()?;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.users.push(User::new(
            id,
            name.to_string(),
            email.to_string(),
            hashed_password,
        ));
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<i64> {
        let user = self
            .lock()?
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.hashed_password) {
            return Err(AppError::InvalidCredentials);
        }
        Ok(user.id)
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.lock()?.users.iter().any(|u| u.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_duplicate_email() {
        let repo = MemoryUserRepository::new(4);
        repo.insert("Alice", "alice@example.com", "pa$$word").await.unwrap();

        let err = repo
            .insert("Other", "alice@example.com", "different1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[actix_web::test]
    async fn test_authenticate_does_not_distinguish_failures() {
        let repo = MemoryUserRepository::new(4);
        repo.insert("Alice", "alice@example.com", "pa$$word").await.unwrap();

        let wrong_password = repo.authenticate("alice@example.com", "nope").await;
        let unknown_email = repo.authenticate("bob@example.com", "pa$$word").await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
        assert_eq!(repo.authenticate("alice@example.com", "pa$$word").await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_exists_after_delete() {
        let repo = MemoryUserRepository::new(4);
        repo.insert("Alice", "alice@example.com", "pa$$word").await.unwrap();

        assert!(repo.exists(1).await.unwrap());
        assert!(repo.delete(1).unwrap());
        assert!(!repo.exists(1).await.unwrap());
    }
}
