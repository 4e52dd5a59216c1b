use async_trait::async_trait;
use log::info;
use mongodb::bson::{self, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppError, AppResult};
use crate::db::Database;
use crate::repositories::users::UserStore;
use crate::repositories::users::passwords::{hash_password, verify_password};

const COLLECTION: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

/// `users` 컬렉션 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: i64,
    name: String,
    email: String,
    hashed_password: String,
    created: bson::DateTime,
}

/// MongoDB 사용자 저장소
///
/// 이메일 유일성은 `email_unique` 인덱스로 강제합니다. 시작 시
/// [`create_indexes`](Self::create_indexes)를 반드시 호출해야 합니다.
pub struct MongoUserRepository {
    db: Database,
    bcrypt_cost: u32,
}

impl MongoUserRepository {
    pub fn new(db: Database, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    fn collection(&self) -> Collection<UserDocument> {
        self.db.collection::<UserDocument>(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_index(email_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        info!("users 인덱스 준비 완료");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> AppResult<()> {
        let hashed_password = hash_password(password, self.bcrypt_cost)?;
        let id = self.db.next_sequence(COLLECTION).await?;

        let document = UserDocument {
            id,
            name: name.to_string(),
            email: email.to_string(),
            hashed_password,
            created: bson::DateTime::now(),
        };

        match self.collection().insert_one(document).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::DuplicateEmail),
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<i64> {
        let user = self
            .collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.hashed_password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user.id)
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let count = self
            .collection()
            .count_documents(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }
}
