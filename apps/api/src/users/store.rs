//! User Store — single-table persistence for account records.
//!
//! Callers normalize emails (trim + lowercase) before `create` and `find_by_email`;
//! the store compares the stored value exactly. Uniqueness is enforced by the
//! `UNIQUE` constraint on `users.email`, so concurrent signups cannot both win.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{NewUser, UserRecord};

/// Pluggable user persistence. Carried in `AppState` as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with `AppError::DuplicateEmail` if the email exists.
    async fn create(&self, user: NewUser<'_>) -> Result<UserRecord, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;
}

/// SQLite-backed store. Each call runs on its own pooled connection.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("users table ready");
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, user: NewUser<'_>) -> Result<UserRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES (?, ?, ?)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&mut *tx)
        .await;

        let record = match inserted {
            Ok(record) => record,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AppError::DuplicateEmail);
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory store on a single connection so every query sees the same database.
    pub(crate) async fn memory_store() -> SqliteUserStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteUserStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn new_user<'a>(email: &'a str) -> NewUser<'a> {
        NewUser {
            name: "Asha",
            email,
            password_hash: "$argon2id$stub",
        }
    }

    async fn count_users(store: &SqliteUserStore) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = memory_store().await;
        let created = store.create(new_user("asha@example.com")).await.unwrap();
        assert_eq!(created.name, "Asha");

        let found = store.find_by_email("asha@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_find_unknown_email_is_none() {
        let store = memory_store().await;
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_without_second_row() {
        let store = memory_store().await;
        store.create(new_user("asha@example.com")).await.unwrap();

        let err = store.create(new_user("asha@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(count_users(&store).await, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let store = memory_store().await;
        store.create(new_user("asha@example.com")).await.unwrap();
        assert!(store.find_by_email("Asha@Example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = memory_store().await;
        store.migrate().await.unwrap();
        assert_eq!(count_users(&store).await, 0);
    }
}
