use async_trait::async_trait;
use sqlx::SqlitePool;
use std::fmt;
use uuid::Uuid;

use crate::models::user::{NewUser, User};

// SQLite extended result codes.
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    UsersPrimaryKey,
    UsersEmailUnique,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::UsersPrimaryKey => f.write_str("users.id"),
            Constraint::UsersEmailUnique => f.write_str("users.email"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("constraint violated: {constraint}")]
    ConstraintViolation { constraint: Constraint },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts one row. A duplicate email surfaces as
    /// `StoreError::ConstraintViolation { constraint: Constraint::UsersEmailUnique }`.
    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4().to_string();
        // Step the statement to completion so the implicit transaction has
        // committed before the row is handed back.
        let rows = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .fetch_all(&self.pool)
        .await
        .map_err(classify_users_insert_error)?;
        rows.into_iter()
            .next()
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// `users` carries exactly one UNIQUE constraint besides its primary key,
/// so the extended result code identifies which one fired.
fn classify_users_insert_error(err: sqlx::Error) -> StoreError {
    let constraint = match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            match db_err.code().as_deref() {
                Some(SQLITE_CONSTRAINT_UNIQUE) => Some(Constraint::UsersEmailUnique),
                Some(SQLITE_CONSTRAINT_PRIMARYKEY) => Some(Constraint::UsersPrimaryKey),
                _ => None,
            }
        }
        _ => None,
    };

    match constraint {
        Some(constraint) => StoreError::ConstraintViolation { constraint },
        None => StoreError::Database(err),
    }
}
