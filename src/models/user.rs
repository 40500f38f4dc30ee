use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::time::from_millis;
use crate::utils::validation::Signup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub created_at: i64,
}

impl User {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        from_millis(self.created_at)
    }
}

/// Row to insert. The store fills in `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
}

impl From<Signup> for NewUser {
    fn from(signup: Signup) -> Self {
        Self {
            name: signup.name,
            email: signup.email,
        }
    }
}
