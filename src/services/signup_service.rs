use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::info;

use crate::database::user_store::UserStore;
use crate::error::Result;
use crate::models::user::{NewUser, User};
use crate::utils::time::to_rfc3339;
use crate::utils::validation::validate_signup_value;

#[derive(Clone)]
pub struct SignupService {
    store: Arc<dyn UserStore>,
}

impl SignupService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Parses, validates and inserts one waitlist signup. Makes a single
    /// insert attempt; a duplicate email comes back as `Error::Conflict`.
    pub async fn submit_signup(&self, raw_payload: &[u8]) -> Result<User> {
        let json: JsonValue = serde_json::from_slice(raw_payload)?;
        let signup = validate_signup_value(&json)?;

        let user = self.store.insert_user(NewUser::from(signup)).await?;
        info!(
            user_id = %user.id,
            created_at = %user.created_at().map(to_rfc3339).unwrap_or_default(),
            "Waitlist signup created"
        );
        Ok(user)
    }
}
