pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::user_store::UserStore;
use crate::services::signup_service::SignupService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub signup_service: SignupService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        let signup_service = SignupService::new(store.clone());
        Self {
            store,
            signup_service,
        }
    }
}
