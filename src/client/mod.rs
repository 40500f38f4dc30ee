pub mod api;
pub mod form;

pub use api::{ApiResponse, ClientError, HttpSignupApi, SignupApi};
pub use form::{Field, Notification, Phase, WaitlistForm};
