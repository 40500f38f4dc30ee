//! Client-side waitlist form: live validation, one request per submit, and
//! the notification shown once the request settles.

use serde_json::Value as JsonValue;
use tracing::warn;

use super::api::{ApiResponse, ClientError, SignupApi};
use crate::dto::user_dto::SignupPayload;
use crate::error::UNEXPECTED_MESSAGE;
use crate::utils::validation::{validate_signup, Violations};

pub const SUCCESS_MESSAGE: &str = "Success! You've been added to the waitlist.";
pub const FAILURE_FALLBACK: &str = "Failed to join the waitlist.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
}

impl Field {
    fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(msg) | Notification::Error(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success(_))
    }
}

#[derive(Debug, Clone)]
pub struct WaitlistForm {
    name: String,
    email: String,
    name_touched: bool,
    email_touched: bool,
    violations: Violations,
    phase: Phase,
    notification: Option<Notification>,
}

impl Default for WaitlistForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitlistForm {
    pub fn new() -> Self {
        let mut form = Self {
            name: String::new(),
            email: String::new(),
            name_touched: false,
            email_touched: false,
            violations: Violations::default(),
            phase: Phase::Idle,
            notification: None,
        };
        form.revalidate();
        form
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> bool {
        self.set(Field::Name, value)
    }

    pub fn set_email(&mut self, value: impl Into<String>) -> bool {
        self.set(Field::Email, value)
    }

    /// Returns false, leaving the field untouched, while a submission is in flight.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.phase == Phase::Submitting {
            return false;
        }
        match field {
            Field::Name => {
                self.name = value.into();
                self.name_touched = true;
            }
            Field::Email => {
                self.email = value.into();
                self.email_touched = true;
            }
        }
        self.revalidate();
        true
    }

    /// First violation for `field`, once the user has edited it.
    pub fn field_error(&self, field: Field) -> Option<&str> {
        let touched = match field {
            Field::Name => self.name_touched,
            Field::Email => self.email_touched,
        };
        if !touched {
            return None;
        }
        self.violations
            .for_field(field.key())
            .next()
            .map(|v| v.message.as_str())
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && self.violations.is_empty()
    }

    /// Current values as sent to the server. A blank name is omitted.
    pub fn payload(&self) -> SignupPayload {
        SignupPayload {
            name: Some(self.name.clone()).filter(|name| !name.trim().is_empty()),
            email: self.email.clone(),
        }
    }

    /// Moves to `Submitting` and hands back the request body, or `None` when
    /// the values are invalid or a submission is already running.
    pub fn begin_submit(&mut self) -> Option<SignupPayload> {
        if self.phase == Phase::Submitting {
            return None;
        }
        if !self.violations.is_empty() {
            self.name_touched = true;
            self.email_touched = true;
            return None;
        }
        self.phase = Phase::Submitting;
        self.notification = None;
        Some(self.payload())
    }

    pub fn settle(&mut self, outcome: Result<ApiResponse, ClientError>) -> &Notification {
        let notification = match outcome {
            Ok(res) if res.is_success() => {
                self.reset();
                Notification::Success(SUCCESS_MESSAGE.to_string())
            }
            Ok(res) => Notification::Error(failure_message(&res.body)),
            Err(e) => {
                warn!(error = %e, "Waitlist submission failed");
                Notification::Error(UNEXPECTED_MESSAGE.to_string())
            }
        };
        self.phase = Phase::Idle;
        self.notification.insert(notification)
    }

    pub async fn submit<A>(&mut self, api: &A) -> Option<&Notification>
    where
        A: SignupApi + ?Sized,
    {
        let payload = self.begin_submit()?;
        let outcome = api.post_signup(&payload).await;
        Some(self.settle(outcome))
    }

    fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.name_touched = false;
        self.email_touched = false;
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.violations = match validate_signup(&self.payload()) {
            Ok(_) => Violations::default(),
            Err(violations) => violations,
        };
    }
}

fn failure_message(body: &[u8]) -> String {
    let message = match serde_json::from_slice::<JsonValue>(body) {
        Ok(JsonValue::Object(map)) => map
            .get("message")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        Ok(JsonValue::Array(_)) => serde_json::from_slice::<Violations>(body)
            .ok()
            .filter(|violations| !violations.is_empty())
            .map(|violations| violations.messages().join(" ")),
        _ => None,
    };
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FAILURE_FALLBACK.to_string())
}
