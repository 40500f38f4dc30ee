//! Signup rules shared by the HTTP endpoint and the waitlist form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::dto::user_dto::SignupPayload;

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters long.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

const INVALID_TYPE: &str = "invalid_type";

/// One field-level failure. `path` is empty when the input as a whole is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    pub code: String,
    pub path: Vec<String>,
    pub message: String,
}

impl Violation {
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    fn invalid_type(field: Option<&str>, expected: &str, received: &Value) -> Self {
        Self {
            code: INVALID_TYPE.to_string(),
            path: field.map(|f| vec![f.to_string()]).unwrap_or_default(),
            message: format!(
                "Expected {}, received {}",
                expected,
                json_type_name(received)
            ),
        }
    }

    fn required(field: &str) -> Self {
        Self {
            code: INVALID_TYPE.to_string(),
            path: vec![field.to_string()],
            message: "Required".to_string(),
        }
    }

    fn rank(&self) -> usize {
        match self.field() {
            None => 0,
            Some("name") => 1,
            Some("email") => 2,
            Some(_) => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    fn from_unsorted(mut items: Vec<Violation>) -> Self {
        items.sort_by_key(Violation::rank);
        Self(items)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.field() == Some(field))
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.message.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<ValidationErrors> for Violations {
    fn from(errors: ValidationErrors) -> Self {
        let items = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| Violation {
                    code: err.code.to_string(),
                    path: vec![field.clone()],
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        Self::from_unsorted(items)
    }
}

/// Tightens the `email` rule: the local part may not start or end with a dot
/// or contain `..`, and the domain needs a dot and an alphabetic TLD of at
/// least two letters. Addresses the `email` rule already rejects pass here so
/// they are reported once.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if !email.validate_email() {
        return Ok(());
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(ValidationError::new("email"));
    };
    let local_ok = !local.starts_with('.') && !local.ends_with('.') && !local.contains("..");
    let tld_ok = domain
        .rsplit_once('.')
        .map(|(_, tld)| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);

    if local_ok && tld_ok {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// A signup that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub name: Option<String>,
    pub email: String,
}

pub fn validate_signup(payload: &SignupPayload) -> Result<Signup, Violations> {
    payload.validate().map_err(Violations::from)?;
    Ok(Signup {
        name: payload.name.clone(),
        email: payload.email.clone(),
    })
}

/// Validates untyped JSON. Type mismatches are reported alongside rule
/// failures of the remaining fields, so one pass yields every problem.
pub fn validate_signup_value(input: &Value) -> Result<Signup, Violations> {
    let Some(object) = input.as_object() else {
        return Err(Violations(vec![Violation::invalid_type(
            None, "object", input,
        )]));
    };

    let mut violations = Vec::new();

    let name = match object.get("name") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(other) => {
            violations.push(Violation::invalid_type(Some("name"), "string", other));
            None
        }
    };

    let email = match object.get("email") {
        None => {
            violations.push(Violation::required("email"));
            None
        }
        Some(Value::String(email)) => Some(email.clone()),
        Some(other) => {
            violations.push(Violation::invalid_type(Some("email"), "string", other));
            None
        }
    };

    let payload = SignupPayload {
        name,
        email: email.clone().unwrap_or_default(),
    };

    match validate_signup(&payload) {
        Ok(signup) if violations.is_empty() => Ok(signup),
        Ok(_) => Err(Violations::from_unsorted(violations)),
        Err(rule_violations) => {
            violations.extend(
                rule_violations
                    .into_iter()
                    .filter(|v| email.is_some() || v.field() != Some("email")),
            );
            Err(Violations::from_unsorted(violations))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
