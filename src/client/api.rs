use async_trait::async_trait;
use reqwest::Client;

use crate::dto::user_dto::SignupPayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupApi: Send + Sync {
    async fn post_signup(&self, payload: &SignupPayload) -> Result<ApiResponse, ClientError>;
}

/// Talks to a running waitlist server over HTTP. No request timeout is set.
#[derive(Clone)]
pub struct HttpSignupApi {
    client: Client,
    endpoint: String,
}

impl HttpSignupApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/users", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SignupApi for HttpSignupApi {
    async fn post_signup(&self, payload: &SignupPayload) -> Result<ApiResponse, ClientError> {
        let res = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}
