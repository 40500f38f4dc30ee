use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::user_dto::{CreateUserResponse, MessageResponse, SignupPayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Joined the waitlist", body = CreateUserResponse),
        (status = 400, description = "Invalid input", body = [crate::utils::validation::Violation]),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 500, description = "Unexpected error", body = MessageResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let user = state.signup_service.submit_signup(&body).await?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse::from(user))))
}
