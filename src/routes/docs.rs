use axum::Json;
use utoipa::OpenApi;

use crate::dto::user_dto::{CreateUserResponse, MessageResponse, SignupPayload, UserSummary};
use crate::utils::validation::Violation;

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::users::create_user, crate::routes::health::health),
    components(schemas(
        SignupPayload,
        CreateUserResponse,
        UserSummary,
        MessageResponse,
        Violation
    )),
    tags((name = "waitlist", description = "Waitlist signups"))
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
