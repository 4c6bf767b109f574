use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    #[schema(example = "admin1@example.com")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,
}
