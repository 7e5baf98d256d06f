use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Supervisor {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi.santoso@company.example.com")]
    pub email: String,
    #[schema(example = "Platform Engineering", nullable = true)]
    pub division: Option<String>,
}
