use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "rani.putri")]
    pub username: String,
    #[schema(example = "s3cret-enough")]
    pub password: String,
    /// 2 = supervisor, 3 = intern. Admin accounts cannot self-register.
    #[schema(example = 3)]
    pub role_id: u8,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "rani.putri")]
    pub username: String,
    #[schema(example = "s3cret-enough")]
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // BIGINT UNSIGNED
    pub username: String,
    pub password: String,
    pub role_id: u8,
    pub intern_id: Option<u64>,
    pub supervisor_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
    /// Present only if this account is linked to an intern profile.
    pub intern_id: Option<u64>,
    /// Present only if this account is linked to a supervisor profile.
    pub supervisor_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
