use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub intern_id: u64,
    #[schema(example = "2026-03-09", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-11", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: String,
    #[schema(example = "dengue fever", nullable = true)]
    pub reason: Option<String>,
    #[schema(example = "pending", nullable = true)]
    pub status: Option<String>,
    #[schema(example = "2026-03-08T09:00:00Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
