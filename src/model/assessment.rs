use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Monthly supervisor assessment. `overall` is derived at creation time
/// (mean of the four components, two decimals), never supplied by the
/// client.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Assessment {
    #[schema(example = 5)]
    pub id: u64,
    #[schema(example = 42)]
    pub intern_id: u64,
    #[schema(example = 3)]
    pub supervisor_id: u64,
    #[schema(example = "2026-03-01", format = "date", value_type = String)]
    pub period: NaiveDate,
    #[schema(example = 85.0)]
    pub discipline: f64,
    #[schema(example = 90.0)]
    pub teamwork: f64,
    #[schema(example = 88.0)]
    pub technical: f64,
    #[schema(example = 82.0)]
    pub communication: f64,
    #[schema(example = 86.25)]
    pub overall: f64,
    #[schema(example = "Strong month, keep pairing.", nullable = true)]
    pub remarks: Option<String>,
    #[schema(format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
