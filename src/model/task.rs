use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of an assigned task: supervisor assigns, intern submits,
/// supervisor approves or sends back for revision (which the intern can
/// submit again).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[display(fmt = "assigned")]
    Assigned,
    #[display(fmt = "submitted")]
    Submitted,
    #[display(fmt = "approved")]
    Approved,
    #[display(fmt = "revision")]
    Revision,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Task {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = 42)]
    pub intern_id: u64,
    #[schema(example = 3)]
    pub supervisor_id: u64,
    #[schema(example = "Weekly report #4")]
    pub title: String,
    #[schema(example = "Summarize the sprint and blockers.", nullable = true)]
    pub description: Option<String>,
    #[schema(example = "2026-03-13", format = "date", value_type = String, nullable = true)]
    pub due_date: Option<NaiveDate>,
    #[schema(example = "assigned")]
    pub status: String,
    #[schema(example = "Draft in the shared drive.", nullable = true)]
    pub submission_note: Option<String>,
    #[schema(example = "Add the incident timeline.", nullable = true)]
    pub feedback: Option<String>,
    #[schema(example = "2026-03-06T08:30:00Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(format = "date-time", value_type = String, nullable = true)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[schema(format = "date-time", value_type = String, nullable = true)]
    pub reviewed_at: Option<DateTime<Utc>>,
}
