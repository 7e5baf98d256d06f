use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "intern_code": "INT-2026-042",
        "first_name": "Rani",
        "last_name": "Putri",
        "email": "rani.putri@student.example.ac.id",
        "phone": "+62812345678",
        "university": "Universitas Diponegoro",
        "major": "Informatics",
        "supervisor_id": 3,
        "start_date": "2026-02-02",
        "end_date": "2026-05-29",
        "status": "active"
    })
)]
pub struct Intern {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = "INT-2026-042")]
    pub intern_code: String,

    #[schema(example = "Rani")]
    pub first_name: String,

    #[schema(example = "Putri", nullable = true)]
    pub last_name: Option<String>,

    #[schema(example = "rani.putri@student.example.ac.id")]
    pub email: String,

    #[schema(example = "+62812345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "Universitas Diponegoro", nullable = true)]
    pub university: Option<String>,

    #[schema(example = "Informatics", nullable = true)]
    pub major: Option<String>,

    #[schema(example = 3, nullable = true)]
    pub supervisor_id: Option<u64>,

    #[schema(example = "2026-02-02", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-05-29", value_type = String, format = "date", nullable = true)]
    pub end_date: Option<NaiveDate>,

    #[schema(example = "active")]
    pub status: String,
}
