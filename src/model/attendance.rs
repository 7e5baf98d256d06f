use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Daily status. Fixed at check-in; the permission and admin-edit paths
/// set it directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Sick,
    Permission,
}

/// Self-service absence kinds. These bypass geolocation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Sick,
    Permission,
}

/// One intern's attendance for one calendar date.
///
/// At most one row per (intern, date) — `uq_attendance_intern_date` in the
/// schema. The evaluator assumes that constraint instead of locking.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub intern_id: u64,

    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "08:07:12", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,

    #[schema(example = "17:03:40", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,

    #[schema(example = -7.052233, nullable = true)]
    pub check_in_lat: Option<f64>,

    #[schema(example = 110.469375, nullable = true)]
    pub check_in_lng: Option<f64>,

    #[schema(example = 50.04, nullable = true)]
    pub distance_m: Option<f64>,

    #[schema(example = "present")]
    pub status: String,

    #[schema(example = "overslept, bus strike", nullable = true)]
    pub notes: Option<String>,

    #[schema(example = "uploads/med-cert-42.pdf", nullable = true)]
    pub proof_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
            AttendanceStatus::Sick,
            AttendanceStatus::Permission,
        ] {
            let s = status.to_string();
            assert_eq!(s, s.to_lowercase());
            assert_eq!(s.parse::<AttendanceStatus>().unwrap(), status);
        }
    }

    #[test]
    fn permission_kind_uses_lowercase_json() {
        let kind: PermissionKind = serde_json::from_str("\"sick\"").unwrap();
        assert_eq!(kind, PermissionKind::Sick);
        assert_eq!(
            serde_json::to_string(&PermissionKind::Permission).unwrap(),
            "\"permission\""
        );
    }
}
