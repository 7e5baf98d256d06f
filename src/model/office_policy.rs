use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::attendance::geo::Coordinates;

/// Geofence + work-window configuration. One admin-editable row; the
/// latest value applies to every future evaluation. Always passed into the
/// evaluator explicitly, never read through a global.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OfficePolicy {
    #[schema(example = -7.052683)]
    pub office_lat: f64,

    #[schema(example = 110.469375)]
    pub office_lng: f64,

    /// Maximum allowed check-in distance from the office, meters.
    #[schema(example = 100.0)]
    pub max_distance_m: f64,

    #[schema(example = "08:00:00", value_type = String)]
    pub work_start: NaiveTime,

    /// Late-tolerance cutoff: checking in at or before this is `present`.
    #[schema(example = "08:15:00", value_type = String)]
    pub late_after: NaiveTime,

    #[schema(example = "17:00:00", value_type = String)]
    pub work_end: NaiveTime,
}

impl OfficePolicy {
    pub fn office(&self) -> Coordinates {
        Coordinates::new(self.office_lat, self.office_lng)
    }
}
