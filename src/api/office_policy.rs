use crate::attendance::geo::Coordinates;
use crate::auth::auth::AuthUser;
use crate::model::office_policy::OfficePolicy;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

/// The single active policy row. Every check-in evaluation starts here.
pub async fn load_policy(pool: &MySqlPool) -> Result<OfficePolicy, sqlx::Error> {
    sqlx::query_as::<_, OfficePolicy>(
        r#"
        SELECT office_lat, office_lng, max_distance_m, work_start, late_after, work_end
        FROM office_policy
        WHERE id = 1
        "#,
    )
    .fetch_one(pool)
    .await
}

#[derive(Deserialize, ToSchema)]
pub struct PolicyUpdateReq {
    #[schema(example = -7.052683)]
    pub office_lat: f64,
    #[schema(example = 110.469375)]
    pub office_lng: f64,
    #[schema(example = 100.0)]
    pub max_distance_m: f64,
    #[schema(value_type = String, example = "08:00:00")]
    pub work_start: NaiveTime,
    #[schema(value_type = String, example = "08:15:00")]
    pub late_after: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub work_end: NaiveTime,
}

#[utoipa::path(
    get,
    path = "/api/v1/policy",
    responses(
        (status = 200, description = "Active office policy", body = OfficePolicy),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Policy"
)]
pub async fn get_policy(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let policy = load_policy(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to load office policy");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(policy))
}

/// Full replacement of the policy. Partial edits are not supported so a
/// reviewer always sees the whole geofence and schedule in one request.
#[utoipa::path(
    put,
    path = "/api/v1/policy",
    request_body = PolicyUpdateReq,
    responses(
        (status = 200, description = "Policy updated"),
        (status = 400, description = "Invalid coordinates, radius, or schedule"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Policy"
)]
pub async fn update_policy(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PolicyUpdateReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let office = Coordinates {
        lat: payload.office_lat,
        lng: payload.office_lng,
    };

    if !office.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Office coordinates are out of range"
        })));
    }

    if !payload.max_distance_m.is_finite() || payload.max_distance_m <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "max_distance_m must be a positive number"
        })));
    }

    if payload.work_start > payload.late_after || payload.late_after > payload.work_end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Schedule must satisfy work_start <= late_after <= work_end"
        })));
    }

    sqlx::query(
        r#"
        UPDATE office_policy
        SET office_lat = ?, office_lng = ?, max_distance_m = ?,
            work_start = ?, late_after = ?, work_end = ?
        WHERE id = 1
        "#,
    )
    .bind(payload.office_lat)
    .bind(payload.office_lng)
    .bind(payload.max_distance_m)
    .bind(payload.work_start)
    .bind(payload.late_after)
    .bind(payload.work_end)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to update office policy");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Office policy updated"
    })))
}
