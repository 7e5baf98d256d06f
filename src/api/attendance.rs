use crate::attendance::evaluator::{
    self, AttendanceError, classify_permission, evaluate_check_in, evaluate_check_out,
};
use crate::attendance::geo::Coordinates;
use crate::auth::auth::AuthUser;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, PermissionKind};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

/// Columns the admin edit endpoint may touch. `intern_id` and `date` are
/// off-limits: together they are the row's identity.
const EDITABLE_COLUMNS: &[&str] = &[
    "check_in",
    "check_out",
    "check_in_lat",
    "check_in_lng",
    "distance_m",
    "status",
    "notes",
    "proof_file",
];

#[derive(Deserialize, ToSchema)]
pub struct PermissionReq {
    #[schema(example = "sick")]
    pub kind: PermissionKind,
    /// Reference to the uploaded proof document. Required for auditability.
    #[schema(example = "uploads/med-cert-42.pdf")]
    pub proof_file: String,
    #[schema(example = "doctor ordered two days of rest", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Filter by intern ID
    #[schema(example = 42)]
    pub intern_id: Option<u64>,
    /// Filter by status
    #[schema(example = "late")]
    pub status: Option<String>,
    /// Records on or after this date (YYYY-MM-DD)
    #[schema(example = "2026-03-01")]
    pub date_from: Option<String>,
    /// Records on or before this date (YYYY-MM-DD)
    #[schema(example = "2026-03-31")]
    pub date_to: Option<String>,
    /// Pagination page number (starts at 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// Intern to report on. Interns may omit it (their own profile is
    /// implied) and cannot ask for anyone else's.
    #[schema(example = 42)]
    pub intern_id: Option<u64>,
    /// Calendar month, YYYY-MM
    #[schema(example = "2026-03")]
    pub month: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    #[schema(example = 42)]
    pub intern_id: u64,
    #[schema(example = "2026-03")]
    pub month: String,
    #[schema(example = 18)]
    pub present: u32,
    #[schema(example = 2)]
    pub late: u32,
    #[schema(example = 1)]
    pub absent: u32,
    #[schema(example = 1)]
    pub sick: u32,
    #[schema(example = 0)]
    pub permission: u32,
    #[schema(example = 22)]
    pub days_recorded: u32,
    /// Sum of per-day worked durations, hours, two decimals
    #[schema(example = 158.75)]
    pub total_work_hours: f64,
}

/// Evaluator failures are caller mistakes, reported as 400 with the
/// error's own message.
fn reject(err: AttendanceError) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "message": err.to_string() }))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

async fn fetch_record(
    pool: &MySqlPool,
    intern_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, intern_id, date, check_in, check_out, check_in_lat, check_in_lng,
               distance_m, status, notes, proof_file
        FROM attendance_records
        WHERE intern_id = ? AND date = ?
        "#,
    )
    .bind(intern_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Check-in endpoint: geofenced, status derived from the clock.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(
        content = Coordinates,
        description = "Client GPS fix at the moment of check-in",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "present",
            "distance_m": 50.04
        })),
        (status = 400, description = "Out of range, invalid coordinates, or already checked in", body = Object, example = json!({
            "message": "already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No intern profile"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<Coordinates>,
) -> actix_web::Result<impl Responder> {
    let intern_id = auth.require_intern_profile()?;

    let now = now_local();
    let today = now.date();

    let policy = super::office_policy::load_policy(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load office policy");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let existing = fetch_record(pool.get_ref(), intern_id, today)
        .await
        .map_err(|e| {
            error!(error = %e, intern_id, "Failed to load attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let decision = match evaluate_check_in(now.time(), *payload, &policy, existing.as_ref()) {
        Ok(d) => d,
        Err(e) => return Ok(reject(e)),
    };

    let persisted = match &existing {
        // First touch of the day: the UNIQUE (intern_id, date) key turns a
        // concurrent double-tap into a database error we map right back to
        // the duplicate answer.
        None => {
            let result = sqlx::query(
                r#"
                INSERT INTO attendance_records
                    (intern_id, date, check_in, check_in_lat, check_in_lng, distance_m, status)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(intern_id)
            .bind(today)
            .bind(now.time())
            .bind(payload.lat)
            .bind(payload.lng)
            .bind(decision.distance_m)
            .bind(decision.status.to_string())
            .execute(pool.get_ref())
            .await;

            match result {
                Ok(_) => true,
                Err(e) => {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.code().as_deref() == Some("23000") {
                            return Ok(reject(AttendanceError::AlreadyCheckedIn));
                        }
                    }
                    error!(error = %e, intern_id, "Check-in insert failed");
                    return Err(actix_web::error::ErrorInternalServerError(
                        "Internal Server Error",
                    ));
                }
            }
        }
        // A record without a check-in (permission or admin pre-entry):
        // fill it, guarded so a racing check-in loses cleanly.
        Some(record) => {
            let result = sqlx::query(
                r#"
                UPDATE attendance_records
                SET check_in = ?, check_in_lat = ?, check_in_lng = ?, distance_m = ?, status = ?
                WHERE id = ? AND check_in IS NULL
                "#,
            )
            .bind(now.time())
            .bind(payload.lat)
            .bind(payload.lng)
            .bind(decision.distance_m)
            .bind(decision.status.to_string())
            .bind(record.id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, intern_id, "Check-in update failed");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            result.rows_affected() > 0
        }
    };

    if !persisted {
        return Ok(reject(AttendanceError::AlreadyCheckedIn));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked in successfully",
        "status": decision.status.to_string(),
        "distance_m": round2(decision.distance_m),
    })))
}

/// Check-out endpoint. Deliberately not geofenced; see the evaluator.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = Object, example = json!({
            "message": "Checked out successfully",
            "work_hours": 9.5
        })),
        (status = 400, description = "No check-in today, or already checked out", body = Object, example = json!({
            "message": "no check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No intern profile"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let intern_id = auth.require_intern_profile()?;

    let now = now_local();
    let today = now.date();

    let existing = fetch_record(pool.get_ref(), intern_id, today)
        .await
        .map_err(|e| {
            error!(error = %e, intern_id, "Failed to load attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let check_in = match evaluate_check_out(existing.as_ref()) {
        Ok(t) => t,
        Err(e) => return Ok(reject(e)),
    };

    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET check_out = ?
        WHERE intern_id = ? AND date = ? AND check_out IS NULL
        "#,
    )
    .bind(now.time())
    .bind(intern_id)
    .bind(today)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, intern_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(reject(AttendanceError::AlreadyCheckedOut));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully",
        "work_hours": evaluator::working_hours(check_in, now.time()),
    })))
}

/// Sick/permission submission: no geolocation, proof file mandatory.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/permission",
    request_body = PermissionReq,
    responses(
        (status = 200, description = "Recorded", body = Object, example = json!({
            "message": "Permission recorded",
            "status": "sick"
        })),
        (status = 400, description = "Missing proof, or already checked in today"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No intern profile"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn submit_permission(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PermissionReq>,
) -> actix_web::Result<impl Responder> {
    let intern_id = auth.require_intern_profile()?;

    if payload.proof_file.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "A proof file is required for sick/permission days"
        })));
    }

    let today = now_local().date();

    let existing = fetch_record(pool.get_ref(), intern_id, today)
        .await
        .map_err(|e| {
            error!(error = %e, intern_id, "Failed to load attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if let Some(record) = &existing {
        if record.check_in.is_some() {
            return Ok(reject(AttendanceError::AlreadyCheckedIn));
        }
    }

    let status = classify_permission(payload.kind);

    let outcome = match &existing {
        None => {
            let result = sqlx::query(
                r#"
                INSERT INTO attendance_records (intern_id, date, status, notes, proof_file)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(intern_id)
            .bind(today)
            .bind(status.to_string())
            .bind(&payload.notes)
            .bind(&payload.proof_file)
            .execute(pool.get_ref())
            .await;

            match result {
                Ok(_) => true,
                Err(e) => {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.code().as_deref() == Some("23000") {
                            // Lost a race with another submission or a
                            // check-in. Let the client re-read today's state.
                            return Ok(HttpResponse::BadRequest().json(json!({
                                "message": "Attendance for today was just recorded, refresh and retry"
                            })));
                        }
                    }
                    error!(error = %e, intern_id, "Permission insert failed");
                    return Err(actix_web::error::ErrorInternalServerError(
                        "Internal Server Error",
                    ));
                }
            }
        }
        // Re-submission overwrites kind/notes/proof while no check-in exists.
        Some(record) => {
            let result = sqlx::query(
                r#"
                UPDATE attendance_records
                SET status = ?, notes = ?, proof_file = ?
                WHERE id = ? AND check_in IS NULL
                "#,
            )
            .bind(status.to_string())
            .bind(&payload.notes)
            .bind(&payload.proof_file)
            .bind(record.id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, intern_id, "Permission update failed");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            result.rows_affected() > 0
        }
    };

    if !outcome {
        return Ok(reject(AttendanceError::AlreadyCheckedIn));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Permission recorded",
        "status": status.to_string(),
    })))
}

/// The caller's own record for today.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's record", body = AttendanceRecord),
        (status = 404, description = "Nothing recorded today", body = Object, example = json!({
            "message": "No attendance recorded today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No intern profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(auth: AuthUser, pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let intern_id = auth.require_intern_profile()?;

    let record = fetch_record(pool.get_ref(), intern_id, now_local().date())
        .await
        .map_err(|e| {
            error!(error = %e, intern_id, "Failed to load attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match record {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No attendance recorded today"
        }))),
    }
}

// Typed values for dynamically built WHERE clauses
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

/// Attendance list for supervisors/admins
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance records", body = AttendanceListResponse),
        (status = 400, description = "Bad filter value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(intern_id) = query.intern_id {
        where_sql.push_str(" AND intern_id = ?");
        args.push(FilterValue::U64(intern_id));
    }

    if let Some(status) = query.status.as_deref() {
        if status.parse::<AttendanceStatus>().is_err() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Unknown status filter"
            })));
        }
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(from) = query.date_from.as_deref() {
        match NaiveDate::parse_from_str(from, "%Y-%m-%d") {
            Ok(d) => {
                where_sql.push_str(" AND date >= ?");
                args.push(FilterValue::Date(d));
            }
            Err(_) => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "date_from must be YYYY-MM-DD"
                })));
            }
        }
    }

    if let Some(to) = query.date_to.as_deref() {
        match NaiveDate::parse_from_str(to, "%Y-%m-%d") {
            Ok(d) => {
                where_sql.push_str(" AND date <= ?");
                args.push(FilterValue::Date(d));
            }
            Err(_) => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "date_to must be YYYY-MM-DD"
                })));
            }
        }
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance_records{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.clone()),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, intern_id, date, check_in, check_out, check_in_lat, check_in_lng,
               distance_m, status, notes, proof_file
        FROM attendance_records
        {}
        ORDER BY date DESC, intern_id
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch attendance records");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Administrative edit: the path for corrections and for entering
/// `absent`/`sick`/`permission` days on behalf of an intern.
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{record_id}",
    params(("record_id" = u64, Path, description = "Attendance record ID")),
    request_body(content = Object, description = "Columns to set", example = json!({
        "status": "absent",
        "notes": "no-show, no message"
    })),
    responses(
        (status = 200, description = "Record updated"),
        (status = 400, description = "Unknown column or bad status"),
        (status = 404, description = "Record not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn update_record(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let record_id = path.into_inner();

    if let Some(status) = body.get("status").and_then(|v| v.as_str()) {
        if status.parse::<AttendanceStatus>().is_err() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Unknown status value"
            })));
        }
    }

    let update = build_update_sql(
        "attendance_records",
        EDITABLE_COLUMNS,
        &body,
        "id",
        record_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            error!(error = %e, record_id, "Attendance update failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Attendance record not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record updated"
    })))
}

/// Explicit admin deletion; records are never removed any other way.
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{record_id}",
    params(("record_id" = u64, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Record not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn delete_record(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let record_id = path.into_inner();

    let result = sqlx::query("DELETE FROM attendance_records WHERE id = ?")
        .bind(record_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, record_id, "Attendance delete failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Attendance record not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted"
    })))
}

/// Month recap. Counts recorded days by status and sums worked hours.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Month summary", body = ReportResponse),
        (status = 400, description = "Bad month or missing intern_id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Interns may only query themselves")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn monthly_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let intern_id = if auth.is_intern() {
        let own = auth.require_intern_profile()?;
        match query.intern_id {
            Some(asked) if asked != own => {
                return Err(actix_web::error::ErrorForbidden(
                    "Interns may only query their own report",
                ));
            }
            _ => own,
        }
    } else {
        auth.require_supervisor_or_admin()?;
        match query.intern_id {
            Some(id) => id,
            None => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "intern_id is required"
                })));
            }
        }
    };

    let Some((first, next_month)) = month_range(&query.month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "month must be YYYY-MM"
        })));
    };

    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, intern_id, date, check_in, check_out, check_in_lat, check_in_lng,
               distance_m, status, notes, proof_file
        FROM attendance_records
        WHERE intern_id = ? AND date >= ? AND date < ?
        ORDER BY date
        "#,
    )
    .bind(intern_id)
    .bind(first)
    .bind(next_month)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, intern_id, "Failed to fetch month's records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(summarize(intern_id, &query.month, &records)))
}

/// First day of the month and first day of the next one.
fn month_range(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((first, next))
}

fn summarize(intern_id: u64, month: &str, records: &[AttendanceRecord]) -> ReportResponse {
    let mut report = ReportResponse {
        intern_id,
        month: month.to_string(),
        present: 0,
        late: 0,
        absent: 0,
        sick: 0,
        permission: 0,
        days_recorded: records.len() as u32,
        total_work_hours: 0.0,
    };

    let mut total_secs: i64 = 0;

    for record in records {
        match record.status.parse::<AttendanceStatus>() {
            Ok(AttendanceStatus::Present) => report.present += 1,
            Ok(AttendanceStatus::Late) => report.late += 1,
            Ok(AttendanceStatus::Absent) => report.absent += 1,
            Ok(AttendanceStatus::Sick) => report.sick += 1,
            Ok(AttendanceStatus::Permission) => report.permission += 1,
            Err(_) => error!(record_id = record.id, status = %record.status, "Unknown status in storage"),
        }

        if let (Some(check_in), Some(check_out)) = (record.check_in, record.check_out) {
            total_secs += (check_out - check_in).num_seconds().max(0);
        }
    }

    report.total_work_hours = round2(total_secs as f64 / 3600.0);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(day: u32, status: &str, times: Option<(NaiveTime, NaiveTime)>) -> AttendanceRecord {
        AttendanceRecord {
            id: day as u64,
            intern_id: 42,
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            check_in: times.map(|(i, _)| i),
            check_out: times.map(|(_, o)| o),
            check_in_lat: None,
            check_in_lng: None,
            distance_m: None,
            status: status.into(),
            notes: None,
            proof_file: None,
        }
    }

    #[test]
    fn month_range_spans_exactly_one_month() {
        let (first, next) = month_range("2026-03").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());

        // December rolls over the year.
        let (first, next) = month_range("2026-12").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn month_range_rejects_garbage() {
        assert!(month_range("2026-13").is_none());
        assert!(month_range("march").is_none());
        assert!(month_range("2026-03-02").is_none());
    }

    #[test]
    fn summarize_counts_statuses_and_sums_hours() {
        let records = vec![
            record(2, "present", Some((t(8, 0), t(17, 30)))),
            record(3, "present", Some((t(8, 5), t(17, 5)))),
            record(4, "late", Some((t(8, 40), t(17, 0)))),
            record(5, "sick", None),
            record(6, "absent", None),
        ];

        let report = summarize(42, "2026-03", &records);

        assert_eq!(report.present, 2);
        assert_eq!(report.late, 1);
        assert_eq!(report.sick, 1);
        assert_eq!(report.absent, 1);
        assert_eq!(report.permission, 0);
        assert_eq!(report.days_recorded, 5);
        // 9.5 + 9.0 + 8h20m = 26.833... -> rounded once at the end
        assert_eq!(report.total_work_hours, 26.83);
    }

    #[test]
    fn summarize_ignores_open_days_in_the_hour_total() {
        let records = vec![record(2, "present", None)];
        let report = summarize(42, "2026-03", &records);
        assert_eq!(report.present, 1);
        assert_eq!(report.total_work_hours, 0.0);
    }
}
