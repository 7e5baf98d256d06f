use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::leave_request::LeaveRequest;

#[derive(Serialize, Deserialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Personal,
    Academic,
}

impl LeaveType {
    fn as_str(&self) -> &str {
        match self {
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Academic => "academic",
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-03-09", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "academic")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    #[schema(example = "Mid-term exams at campus", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "data": [
        {
            "id": 1,
            "intern_id": 42,
            "start_date": "2026-03-09",
            "end_date": "2026-03-10",
            "leave_type": "academic",
            "reason": "Mid-term exams at campus",
            "status": "pending",
            "created_at": "2026-03-02T08:30:00Z"
        }
    ],
    "page": 1,
    "per_page": 10,
    "total": 1
}))]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 42)]
    /// Filter by intern ID
    pub intern_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let intern_id = auth.require_intern_profile()?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (intern_id, start_date, end_date, leave_type, reason)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(intern_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.leave_type.as_str())
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, intern_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": "pending"
    })))
}

/* =========================
Approve leave (Supervisor/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'approved'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Approve leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved"
    })))
}

/* =========================
Reject leave (Supervisor/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected successfully", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'rejected'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Reject leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected"
    })))
}

/// Single leave request. Interns see their own, staff see any.
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, intern_id, start_date, end_date, leave_type, reason, status, created_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => {
            if auth.is_intern() && auth.require_intern_profile()? != data.intern_id {
                return Err(actix_web::error::ErrorForbidden(
                    "Interns may only view their own leave requests",
                ));
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/// Paginated leave list. Interns are pinned to their own requests.
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // Interns list themselves; everyone else may filter freely.
    let pinned_intern = if auth.is_intern() {
        Some(auth.require_intern_profile()?)
    } else {
        auth.require_supervisor_or_admin()?;
        query.intern_id
    };

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(intern_id) = pinned_intern {
        where_sql.push_str(" AND intern_id = ?");
        args.push(FilterValue::U64(intern_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, intern_id, start_date, end_date, leave_type, reason, status, created_at
        FROM leave_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
