use crate::{
    auth::auth::AuthUser,
    model::intern::Intern,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

const EDITABLE_COLUMNS: &[&str] = &[
    "intern_code",
    "first_name",
    "last_name",
    "email",
    "phone",
    "university",
    "major",
    "supervisor_id",
    "start_date",
    "end_date",
    "status",
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateIntern {
    #[schema(example = "INT-2026-042", value_type = String)]
    pub intern_code: String,
    #[schema(example = "Sari", value_type = String)]
    pub first_name: String,
    #[schema(example = "Wulandari", value_type = String, nullable = true)]
    pub last_name: Option<String>,
    #[schema(example = "sari@student.undip.ac.id", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "+628123456789", value_type = String, nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "Universitas Diponegoro", value_type = String, nullable = true)]
    pub university: Option<String>,
    #[schema(example = "Informatics", value_type = String, nullable = true)]
    pub major: Option<String>,
    #[schema(example = 3, value_type = u64, nullable = true)]
    pub supervisor_id: Option<u64>,
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-31", format = "date", value_type = String, nullable = true)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InternQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub supervisor_id: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct InternListResponse {
    pub data: Vec<Intern>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 7)]
    pub total: i64,
}

// Typed values for dynamically built WHERE clauses
#[derive(Debug)]
enum FilterValue {
    U64(u64),
    Str(String),
}

/// Create Intern
#[utoipa::path(
    post,
    path = "/api/v1/interns",
    request_body = CreateIntern,
    responses(
        (status = 200, description = "Intern created successfully", body = Object, example = json!({
            "message": "Intern created successfully"
        })),
        (status = 400, description = "Duplicate code or email", body = Object, example = json!({
            "message": "Intern code or email already exists"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Intern",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_intern(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateIntern>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO interns
        (intern_code, first_name, last_name, email, phone, university, major,
         supervisor_id, start_date, end_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.intern_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.university)
    .bind(&payload.major)
    .bind(payload.supervisor_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Intern created successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Intern code or email already exists"
                    })));
                }
            }
            error!(error = %e, "Failed to create intern");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/interns",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("supervisor_id", Query, description = "Filter by supervisor"),
        ("status", Query, description = "Filter by status"),
        ("search", Query, description = "Search by name, email, or code")
    ),
    responses(
        (status = 200, description = "Paginated intern list", body = InternListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Intern",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_interns(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<InternQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(supervisor_id) = query.supervisor_id {
        conditions.push("supervisor_id = ?");
        bindings.push(FilterValue::U64(supervisor_id));
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status.clone()));
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ? OR intern_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM interns {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting interns");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(v),
            FilterValue::Str(v) => count_query.bind(v),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count interns");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM interns {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching interns");

    let mut data_query = sqlx::query_as::<_, Intern>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(v),
            FilterValue::Str(v) => data_query.bind(v),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let interns = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch interns");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(InternListResponse {
        data: interns,
        page,
        per_page,
        total,
    }))
}

/// Get Intern by ID. Interns can only read their own profile.
#[utoipa::path(
    get,
    path = "/api/v1/interns/{intern_id}",
    params(
        ("intern_id", Path, description = "Intern ID")
    ),
    responses(
        (status = 200, description = "Intern found", body = Intern),
        (status = 404, description = "Intern not found", body = Object, example = json!({
            "message": "Intern not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Intern",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_intern(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let intern_id: u64 = path.into_inner();

    if auth.is_intern() {
        let own = auth.require_intern_profile()?;
        if own != intern_id {
            return Err(actix_web::error::ErrorForbidden(
                "Interns may only view their own profile",
            ));
        }
    }

    let intern = sqlx::query_as::<_, Intern>(
        r#"
        SELECT * FROM interns WHERE id = ?
        "#,
    )
    .bind(intern_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, intern_id, "Failed to fetch intern");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match intern {
        Some(i) => Ok(HttpResponse::Ok().json(i)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Intern not found"
        }))),
    }
}

/// Update Intern
#[utoipa::path(
    put,
    path = "/api/v1/interns/{intern_id}",
    params(
        ("intern_id", Path, description = "Intern ID")
    ),
    request_body(content = Object, example = json!({
        "supervisor_id": 3,
        "status": "completed"
    })),
    responses(
        (status = 200, description = "Intern updated successfully"),
        (status = 400, description = "Unknown column"),
        (status = 404, description = "Intern not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Intern",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_intern(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let intern_id = path.into_inner();

    let update = build_update_sql("interns", EDITABLE_COLUMNS, &body, "id", intern_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            error!(error = %e, intern_id, "Failed to update intern");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Intern not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Intern updated successfully"
    })))
}

/// Delete Intern
#[utoipa::path(
    delete,
    path = "/api/v1/interns/{intern_id}",
    params(
        ("intern_id", Path, description = "Intern ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 400, description = "Intern still has linked records"),
        (status = 404, description = "Intern not found", body = Object, example = json!({
            "message": "Intern not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Intern",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_intern(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let intern_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM interns WHERE id = ?"#)
        .bind(intern_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Intern not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            // FK violations surface as 23000: attendance, tasks, or
            // assessments still reference this intern.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Intern still has attendance or task records"
                    })));
                }
            }

            error!(error = %e, intern_id, "Failed to delete intern");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
