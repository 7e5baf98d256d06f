use crate::auth::auth::AuthUser;
use crate::model::role::Role;
use crate::model::task::Task;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateTask {
    #[schema(example = 42)]
    pub intern_id: u64,
    #[schema(example = "Weekly report #4")]
    pub title: String,
    #[schema(example = "Summarize the sprint and blockers.", nullable = true)]
    pub description: Option<String>,
    #[schema(example = "2026-03-13", format = "date", value_type = String, nullable = true)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitTask {
    #[schema(example = "Draft in the shared drive.", nullable = true)]
    pub submission_note: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Revision,
}

impl ReviewDecision {
    fn as_str(&self) -> &str {
        match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Revision => "revision",
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ReviewTask {
    #[schema(example = "revision")]
    pub decision: ReviewDecision,
    #[schema(example = "Add the incident timeline.", nullable = true)]
    pub feedback: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TaskFilter {
    #[schema(example = 42)]
    /// Filter by intern ID
    pub intern_id: Option<u64>,
    #[schema(example = 3)]
    /// Filter by assigning supervisor
    pub supervisor_id: Option<u64>,
    #[schema(example = "submitted")]
    /// Filter by task status
    pub status: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct TaskListResponse {
    pub data: Vec<Task>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 4)]
    pub total: i64,
}

enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/* =========================
Assign task (Supervisor)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTask,
    responses(
        (status = 200, description = "Task assigned", body = Object, example = json!({
            "message": "Task assigned",
            "status": "assigned"
        })),
        (status = 400, description = "Unknown intern"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No supervisor profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Task"
)]
pub async fn create_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTask>,
) -> actix_web::Result<impl Responder> {
    let supervisor_id = auth.require_supervisor_profile()?;

    if payload.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Task title cannot be empty"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (intern_id, supervisor_id, title, description, due_date)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.intern_id)
    .bind(supervisor_id)
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(payload.due_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Task assigned",
            "status": "assigned"
        }))),
        Err(e) => {
            // FK failure: no such intern
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown intern"
                    })));
                }
            }
            error!(error = %e, supervisor_id, "Failed to assign task");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/* =========================
Submit task (Intern)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{task_id}/submit",
    params(
        ("task_id" = u64, Path, description = "Task ID")
    ),
    request_body = SubmitTask,
    responses(
        (status = 200, description = "Task submitted", body = Object, example = json!({
            "message": "Task submitted",
            "status": "submitted"
        })),
        (status = 400, description = "Task not found, not yours, or not open for submission"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No intern profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Task"
)]
pub async fn submit_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<SubmitTask>,
) -> actix_web::Result<impl Responder> {
    let intern_id = auth.require_intern_profile()?;

    let task_id = path.into_inner();

    // Re-submission after a revision verdict goes through the same door.
    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET status = 'submitted', submission_note = ?, submitted_at = NOW()
        WHERE id = ?
        AND intern_id = ?
        AND status IN ('assigned', 'revision')
        "#,
    )
    .bind(&payload.submission_note)
    .bind(task_id)
    .bind(intern_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, task_id, "Submit task failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Task not found, not yours, or not open for submission"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task submitted",
        "status": "submitted"
    })))
}

/* =========================
Review task (Supervisor/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{task_id}/review",
    params(
        ("task_id" = u64, Path, description = "Task ID")
    ),
    request_body = ReviewTask,
    responses(
        (status = 200, description = "Review recorded", body = Object, example = json!({
            "message": "Review recorded",
            "status": "approved"
        })),
        (status = 400, description = "Task not found or not awaiting review"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Task"
)]
pub async fn review_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ReviewTask>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let task_id = path.into_inner();

    // Supervisors review only tasks they assigned; admins review anything.
    let result = if auth.role == Role::Admin {
        sqlx::query(
            r#"
            UPDATE tasks
            SET status = ?, feedback = ?, reviewed_at = NOW()
            WHERE id = ? AND status = 'submitted'
            "#,
        )
        .bind(payload.decision.as_str())
        .bind(&payload.feedback)
        .bind(task_id)
        .execute(pool.get_ref())
        .await
    } else {
        let supervisor_id = auth.require_supervisor_profile()?;
        sqlx::query(
            r#"
            UPDATE tasks
            SET status = ?, feedback = ?, reviewed_at = NOW()
            WHERE id = ? AND supervisor_id = ? AND status = 'submitted'
            "#,
        )
        .bind(payload.decision.as_str())
        .bind(&payload.feedback)
        .bind(task_id)
        .bind(supervisor_id)
        .execute(pool.get_ref())
        .await
    };

    let result = result.map_err(|e| {
        error!(error = %e, task_id, "Review task failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Task not found or not awaiting review"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Review recorded",
        "status": payload.decision.as_str()
    })))
}

/// Single task, with the intern-ownership guard.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}",
    params(
        ("task_id" = u64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Task"
)]
pub async fn get_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    let task = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, intern_id, supervisor_id, title, description, due_date, status,
               submission_note, feedback, created_at, submitted_at, reviewed_at
        FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(task_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, task_id, "Failed to fetch task");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match task {
        Some(data) => {
            if auth.is_intern() && auth.require_intern_profile()? != data.intern_id {
                return Err(actix_web::error::ErrorForbidden(
                    "Interns may only view their own tasks",
                ));
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Task not found"
        }))),
    }
}

/// Paginated task list. Interns are pinned to their own tasks.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskFilter),
    responses(
        (status = 200, description = "Paginated task list", body = TaskListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Task"
)]
pub async fn list_tasks(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TaskFilter>,
) -> actix_web::Result<impl Responder> {
    let pinned_intern = if auth.is_intern() {
        Some(auth.require_intern_profile()?)
    } else {
        auth.require_supervisor_or_admin()?;
        query.intern_id
    };

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(intern_id) = pinned_intern {
        where_sql.push_str(" AND intern_id = ?");
        args.push(FilterValue::U64(intern_id));
    }

    if let Some(supervisor_id) = query.supervisor_id {
        where_sql.push_str(" AND supervisor_id = ?");
        args.push(FilterValue::U64(supervisor_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM tasks{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count tasks");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, intern_id, supervisor_id, title, description, due_date, status,
               submission_note, feedback, created_at, submitted_at, reviewed_at
        FROM tasks
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Task>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let tasks = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch task list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(TaskListResponse {
        data: tasks,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
