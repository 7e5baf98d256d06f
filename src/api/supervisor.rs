use crate::{
    auth::auth::AuthUser,
    model::supervisor::Supervisor,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

const EDITABLE_COLUMNS: &[&str] = &["name", "email", "division"];

#[derive(Deserialize, ToSchema)]
pub struct CreateSupervisor {
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi@company.example", format = "email")]
    pub email: String,
    #[schema(example = "Engineering", nullable = true)]
    pub division: Option<String>,
}

/// Create Supervisor
#[utoipa::path(
    post,
    path = "/api/v1/supervisors",
    request_body = CreateSupervisor,
    responses(
        (status = 200, description = "Supervisor created successfully"),
        (status = 400, description = "Duplicate email"),
        (status = 401),
        (status = 403),
        (status = 500)
    ),
    tag = "Supervisor",
    security(("bearer_auth" = []))
)]
pub async fn create_supervisor(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSupervisor>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query(r#"INSERT INTO supervisors (name, email, division) VALUES (?, ?, ?)"#)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.division)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Supervisor created successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Supervisor email already exists"
                    })));
                }
            }
            error!(error = %e, "Failed to create supervisor");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List Supervisors
#[utoipa::path(
    get,
    path = "/api/v1/supervisors",
    responses(
        (status = 200, description = "All supervisors", body = [Supervisor]),
        (status = 401),
        (status = 403)
    ),
    tag = "Supervisor",
    security(("bearer_auth" = []))
)]
pub async fn list_supervisors(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let supervisors = sqlx::query_as::<_, Supervisor>("SELECT * FROM supervisors ORDER BY name")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch supervisors");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(supervisors))
}

/// Get Supervisor by ID
#[utoipa::path(
    get,
    path = "/api/v1/supervisors/{supervisor_id}",
    params(("supervisor_id", Path, description = "Supervisor ID")),
    responses(
        (status = 200, description = "Supervisor found", body = Supervisor),
        (status = 404, description = "Supervisor not found"),
        (status = 401),
        (status = 403)
    ),
    tag = "Supervisor",
    security(("bearer_auth" = []))
)]
pub async fn get_supervisor(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let supervisor_id = path.into_inner();

    let supervisor = sqlx::query_as::<_, Supervisor>("SELECT * FROM supervisors WHERE id = ?")
        .bind(supervisor_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, supervisor_id, "Failed to fetch supervisor");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match supervisor {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Supervisor not found"
        }))),
    }
}

/// Update Supervisor
#[utoipa::path(
    put,
    path = "/api/v1/supervisors/{supervisor_id}",
    params(("supervisor_id", Path, description = "Supervisor ID")),
    request_body(content = Object, example = json!({ "division": "Product" })),
    responses(
        (status = 200, description = "Supervisor updated successfully"),
        (status = 400, description = "Unknown column"),
        (status = 404, description = "Supervisor not found"),
        (status = 401),
        (status = 403),
        (status = 500)
    ),
    tag = "Supervisor",
    security(("bearer_auth" = []))
)]
pub async fn update_supervisor(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let supervisor_id = path.into_inner();

    let update = build_update_sql("supervisors", EDITABLE_COLUMNS, &body, "id", supervisor_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            error!(error = %e, supervisor_id, "Failed to update supervisor");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Supervisor not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Supervisor updated successfully"
    })))
}

/// Delete Supervisor
#[utoipa::path(
    delete,
    path = "/api/v1/supervisors/{supervisor_id}",
    params(("supervisor_id", Path, description = "Supervisor ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 400, description = "Supervisor still referenced"),
        (status = 404, description = "Supervisor not found"),
        (status = 401),
        (status = 403),
        (status = 500)
    ),
    tag = "Supervisor",
    security(("bearer_auth" = []))
)]
pub async fn delete_supervisor(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let supervisor_id = path.into_inner();

    let result = sqlx::query("DELETE FROM supervisors WHERE id = ?")
        .bind(supervisor_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Supervisor not found"
                })));
            }
            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Supervisor still has assigned interns or tasks"
                    })));
                }
            }
            error!(error = %e, supervisor_id, "Failed to delete supervisor");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
