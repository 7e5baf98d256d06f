use crate::auth::auth::AuthUser;
use crate::model::assessment::Assessment;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateAssessment {
    #[schema(example = 42)]
    pub intern_id: u64,
    /// Assessment month, YYYY-MM
    #[schema(example = "2026-03")]
    pub period: String,
    #[schema(example = 88.0)]
    pub discipline: f64,
    #[schema(example = 90.0)]
    pub teamwork: f64,
    #[schema(example = 84.0)]
    pub technical: f64,
    #[schema(example = 86.0)]
    pub communication: f64,
    #[schema(example = "Strong month, keep pairing on reviews.", nullable = true)]
    pub remarks: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AssessmentFilter {
    #[schema(example = 42)]
    /// Filter by intern ID
    pub intern_id: Option<u64>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AssessmentListResponse {
    pub data: Vec<Assessment>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

fn valid_score(v: f64) -> bool {
    v.is_finite() && (0.0..=100.0).contains(&v)
}

/// Mean of the four component scores, two decimals.
fn overall_score(discipline: f64, teamwork: f64, technical: f64, communication: f64) -> f64 {
    let mean = (discipline + teamwork + technical + communication) / 4.0;
    (mean * 100.0).round() / 100.0
}

/// First day of the assessment month.
fn parse_period(period: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d").ok()
}

/* =========================
Create assessment (Supervisor)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/assessments",
    request_body = CreateAssessment,
    responses(
        (status = 200, description = "Assessment recorded", body = Object, example = json!({
            "message": "Assessment recorded",
            "overall": 87.0
        })),
        (status = 400, description = "Bad score, bad period, or duplicate period"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No supervisor profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assessment"
)]
pub async fn create_assessment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAssessment>,
) -> actix_web::Result<impl Responder> {
    let supervisor_id = auth.require_supervisor_profile()?;

    let scores = [
        payload.discipline,
        payload.teamwork,
        payload.technical,
        payload.communication,
    ];
    if scores.iter().any(|s| !valid_score(*s)) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Scores must be between 0 and 100"
        })));
    }

    let Some(period) = parse_period(&payload.period) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "period must be YYYY-MM"
        })));
    };

    let overall = overall_score(
        payload.discipline,
        payload.teamwork,
        payload.technical,
        payload.communication,
    );

    let result = sqlx::query(
        r#"
        INSERT INTO assessments
            (intern_id, supervisor_id, period, discipline, teamwork, technical,
             communication, overall, remarks)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.intern_id)
    .bind(supervisor_id)
    .bind(period)
    .bind(payload.discipline)
    .bind(payload.teamwork)
    .bind(payload.technical)
    .bind(payload.communication)
    .bind(overall)
    .bind(&payload.remarks)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Assessment recorded",
            "overall": overall
        }))),
        Err(e) => {
            // UNIQUE (intern_id, period) or unknown intern
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Assessment for this intern and period already exists, or intern is unknown"
                    })));
                }
            }
            error!(error = %e, supervisor_id, "Failed to record assessment");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Single assessment, with the intern-ownership guard.
#[utoipa::path(
    get,
    path = "/api/v1/assessments/{assessment_id}",
    params(
        ("assessment_id" = u64, Path, description = "Assessment ID")
    ),
    responses(
        (status = 200, description = "Assessment found", body = Assessment),
        (status = 404, description = "Assessment not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assessment"
)]
pub async fn get_assessment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let assessment_id = path.into_inner();

    let assessment = sqlx::query_as::<_, Assessment>(
        r#"
        SELECT id, intern_id, supervisor_id, period, discipline, teamwork, technical,
               communication, overall, remarks, created_at
        FROM assessments
        WHERE id = ?
        "#,
    )
    .bind(assessment_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, assessment_id, "Failed to fetch assessment");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match assessment {
        Some(data) => {
            if auth.is_intern() && auth.require_intern_profile()? != data.intern_id {
                return Err(actix_web::error::ErrorForbidden(
                    "Interns may only view their own assessments",
                ));
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Assessment not found"
        }))),
    }
}

/// Paginated assessment list. Interns are pinned to their own.
#[utoipa::path(
    get,
    path = "/api/v1/assessments",
    params(AssessmentFilter),
    responses(
        (status = 200, description = "Paginated assessment list", body = AssessmentListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assessment"
)]
pub async fn list_assessments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AssessmentFilter>,
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
    let mut intern_arg: Option<u64> = None;

    if let Some(intern_id) = pinned_intern {
        where_sql.push_str(" AND intern_id = ?");
        intern_arg = Some(intern_id);
    }

    let count_sql = format!("SELECT COUNT(*) FROM assessments{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(intern_id) = intern_arg {
        count_q = count_q.bind(intern_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count assessments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, intern_id, supervisor_id, period, discipline, teamwork, technical,
               communication, overall, remarks, created_at
        FROM assessments
        {}
        ORDER BY period DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Assessment>(&data_sql);
    if let Some(intern_id) = intern_arg {
        data_q = data_q.bind(intern_id);
    }

    let assessments = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch assessments");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AssessmentListResponse {
        data: assessments,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_is_the_mean_to_two_decimals() {
        assert_eq!(overall_score(88.0, 90.0, 84.0, 86.0), 87.0);
        assert_eq!(overall_score(80.0, 90.0, 85.0, 88.0), 85.75);
        // 70 + 71 + 71 + 71 = 283 / 4 = 70.75
        assert_eq!(overall_score(70.0, 71.0, 71.0, 71.0), 70.75);
        // Thirds round at the second decimal: 100/3 repeated.
        assert_eq!(overall_score(33.0, 33.0, 33.0, 34.0), 33.25);
    }

    #[test]
    fn score_bounds() {
        assert!(valid_score(0.0));
        assert!(valid_score(100.0));
        assert!(!valid_score(-0.5));
        assert!(!valid_score(100.5));
        assert!(!valid_score(f64::NAN));
        assert!(!valid_score(f64::INFINITY));
    }

    #[test]
    fn period_parses_to_first_of_month() {
        assert_eq!(
            parse_period("2026-03"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert!(parse_period("2026-13").is_none());
        assert!(parse_period("spring").is_none());
    }
}
