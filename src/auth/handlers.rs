use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    model::role::Role,
    models::{LoginReq, RegisterReq, TokenType, UserSql},
};
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::utils::username_cache;
use crate::utils::username_filter;

/// Inserts a new account and keeps the availability structures in sync
async fn insert_user(
    username: &str,
    password: &str,
    role_id: u8,
    pool: &MySqlPool,
) -> Result<(), HttpResponse> {
    let hashed = hash_password(password);

    let result = sqlx::query(r#"INSERT INTO users (username, password, role_id) VALUES (?, ?, ?)"#)
        .bind(username)
        .bind(hashed)
        .bind(role_id)
        .execute(pool)
        .await;

    match result {
        Ok(_) => {
            username_filter::insert(username);
            username_cache::mark_taken(username).await;
            Ok(())
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Err(HttpResponse::Conflict().json(json!({
                        "error": "Username already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to insert user");
            Err(HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            })))
        }
    }
}

/// true  => username AVAILABLE
/// false => username TAKEN
pub async fn is_username_available(username: &str, pool: &MySqlPool) -> bool {
    let username = username.to_lowercase();

    // Cuckoo filter gives a fast definite "never seen".
    if !username_filter::might_exist(&username) {
        return true;
    }

    // Moka cache gives a fast definite "taken".
    if username_cache::is_taken(&username).await {
        return false;
    }

    // Database settles the filter's false positives.
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? LIMIT 1)",
    )
    .bind(&username)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe: treat DB trouble as taken

    !exists
}

/// Account registration handler. Self-service accounts are supervisors or
/// interns; the admin role is provisioned out of band.
pub async fn register(user: web::Json<RegisterReq>, pool: web::Data<MySqlPool>) -> impl Responder {
    let username = user.username.trim();
    let password = &user.password;

    if username.is_empty() || password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Username and password must not be empty"
        }));
    }

    match Role::from_id(user.role_id) {
        Some(Role::Supervisor) | Some(Role::Intern) => {}
        Some(Role::Admin) => {
            return HttpResponse::Forbidden().json(json!({
                "error": "Admin accounts cannot be self-registered"
            }));
        }
        None => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Unknown role"
            }));
        }
    }

    if !is_username_available(username, pool.get_ref()).await {
        return HttpResponse::Conflict().json(json!({
            "error": "Username already taken"
        }));
    }

    match insert_user(username, password, user.role_id, pool.get_ref()).await {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "Account registered successfully"
        })),
        Err(err_resp) => err_resp,
    }
}

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, username, password, role_id, intern_id, supervisor_id
        FROM users
        WHERE username = ? AND is_active = TRUE
        "#,
    )
    .bind(&user.username)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Password verified, issuing tokens");

    let access_token = generate_access_token(
        db_user.id,
        db_user.username.clone(),
        db_user.role_id,
        db_user.intern_id,
        db_user.supervisor_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        db_user.id,
        db_user.username.clone(),
        db_user.role_id,
        db_user.intern_id,
        db_user.supervisor_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    debug!(
        user_id = db_user.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(db_user.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // Non-fatal bookkeeping; the cache warmup query reads this column.
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
    })
}

/// Who am I, according to my token.
#[get("/me")]
pub async fn me(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "user_id": auth.user_id,
        "username": auth.username,
        "role_id": auth.role as u8,
        "intern_id": auth.intern_id,
        "supervisor_id": auth.supervisor_id,
    }))
}

#[derive(sqlx::FromRow)]
struct RefreshRow {
    id: u64,
    user_id: u64,
    revoked: bool,
}

pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    let record = match sqlx::query_as::<_, RefreshRow>(
        r#"
        SELECT id, user_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to look up refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let record = match record {
        Some(r) if !r.revoked => r,
        _ => return HttpResponse::Unauthorized().finish(),
    };

    // Rotation: the presented token is spent either way.
    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.intern_id,
        claims.supervisor_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(record.user_id)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store rotated refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let access_token = generate_access_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.intern_id,
        claims.supervisor_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // Only refresh tokens carry a server-side record to revoke.
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // Idempotent: revoking an unknown or already-revoked jti is fine.
    let _ = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE jti = ?")
        .bind(&claims.jti)
        .execute(pool.get_ref())
        .await;

    HttpResponse::NoContent().finish()
}
