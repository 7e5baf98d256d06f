use crate::{
    api::{assessment, attendance, intern, leave_request, office_policy, supervisor, task},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));
    let checkin_limiter = Arc::new(build_limiter(config.rate_checkin_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(handlers::me)
            .service(
                web::scope("/attendance")
                    // literal segments first so they never collide with /{id}
                    .service(
                        web::resource("/check-in")
                            .wrap(checkin_limiter)
                            .route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/permission")
                            .route(web::post().to(attendance::submit_permission)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(
                        web::resource("/report").route(web::get().to(attendance::monthly_report)),
                    )
                    // /attendance
                    .service(
                        web::resource("").route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(attendance::update_record))
                            .route(web::delete().to(attendance::delete_record)),
                    ),
            )
            .service(
                web::scope("/policy").service(
                    web::resource("")
                        .route(web::get().to(office_policy::get_policy))
                        .route(web::put().to(office_policy::update_policy)),
                ),
            )
            .service(
                web::scope("/interns")
                    // /interns
                    .service(
                        web::resource("")
                            .route(web::post().to(intern::create_intern))
                            .route(web::get().to(intern::list_interns)),
                    )
                    // /interns/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(intern::update_intern))
                            .route(web::get().to(intern::get_intern))
                            .route(web::delete().to(intern::delete_intern)),
                    ),
            )
            .service(
                web::scope("/supervisors")
                    .service(
                        web::resource("")
                            .route(web::post().to(supervisor::create_supervisor))
                            .route(web::get().to(supervisor::list_supervisors)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(supervisor::update_supervisor))
                            .route(web::get().to(supervisor::get_supervisor))
                            .route(web::delete().to(supervisor::delete_supervisor)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/tasks")
                    .service(
                        web::resource("")
                            .route(web::post().to(task::create_task))
                            .route(web::get().to(task::list_tasks)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(task::get_task)))
                    .service(
                        web::resource("/{id}/submit").route(web::put().to(task::submit_task)),
                    )
                    .service(
                        web::resource("/{id}/review").route(web::put().to(task::review_task)),
                    ),
            )
            .service(
                web::scope("/assessments")
                    .service(
                        web::resource("")
                            .route(web::post().to(assessment::create_assessment))
                            .route(web::get().to(assessment::list_assessments)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(assessment::get_assessment)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
