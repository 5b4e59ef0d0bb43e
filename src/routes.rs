use crate::{
    api::{admin, leaves, settings, users},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
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
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

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
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/users")
                    // /users
                    .service(
                        web::resource("")
                            .route(web::post().to(users::create_user))
                            .route(web::get().to(users::list_users)),
                    )
                    // /users/{emp_id}
                    .service(
                        web::resource("/{emp_id}")
                            .route(web::get().to(users::get_user))
                            .route(web::put().to(users::update_user))
                            .route(web::delete().to(users::delete_user)),
                    )
                    // /users/{emp_id}/quota
                    .service(
                        web::resource("/{emp_id}/quota")
                            .route(web::put().to(users::update_quota)),
                    )
                    // /users/{emp_id}/password
                    .service(
                        web::resource("/{emp_id}/password")
                            .route(web::put().to(users::reset_password)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(
                        web::resource("")
                            .route(web::get().to(leaves::list_leaves))
                            .route(web::post().to(leaves::create_leave)),
                    )
                    // /leaves/statistics (must precede /{id})
                    .service(
                        web::resource("/statistics")
                            .route(web::get().to(leaves::leave_statistics)),
                    )
                    // /leaves/{id}
                    .service(web::resource("/{id}").route(web::get().to(leaves::get_leave)))
                    // /leaves/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(leaves::decide_leave)),
                    ),
            )
            .service(
                web::resource("/settings")
                    .route(web::get().to(settings::get_settings))
                    .route(web::put().to(settings::update_settings)),
            )
            .service(
                web::scope("/holidays")
                    .service(
                        web::resource("")
                            .route(web::get().to(settings::list_holidays))
                            .route(web::post().to(settings::add_holiday)),
                    )
                    .service(
                        web::resource("/{date}")
                            .route(web::delete().to(settings::delete_holiday)),
                    ),
            )
            .service(
                web::scope("/admin")
                    .service(web::resource("/status").route(web::get().to(admin::setup_status)))
                    .service(web::resource("/setup").route(web::post().to(admin::run_setup)))
                    .service(
                        web::resource("/migrate").route(web::post().to(admin::run_migration)),
                    ),
            ),
    );
}
