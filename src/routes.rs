use crate::api::{department, employee};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub type ApiRateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer-IP limiter for the JSON scope. `None` when the rate is unusable.
pub fn api_rate_limit(requests_per_min: u32) -> Option<ApiRateLimit> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };

    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, api_limit: &ApiRateLimit) {
    // HTML pages
    cfg.route("/", web::get().to(employee::index))
        .service(
            web::scope("/employees")
                // /employees
                .service(web::resource("").route(web::get().to(employee::list_employees)))
                // /employees/new
                .service(
                    web::resource("/new")
                        .route(web::get().to(employee::new_employee))
                        .route(web::post().to(employee::create_employee)),
                )
                // /employees/{id}/edit
                .service(
                    web::resource("/{id}/edit")
                        .route(web::get().to(employee::edit_employee))
                        .route(web::post().to(employee::update_employee)),
                )
                // /employees/{id}/delete
                .service(
                    web::resource("/{id}/delete").route(web::post().to(employee::delete_employee)),
                ),
        )
        .service(
            web::resource("/departments")
                .route(web::get().to(department::list_departments))
                .route(web::post().to(department::create_department)),
        );

    // JSON
    cfg.service(
        web::scope(api_prefix)
            .wrap(Governor::new(api_limit))
            .service(web::resource("/employees").route(web::get().to(employee::api_employees))),
    );
}
