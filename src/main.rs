use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use employee_records::config::Config;
use employee_records::db::init_db;
use employee_records::docs::ApiDoc;
use employee_records::{routes, telemetry};
use tracing::info;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log, flushed when the guard drops
    let _guard = telemetry::init_file_logging(&config.log_dir);

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let api_limit = routes::api_rate_limit(config.rate_api_per_min)
        .ok_or_else(|| anyhow::anyhow!("invalid API rate limit configuration"))?;

    let server_addr = config.server_addr.clone();
    info!(%server_addr, api_prefix = %config.api_prefix, "Listening");

    HttpServer::new(move || {
        let api_prefix = config.api_prefix.clone();
        let api_limit = api_limit.clone();

        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .configure(move |cfg| routes::configure(cfg, &api_prefix, &api_limit))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
