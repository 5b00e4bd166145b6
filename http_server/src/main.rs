use crate::app_container::Application;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use rates_proxy::contracts::RatesProxy;
use tracing_actix_web::TracingLogger;

mod app_container;
mod config;
mod errors;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("per_diem_http_server")?;
    let result = start().await;
    shared_kernel::tracing::shutdown_global_tracer_provider();
    result
}

async fn start() -> anyhow::Result<()> {
    let settings = config::Settings::parse()?;
    let proxy_settings = rates_proxy::config::Settings::parse()?;
    let lookup_settings = rate_lookup::config::Settings::parse()?;

    let rates_proxy = RatesProxy::new(proxy_settings.gsa, proxy_settings.proxy);
    let app = web::Data::new(Application::new(rates_proxy, lookup_settings.lookup));

    let address = (settings.application.host.clone(), settings.application.port);
    tracing::info!(host = %address.0, port = address.1, "Starting per diem server");

    HttpServer::new(move || {
        // browser forms on other origins call the proxy directly
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET"])
            .max_age(3600);
        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(routes::config)
            .app_data(app.clone())
    })
    .bind(address)?
    .run()
    .await
    .context("Server failed to run")
}
