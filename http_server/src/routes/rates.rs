use actix_web::{web, HttpResponse};
use rates_proxy::contracts::fetch_rates::{RatesParams, RatesRequest};
use serde::Deserialize;

use crate::app_container::Application;
use crate::errors::ApiError;

#[derive(Deserialize, Debug)]
struct Request {
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    year: Option<String>,
    month: Option<String>,
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn get_rates(
    data: web::Query<Request>,
    app: web::Data<Application>,
) -> Result<HttpResponse, ApiError> {
    let request = RatesRequest::parse(
        RatesParams {
            city: data.city.as_deref(),
            state: data.state.as_deref(),
            zip: data.zip.as_deref(),
            year: data.year.as_deref(),
            month: data.month.as_deref(),
        },
        app.rates_proxy.settings(),
    )?;
    let rates = app.rates_proxy.fetch_rates(&request).await?;
    Ok(HttpResponse::Ok().json(rates))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/rates").route(web::get().to(get_rates)));
}
