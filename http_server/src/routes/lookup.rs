use actix_web::web;
use rate_lookup::form::LookupForm;
use rate_lookup::state::FetchState;

use crate::app_container::Application;

#[tracing::instrument(skip(app), level = "info")]
async fn lookup_rates(
    form: web::Query<LookupForm>,
    app: web::Data<Application>,
) -> web::Json<FetchState> {
    web::Json(app.rate_lookup.fetch(&form).await)
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/lookup").route(web::get().to(lookup_rates)));
}
