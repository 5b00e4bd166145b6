mod health;
mod lookup;
mod rates;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(rates::init_routes)
        .configure(health::init_routes)
        .service(web::scope("/api").configure(lookup::init_routes));
}
