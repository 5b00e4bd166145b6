use actix_web::{web, HttpResponse};

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}
