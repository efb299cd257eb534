use actix_web::web;

pub mod qualify;
pub mod system;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(qualify::vendor_qualification)
        .service(system::health)
        .service(system::catalog_stats);
}
