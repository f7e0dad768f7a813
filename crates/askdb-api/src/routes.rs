//! Route registration.

use actix_web::web;

use crate::handlers::{health_handler, query_handler};

/// Mount all API routes under `/api/v1`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(query_handler)
            .service(health_handler),
    );
}
