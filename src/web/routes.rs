use actix_web::web;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/sessions/{id}")
            .route("", web::get().to(handlers::get_session))
            .route("/messages", web::post().to(handlers::send_message))
            .route("/reset", web::post().to(handlers::new_chat))
            .route("/tool", web::post().to(handlers::select_tool))
            .route("/language", web::post().to(handlers::select_language))
    )
    .route("/", web::get().to(handlers::index))
    .route("/health", web::get().to(handlers::health_check));
}
