pub mod auth_handlers;
pub mod decision_handlers;
pub mod project_handlers;
pub mod resource_handlers;
pub mod test_handlers;

use actix_web::{HttpResponse, web};

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

/// The full route table, shared by `main` and the HTTP-level tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
    cfg.service(
        web::scope("/api")
            // Auth
            .route("/auth/login", web::get().to(auth_handlers::login))
            .route("/auth/callback", web::get().to(auth_handlers::callback))
            .route("/auth/me", web::get().to(auth_handlers::me))
            // Projects: /slug/{slug} must register before /{id}
            .route("/projects", web::get().to(project_handlers::list))
            .route("/projects/slug/{slug}", web::get().to(project_handlers::read_by_slug))
            .route("/projects/{id}", web::get().to(project_handlers::read))
            // Resources
            .route("/resources", web::get().to(resource_handlers::list))
            .route("/resources", web::post().to(resource_handlers::create))
            .route("/resources/{id}", web::get().to(resource_handlers::read))
            .route("/resources/{id}/vote", web::post().to(resource_handlers::vote))
            .route("/resources/{id}", web::delete().to(resource_handlers::delete))
            // Tests
            .route("/tests", web::get().to(test_handlers::list))
            .route("/tests", web::post().to(test_handlers::create))
            .route("/tests/{id}", web::get().to(test_handlers::read))
            .route("/tests/{id}/approve", web::post().to(test_handlers::approve))
            .route("/tests/{id}/download", web::get().to(test_handlers::download))
            .route("/tests/{id}", web::delete().to(test_handlers::delete))
            // Decisions (polls + disputes share one surface)
            .route("/decisions", web::get().to(decision_handlers::list))
            .route("/decisions", web::post().to(decision_handlers::create))
            .route("/decisions/{id}", web::get().to(decision_handlers::read))
            .route("/decisions/{id}/vote", web::post().to(decision_handlers::vote))
            .route("/decisions/{id}/resolve", web::post().to(decision_handlers::resolve))
            .route("/decisions/{id}/staff-decide", web::post().to(decision_handlers::staff_decide))
            .route("/decisions/{id}", web::delete().to(decision_handlers::delete)),
    );
}
