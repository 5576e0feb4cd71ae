use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use ft_nexus::config::AppConfig;
use ft_nexus::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    // Ensure data directory exists
    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }

    // Initialize database
    let pool = db::init_pool(&config.database_path);
    db::run_migrations(&pool);
    db::seed_projects(&pool);

    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
