use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use nests_backend::auth::jwks::JwksCache;
use nests_backend::auth::jwt::TokenVerifier;
use nests_backend::cache::RedisCache;
use nests_backend::config::AppConfig;
use nests_backend::create_pool;
use nests_backend::handlers;
use nests_backend::storage::SupabaseStorage;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    Migrator::up(&db, None).await.map_err(std::io::Error::other)?;
    let db_data = web::Data::new(db);

    // Redis is optional; without it every read goes to the database.
    let redis_data = match config.redis_url.as_deref() {
        Some(redis_url) => match RedisCache::new(redis_url, config.cache.clone()).await {
            Ok(cache) => {
                tracing::info!("Connected to Redis");
                Some(web::Data::new(Arc::new(cache)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Redis unavailable, running without cache");
                None
            }
        },
        None => None,
    };

    let verifier = match config.jwt_secret.clone() {
        Some(secret) => {
            tracing::info!("Verifying access tokens with the project JWT secret");
            TokenVerifier::Secret(secret)
        }
        None => {
            tracing::info!(project = %config.project_ref, "Verifying access tokens with JWKS");
            TokenVerifier::Jwks(JwksCache::new(&config.supabase_url, &config.supabase_anon_key))
        }
    };
    let verifier_data = web::Data::new(verifier);

    let storage_data = web::Data::new(SupabaseStorage::new(
        &config.supabase_url,
        &config.storage_bucket,
        &config.storage_key,
    ));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier_data.clone())
            .app_data(storage_data.clone());
        if let Some(redis_data) = &redis_data {
            app = app.app_data(redis_data.clone());
        }

        app.service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
