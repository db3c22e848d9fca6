// src/main.rs
mod config;
mod dtos;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;
mod storage;

use std::sync::Arc;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};

use crate::config::AppConfig;
use crate::handlers::auth_handlers::{json_error, login, signup};
use crate::handlers::feed_handlers::{create_post, delete_post, get_post, list_posts, update_post};
use crate::middleware::cors::cors_policy;
use crate::repositories::post_repository::{PgPostStore, PostStore};
use crate::repositories::run_migrations;
use crate::repositories::user_repository::{PgUserStore, UserStore};
use crate::services::auth_services::AuthService;
use crate::services::feed_services::FeedService;
use crate::storage::ImageStore;
use crate::storage::local_image_store::LocalImageStore;

/// Store handles shared by the services.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub images: Arc<dyn ImageStore>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .service(signup) // PUT /auth/signup
            .service(login), // POST /auth/login
    )
    .service(
        web::scope("/feed")
            .service(list_posts) // GET /feed/posts
            .service(create_post) // POST /feed/post
            .service(get_post) // GET /feed/post/{post_id}
            .service(update_post) // PUT /feed/post/{post_id}
            .service(delete_post), // DELETE /feed/post/{post_id}
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let pg_pool = match config::get_pg_pool(&cfg) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pg_pool).await {
        error!("Failed to apply schema: {}", e);
        std::process::exit(1);
    }

    std::fs::create_dir_all(&cfg.images_dir)?;
    let image_store = LocalImageStore::new(cfg.images_dir.clone(), &cfg.images_url_prefix);
    info!("Serving images from {} at {}", image_store.root().display(), cfg.images_url_prefix);

    let state = AppState {
        posts: Arc::new(PgPostStore::new(pg_pool.clone())),
        users: Arc::new(PgUserStore::new(pg_pool)),
        images: Arc::new(image_store),
    };

    let feed = web::Data::new(FeedService::new(&state, cfg.posts_per_page, cfg.max_image_bytes));
    let auth = web::Data::new(AuthService::new(
        state.users.clone(),
        &cfg.jwt_secret,
        cfg.token_ttl_hours,
    ));

    let bind_address = format!("0.0.0.0:{}", cfg.port);
    info!("Starting server on {}", bind_address);

    let allowed_origins = cfg.allowed_origins.clone();
    let images_dir = cfg.images_dir.clone();
    let images_url_prefix = cfg.images_url_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_policy(&allowed_origins))
            .wrap(Logger::default())
            .app_data(feed.clone())
            .app_data(auth.clone())
            .service(Files::new(&images_url_prefix, images_dir.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
