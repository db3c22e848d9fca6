use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub images_dir: PathBuf,
    pub images_url_prefix: String,
    pub posts_per_page: i64,
    pub max_image_bytes: usize,
    pub allowed_origins: String,
    pub pg_pool_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET is empty");
        }

        let images_url_prefix = format!(
            "/{}",
            env::var("IMAGES_URL_PREFIX")
                .unwrap_or_else(|_| "/images".into())
                .trim_matches('/')
        );

        Ok(Self {
            port: env_or("PORT", 8080)?,
            jwt_secret,
            token_ttl_hours: env_or("TOKEN_TTL_HOURS", 1)?,
            images_dir: PathBuf::from(env::var("IMAGES_DIR").unwrap_or_else(|_| "images".into())),
            images_url_prefix,
            posts_per_page: env_or("POSTS_PER_PAGE", 2)?,
            max_image_bytes: env_or("MAX_IMAGE_BYTES", 5 * 1024 * 1024)?,
            allowed_origins: env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into()),
            pg_pool_size: env_or("PG_POOL_SIZE", 16)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

pub fn get_pg_pool(app: &AppConfig) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);

    let mut pool_cfg = cfg.pool.unwrap_or_default();
    pool_cfg.max_size = app.pg_pool_size;
    cfg.pool = Some(pool_cfg);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}
