use apis::setup_routes;
use axum::Router;
use repositories::{
    follow_repository::FollowRepository, memory::InMemoryStore,
    redis_follow_repository::RedisFollowRepository, user_repository::UserRepository, FollowStore,
    UserStore,
};
use services::{
    follow_service::FollowService, redis_service::RedisService, user_service::UserService,
};
use settings::{Settings, StorageBackend};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod apis;
pub mod models;
pub mod repositories;
pub mod services;
pub mod settings;
pub mod utils;

pub struct AppState {
    pub user_service: UserService,
    pub follow_service: FollowService,
}

impl AppState {
    pub fn new(user_store: Arc<dyn UserStore>, follow_store: Arc<dyn FollowStore>) -> Self {
        let follow_service = FollowService::new(user_store.clone(), follow_store);
        let user_service = UserService::new(user_store, follow_service.clone());
        Self {
            user_service,
            follow_service,
        }
    }

    /// State backed by a fresh [`InMemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store)
    }
}

pub async fn setup_database(
    database_url: &str,
    run_migrations: bool,
) -> Result<Arc<PgPool>, Box<dyn std::error::Error>> {
    let pool = PgPool::connect(database_url).await?;
    if run_migrations {
        sqlx::migrate!().run(&pool).await?;
        info!("Database migrations applied");
    }
    Ok(Arc::new(pool))
}

pub async fn setup_services(settings: &Settings) -> Result<AppState, Box<dyn std::error::Error>> {
    let backend = settings.storage_backend();
    info!("Using {:?} storage backend", backend);

    if backend == StorageBackend::Memory {
        return Ok(AppState::in_memory());
    }

    let database_url = settings
        .database_url
        .as_deref()
        .ok_or("DATABASE_URL must be set")?;
    let db = setup_database(database_url, settings.run_migrations.unwrap_or(true)).await?;
    let user_store: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.clone()));

    let follow_store: Arc<dyn FollowStore> = match backend {
        StorageBackend::Redis => {
            let redis_url = settings
                .redis_url
                .as_deref()
                .ok_or("REDIS_URL must be set for the redis backend")?;
            let redis_service = Arc::new(RedisService::new(redis_url).await?);
            Arc::new(RedisFollowRepository::new(redis_service))
        }
        _ => Arc::new(FollowRepository::new(db)),
    };

    Ok(AppState::new(user_store, follow_store))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    setup_routes()
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn setup_router(settings: &Settings) -> Result<Router, Box<dyn std::error::Error>> {
    let state = setup_services(settings).await?;
    Ok(build_router(Arc::new(state)))
}

pub fn init_tracing(settings: &Settings) {
    let level = if settings.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_ansi(!settings.is_production())
        .init();
}
