pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::Config;
use crate::database::postgres::PgLifecycleStore;
use crate::middleware::auth::JwtKeys;
use crate::middleware::ownership::PgOwnershipResolver;
use crate::services::{
    alumni_service::AlumniService, job_record_service::JobRecordService,
    lifecycle_service::LifecycleService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: JwtKeys,
    pub user_service: UserService,
    pub alumni_service: AlumniService,
    pub job_record_service: JobRecordService,
    pub lifecycle_service: LifecycleService,
    pub api_rps: u32,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let lifecycle_service = LifecycleService::new(
            Arc::new(PgLifecycleStore::new(pool.clone())),
            Arc::new(PgOwnershipResolver::new(pool.clone())),
        );

        Self {
            auth: JwtKeys::from_config(config),
            user_service: UserService::new(pool.clone()),
            alumni_service: AlumniService::new(pool.clone()),
            job_record_service: JobRecordService::new(pool.clone()),
            lifecycle_service,
            api_rps: config.api_rps,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            pool,
        }
    }

    /// Swaps the trash lifecycle backend, e.g. for the in-process store.
    #[cfg(any(test, feature = "test-util"))]
    pub fn with_lifecycle(mut self, lifecycle_service: LifecycleService) -> Self {
        self.lifecycle_service = lifecycle_service;
        self
    }
}
