//! Keel directory HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, and the HTTP router, then starts the API
//! server and the metrics listener.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup
//! logic.
mod api;
mod app;
mod auth;
mod config;
mod model;
mod observability;
mod store;

use app::{AppState, build_router};
use auth::password::hash_password;
use model::NewUserRecord;
use std::future::Future;
use std::sync::Arc;
use store::{DirectoryStore, memory::InMemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::DirectoryConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::DirectoryConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, "directory service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &config::DirectoryConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn DirectoryStore> = Arc::new(InMemoryStore::new());
    if let Some(seed) = &config.seed_admin {
        store
            .create_user(NewUserRecord {
                username: seed.username.clone(),
                first_name: String::new(),
                last_name: String::new(),
                email: seed.email.clone(),
                role: keel_authz::Role::Admin,
                is_active: true,
                password: hash_password(&seed.password),
            })
            .await
            .map_err(|err| anyhow::anyhow!("seed admin: {err}"))?;
        tracing::info!(username = %seed.username, "seeded bootstrap admin");
    }
    Ok(AppState {
        api_version: "v1".to_string(),
        store,
    })
}
