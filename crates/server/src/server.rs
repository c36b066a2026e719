use axum::{
    Json, Router,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post, put},
};
use chrono::Utc;

use std::{convert::Infallible, sync::Arc};

use crate::{audit, products, recipes, waste};
use api_types::health::Health;
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");
static USER_NAME_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-user-name");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Operator on whose behalf a request runs, used for the audit trail.
///
/// Read from the `x-user-id` and `x-user-name` headers. Requests without
/// them are attributed to `system`.
#[derive(Clone, Debug)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &axum::http::HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        };
        let user_id = header(&USER_ID_HEADER).unwrap_or_else(|| "system".to_string());
        let user_name = header(&USER_NAME_HEADER).unwrap_or_else(|| user_id.clone());
        Ok(Actor { user_id, user_name })
    }
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        message: "Banelo API Server is running".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the HTTP router over a shared engine.
pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/transfer", post(products::transfer))
        .route(
            "/api/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/products/{id}/inventory", put(products::set_inventory))
        .route("/api/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipes/{id}",
            get(recipes::get)
                .put(recipes::update)
                .delete(recipes::delete),
        )
        .route("/api/recipes/{id}/ingredients", get(recipes::ingredients))
        .route("/api/waste", get(waste::list).post(waste::create))
        .route("/api/waste-logs", get(waste::list).post(waste::create))
        .route("/api/audit-logs", post(audit::create))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
