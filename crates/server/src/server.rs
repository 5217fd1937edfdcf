use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{bus, caller, wallets};
use engine::Engine;
use intake::IntakeHandle;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Present when the bus intake runs in this process.
    pub intake: Option<IntakeHandle>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/users/wallet/find", get(wallets::find))
        .route("/api/users/wallet/findall", get(wallets::find_all))
        .route("/api/users/wallet/add", post(wallets::add))
        .route(
            "/api/users/wallet/update/balance",
            put(wallets::update_balance),
        )
        .route(
            "/api/users/wallet/update/enable",
            put(wallets::update_enable),
        )
        .route("/api/users/wallet/reset", put(wallets::reset))
        .route("/api/users/wallet/transfer", post(wallets::transfer))
        .route("/api/bus/{queue}", post(bus::deliver))
        .route_layer(middleware::from_fn(caller::identify))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Arc<Engine>,
    intake: Option<IntakeHandle>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState { engine, intake };

    axum::serve(listener, router(state)).await
}
