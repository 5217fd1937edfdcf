//! Wallets API endpoints.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use engine::{Caller, TransferCmd};

use crate::{
    ServerError,
    server::ServerState,
    types::{
        transaction::{RequestTransaction, TransferReply},
        wallet::{
            BalanceUpdate, EnableUpdate, WalletFind, WalletList, WalletNew, WalletRef, WalletView,
        },
    },
    wallet_view,
};

/// Fetch a wallet; without `email` the caller's own wallet is returned.
pub async fn find(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<WalletFind>,
) -> Result<Json<WalletView>, ServerError> {
    let email = query
        .email
        .unwrap_or_else(|| caller.account_key.clone());
    state.engine.require_owner_or_admin(&caller, &email)?;

    let wallet = state.engine.wallet(&email).await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn find_all(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<WalletList>, ServerError> {
    state.engine.require_admin(&caller)?;

    let wallets = state
        .engine
        .wallets()
        .await?
        .into_iter()
        .map(wallet_view)
        .collect();
    Ok(Json(WalletList { wallets }))
}

/// Open a wallet, or return the existing one untouched.
///
/// Accepts a JSON [`WalletNew`] body, or `?email=&balance=` when the body is
/// empty.
pub async fn add(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    query: Result<Query<BalanceUpdate>, QueryRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let payload = match query {
        Ok(Query(query)) if body.is_empty() => WalletNew {
            email: query.email,
            balance: query.balance,
            is_enable: None,
        },
        _ => serde_json::from_slice::<WalletNew>(&body)
            .map_err(|err| ServerError::Generic(format!("invalid wallet: {err}")))?,
    };

    let opened = state
        .engine
        .open_wallet(
            &caller,
            &payload.email,
            payload.balance,
            payload.is_enable.unwrap_or(true),
        )
        .await?;

    let status = if opened.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(wallet_view(opened.into_wallet()))))
}

pub async fn update_balance(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<BalanceUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    state.engine.require_admin(&caller)?;

    let wallet = state
        .engine
        .set_balance(&query.email, query.balance)
        .await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn update_enable(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EnableUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    state.engine.require_admin(&caller)?;

    let wallet = state
        .engine
        .set_enabled(&query.email, query.is_enable)
        .await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn reset(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<WalletRef>,
) -> Result<Json<WalletView>, ServerError> {
    state.engine.require_admin(&caller)?;

    let wallet = state.engine.reset(&query.email).await?;
    Ok(Json(wallet_view(wallet)))
}

/// Synchronous transfer. The HTTP status mirrors the reply code.
pub async fn transfer(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<RequestTransaction>,
) -> Result<(StatusCode, Json<TransferReply>), ServerError> {
    state
        .engine
        .require_owner_or_admin(&caller, &payload.sender_email)?;

    let outcome = state
        .engine
        .transfer(TransferCmd::new(
            payload.id,
            payload.sender_email,
            payload.receiver_email,
            payload.amount,
        ))
        .await;

    let code = outcome.status_code();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    Ok((
        status,
        Json(TransferReply {
            response: outcome.transfer_id,
            code,
        }),
    ))
}
