use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, Wallet};

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod bus;
mod caller;
mod server;
mod wallets;

pub mod types {
    pub mod wallet {
        pub use api_types::wallet::{
            BalanceUpdate, EnableUpdate, WalletFind, WalletList, WalletNew, WalletRef, WalletView,
        };
    }

    pub mod transaction {
        pub use api_types::transaction::{RequestTransaction, TransferReply};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Unavailable(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::TransferRejected(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_) | EngineError::InvalidId(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unavailable(err) => (StatusCode::SERVICE_UNAVAILABLE, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

fn wallet_view(wallet: Wallet) -> types::wallet::WalletView {
    types::wallet::WalletView {
        email: wallet.account_key,
        balance: wallet.balance,
        is_enable: wallet.enabled,
    }
}
