//! Event handlers.
//!
//! Each handler maps one event shape to engine calls and reports what it did
//! as a [`Handled`] value. Idempotency lives here: lifecycle events for an
//! existing wallet and adjustments for a missing one are skipped.

use api_types::{
    events::{GeneralData, GeneralRequest, RequestType, UserData},
    transaction::{RequestTransaction, TransferReply},
};
use engine::{Engine, TransferCmd};
use serde::de::DeserializeOwned;

use crate::{IntakeError, Queues};

/// What a handler did with an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Handled {
    Created,
    Updated,
    Skipped(&'static str),
    Transfer(TransferReply),
}

/// A user was registered: open its wallet.
pub async fn user_data(engine: &Engine, event: UserData) -> Result<Handled, IntakeError> {
    let policy = engine.policy();
    if policy.is_admin(&event.role) {
        tracing::info!(email = %event.email, "admin user detected, skipping creation");
        return Ok(Handled::Skipped("admin role"));
    }

    if engine.find_wallet(&event.email).await?.is_some() {
        tracing::info!(email = %event.email, "user already exists");
        return Ok(Handled::Skipped("wallet exists"));
    }

    let opening = policy.opening_balance(&event.role);
    let opened = engine.create_if_absent(&event.email, opening, true).await?;
    Ok(if opened.is_created() {
        Handled::Created
    } else {
        Handled::Skipped("wallet exists")
    })
}

/// A non-user entity needs an empty wallet.
pub async fn general_data(engine: &Engine, event: GeneralData) -> Result<Handled, IntakeError> {
    if engine.find_wallet(&event.id).await?.is_some() {
        tracing::info!(id = %event.id, "wallet already exists");
        return Ok(Handled::Skipped("wallet exists"));
    }

    let opened = engine.create_if_absent(&event.id, 0.0, true).await?;
    Ok(if opened.is_created() {
        Handled::Created
    } else {
        Handled::Skipped("wallet exists")
    })
}

/// Adjust an existing wallet. Missing wallets and unknown kinds are skipped.
pub async fn general_request(
    engine: &Engine,
    event: GeneralRequest,
) -> Result<Handled, IntakeError> {
    if engine.find_wallet(&event.email).await?.is_none() {
        tracing::debug!(email = %event.email, "no wallet to adjust");
        return Ok(Handled::Skipped("wallet missing"));
    }

    let key = event.email.as_str();
    match event.request_type {
        RequestType::Deposit => engine.deposit(key, event.amount).await?,
        RequestType::Subtract => engine.subtract(key, event.amount).await?,
        RequestType::Refill => {
            engine
                .refill_to_default(key, engine.policy().initial_allowance)
                .await?
        }
        RequestType::Enable => engine.set_enabled(key, true).await?,
        RequestType::Disable => engine.set_enabled(key, false).await?,
        RequestType::Unknown => {
            tracing::error!(email = %event.email, "request type not found");
            return Ok(Handled::Skipped("unknown request type"));
        }
    };

    Ok(Handled::Updated)
}

/// Run a transfer and build its reply.
pub async fn transaction(
    engine: &Engine,
    request: RequestTransaction,
) -> Result<Handled, IntakeError> {
    let outcome = engine
        .transfer(TransferCmd::new(
            request.id,
            request.sender_email,
            request.receiver_email,
            request.amount,
        ))
        .await;

    Ok(Handled::Transfer(TransferReply {
        code: outcome.status_code(),
        response: outcome.transfer_id,
    }))
}

/// Decode `payload` according to the queue it arrived on and run the
/// matching handler.
pub async fn route(
    engine: &Engine,
    queues: &Queues,
    queue: &str,
    payload: &[u8],
) -> Result<Handled, IntakeError> {
    if queue == queues.user_data {
        user_data(engine, decode(queue, payload)?).await
    } else if queue == queues.general_data {
        general_data(engine, decode(queue, payload)?).await
    } else if queue == queues.general_request {
        general_request(engine, decode(queue, payload)?).await
    } else if queue == queues.transaction {
        transaction(engine, decode(queue, payload)?).await
    } else {
        Err(IntakeError::UnknownQueue(queue.to_string()))
    }
}

fn decode<T: DeserializeOwned>(queue: &str, payload: &[u8]) -> Result<T, IntakeError> {
    serde_json::from_slice(payload).map_err(|err| IntakeError::UnrecognizedEventShape {
        queue: queue.to_string(),
        reason: err.to_string(),
    })
}
