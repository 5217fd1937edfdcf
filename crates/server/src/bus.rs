//! HTTP bridge into the bus intake.
//!
//! Lets an external broker adapter (or an operator) hand a raw message to a
//! named queue. Transfers answer with their reply; everything else is
//! acknowledged once consumed.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::Caller;
use intake::Reply;

use crate::{ServerError, server::ServerState};

pub async fn deliver(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(queue): Path<String>,
    body: Bytes,
) -> Result<Response, ServerError> {
    state.engine.require_admin(&caller)?;

    let intake = state
        .intake
        .as_ref()
        .ok_or_else(|| ServerError::Unavailable("bus intake disabled".to_string()))?;

    // Publishing only fails once the intake loop has stopped.
    let reply = intake
        .request(queue, body.to_vec())
        .await
        .map_err(|err| ServerError::Unavailable(err.to_string()))?;

    match reply {
        Reply::Consumed => Ok(StatusCode::ACCEPTED.into_response()),
        Reply::Transfer(reply) => {
            let status = StatusCode::from_u16(reply.code).unwrap_or(StatusCode::BAD_REQUEST);
            Ok((status, Json(reply)).into_response())
        }
    }
}
