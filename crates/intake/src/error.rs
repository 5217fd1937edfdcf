use engine::EngineError;
use thiserror::Error;

/// Errors raised while publishing or consuming a delivery.
///
/// Consumption errors never reach the publisher: the intake logs them and
/// counts the delivery as consumed. Only [`IntakeError::Closed`] is returned
/// to an [`IntakeHandle`](crate::IntakeHandle).
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("unrecognized event shape on \"{queue}\": {reason}")]
    UnrecognizedEventShape { queue: String, reason: String },
    #[error("no handler bound to queue \"{0}\"")]
    UnknownQueue(String),
    #[error("intake is not running")]
    Closed,
    #[error("intake requires an engine")]
    MissingEngine,
    #[error(transparent)]
    Engine(#[from] EngineError),
}
