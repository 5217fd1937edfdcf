//! Bus intake.
//!
//! Deliveries from the message bus arrive on a bounded channel. Every
//! delivery is handled on its own task, with at most `capacity` tasks in
//! flight; failures are logged and the delivery is dropped, so one bad event
//! never stops the loop. Transfer requests get
//! exactly one reply on the delivery's reply channel.

use std::sync::Arc;

use api_types::transaction::TransferReply;
use engine::Engine;
use tokio::sync::{mpsc, oneshot};

pub use error::IntakeError;
pub use handlers::Handled;

mod error;
pub mod handlers;

const DEFAULT_CAPACITY: usize = 256;

/// Queue names the intake is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Queues {
    pub user_data: String,
    pub general_data: String,
    pub general_request: String,
    pub transaction: String,
}

impl Default for Queues {
    fn default() -> Self {
        Self {
            user_data: "wallet.userData".to_string(),
            general_data: "wallet.receiveData".to_string(),
            general_request: "wallet.generalRequest".to_string(),
            transaction: "wallet.receiveTransaction".to_string(),
        }
    }
}

/// Answer sent back to a publisher that asked for one.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// The delivery was consumed, whatever its outcome.
    Consumed,
    Transfer(TransferReply),
}

/// A message taken off the bus.
#[derive(Debug)]
pub struct Delivery {
    pub queue: String,
    pub payload: Vec<u8>,
    pub reply: Option<oneshot::Sender<Reply>>,
}

/// Publisher side of the intake channel.
#[derive(Clone, Debug)]
pub struct IntakeHandle {
    sender: mpsc::Sender<Delivery>,
}

impl IntakeHandle {
    /// Fire-and-forget delivery.
    pub async fn publish(
        &self,
        queue: impl Into<String>,
        payload: Vec<u8>,
    ) -> Result<(), IntakeError> {
        self.sender
            .send(Delivery {
                queue: queue.into(),
                payload,
                reply: None,
            })
            .await
            .map_err(|_| IntakeError::Closed)
    }

    /// Deliver and wait until the delivery has been consumed.
    pub async fn request(
        &self,
        queue: impl Into<String>,
        payload: Vec<u8>,
    ) -> Result<Reply, IntakeError> {
        let (reply, answer) = oneshot::channel();
        self.sender
            .send(Delivery {
                queue: queue.into(),
                payload,
                reply: Some(reply),
            })
            .await
            .map_err(|_| IntakeError::Closed)?;
        answer.await.map_err(|_| IntakeError::Closed)
    }
}

pub struct Intake {
    engine: Arc<Engine>,
    queues: Arc<Queues>,
    receiver: mpsc::Receiver<Delivery>,
    /// Upper bound on deliveries handled at the same time.
    max_in_flight: usize,
}

impl Intake {
    pub fn builder() -> IntakeBuilder {
        IntakeBuilder::default()
    }

    pub fn queues(&self) -> &Queues {
        &self.queues
    }

    /// Consume deliveries until every [`IntakeHandle`] is dropped.
    pub async fn run(mut self) {
        tracing::info!(
            user_data = %self.queues.user_data,
            general_data = %self.queues.general_data,
            general_request = %self.queues.general_request,
            transaction = %self.queues.transaction,
            "Starting bus intake..."
        );

        let mut workers = tokio::task::JoinSet::new();
        loop {
            // With every worker slot taken, stop receiving: the channel fills
            // up and publishers wait.
            while workers.try_join_next().is_some() {}
            if workers.len() >= self.max_in_flight {
                workers.join_next().await;
                continue;
            }

            let Some(delivery) = self.receiver.recv().await else {
                break;
            };
            let engine = self.engine.clone();
            let queues = self.queues.clone();
            workers.spawn(async move { consume(&engine, &queues, delivery).await });
        }

        while workers.join_next().await.is_some() {}
        tracing::info!("bus intake stopped");
    }
}

/// Handle one delivery. Never fails: errors end here.
async fn consume(engine: &Engine, queues: &Queues, delivery: Delivery) {
    let Delivery {
        queue,
        payload,
        reply,
    } = delivery;
    tracing::debug!(queue = %queue, bytes = payload.len(), "received message");

    let answer = match handlers::route(engine, queues, &queue, &payload).await {
        Ok(Handled::Transfer(transfer)) => Reply::Transfer(transfer),
        Ok(handled) => {
            tracing::debug!(queue = %queue, ?handled, "message consumed");
            Reply::Consumed
        }
        Err(err) => {
            tracing::error!(queue = %queue, "dropping message: {err}");
            Reply::Consumed
        }
    };

    if let Some(reply) = reply
        && reply.send(answer).is_err()
    {
        tracing::warn!(queue = %queue, "publisher went away before the reply");
    }
}

#[derive(Default)]
pub struct IntakeBuilder {
    engine: Option<Arc<Engine>>,
    queues: Queues,
    capacity: Option<usize>,
}

impl IntakeBuilder {
    pub fn engine(mut self, engine: Arc<Engine>) -> IntakeBuilder {
        self.engine = Some(engine);
        self
    }

    pub fn queues(mut self, queues: Queues) -> IntakeBuilder {
        self.queues = queues;
        self
    }

    /// Size of the delivery buffer, and the number of deliveries handled
    /// concurrently.
    pub fn capacity(mut self, capacity: usize) -> IntakeBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<(Intake, IntakeHandle), IntakeError> {
        let engine = self
            .engine
            .ok_or(IntakeError::MissingEngine)?;
        let capacity = self.capacity.unwrap_or(DEFAULT_CAPACITY).max(1);
        let (sender, receiver) = mpsc::channel(capacity);

        Ok((
            Intake {
                engine,
                queues: Arc::new(self.queues),
                receiver,
                max_in_flight: capacity,
            },
            IntakeHandle { sender },
        ))
    }
}
