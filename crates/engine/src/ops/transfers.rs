use sea_orm::TransactionTrait;

use crate::{TransferCmd, TransferOutcome, TransferRejection, store};

use super::{Engine, with_tx};

impl Engine {
    /// Move funds between two wallets.
    ///
    /// Checks run in a fixed order: sender existence, sender funds and
    /// enabled flag, receiver existence, receiver enabled flag. Both wallets
    /// are locked for the whole exchange and both saves share one database
    /// transaction, so a rejected transfer never leaves a partial effect.
    pub async fn transfer(&self, cmd: TransferCmd) -> TransferOutcome {
        let result = self.try_transfer(&cmd).await;
        match &result {
            Ok(()) => tracing::info!(
                transfer_id = %cmd.transfer_id,
                amount = cmd.amount,
                "transfer completed"
            ),
            Err(reason) => tracing::info!(
                transfer_id = %cmd.transfer_id,
                sender = %cmd.sender_key,
                receiver = %cmd.receiver_key,
                amount = cmd.amount,
                "transfer failed: {reason}"
            ),
        }

        TransferOutcome {
            transfer_id: cmd.transfer_id,
            result,
        }
    }

    async fn try_transfer(&self, cmd: &TransferCmd) -> Result<(), TransferRejection> {
        let amount = cmd.amount;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TransferRejection::InvalidAmount(format!(
                "transfer amount must be > 0, got {amount}"
            )));
        }

        let sender_key = cmd.sender_key.trim();
        let receiver_key = cmd.receiver_key.trim();
        if sender_key == receiver_key {
            return Err(TransferRejection::SameAccount);
        }

        let _guards = self.locks.lock_pair(sender_key, receiver_key).await;
        with_tx!(self, |db_tx| {
            async {
                let mut sender = store::find_by_key(&db_tx, sender_key)
                    .await
                    .map_err(persistence)?
                    .ok_or(TransferRejection::SenderNotFound)?;
                if !sender.can_send(amount) {
                    tracing::debug!(balance = sender.balance, "sender cannot cover transfer");
                    return Err(TransferRejection::InsufficientFundsOrDisabled);
                }

                let mut receiver = store::find_by_key(&db_tx, receiver_key)
                    .await
                    .map_err(persistence)?
                    .ok_or(TransferRejection::ReceiverNotFound)?;
                if !receiver.can_receive() {
                    return Err(TransferRejection::ReceiverDisabled);
                }

                sender.balance -= amount;
                receiver.balance += amount;
                if !receiver.balance.is_finite() {
                    return Err(TransferRejection::InvalidAmount(
                        "receiver balance would overflow".to_string(),
                    ));
                }

                store::save(&db_tx, &sender).await.map_err(persistence)?;
                store::save(&db_tx, &receiver).await.map_err(persistence)?;
                Ok::<(), TransferRejection>(())
            }
            .await
        })
    }
}

fn persistence(err: crate::EngineError) -> TransferRejection {
    tracing::error!("transfer persistence error: {err}");
    TransferRejection::PersistenceFailure(err.to_string())
}
