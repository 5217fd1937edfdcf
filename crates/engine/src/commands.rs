//! Command and result structs for engine operations.

use crate::{EngineError, TransferRejection, Wallet};

/// Move `amount` from `sender_key` to `receiver_key`.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub transfer_id: String,
    pub sender_key: String,
    pub receiver_key: String,
    pub amount: f64,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        transfer_id: impl Into<String>,
        sender_key: impl Into<String>,
        receiver_key: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            transfer_id: transfer_id.into(),
            sender_key: sender_key.into(),
            receiver_key: receiver_key.into(),
            amount,
        }
    }
}

/// Exactly one outcome is produced per transfer request.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferOutcome {
    pub transfer_id: String,
    pub result: Result<(), TransferRejection>,
}

impl TransferOutcome {
    pub const ACCEPTED_CODE: u16 = 200;
    pub const REJECTED_CODE: u16 = 400;

    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }

    /// Status code reported to the requester. Rejection reasons collapse to
    /// a single code.
    pub fn status_code(&self) -> u16 {
        if self.is_accepted() {
            Self::ACCEPTED_CODE
        } else {
            Self::REJECTED_CODE
        }
    }

    pub fn into_result(self) -> Result<String, EngineError> {
        match self.result {
            Ok(()) => Ok(self.transfer_id),
            Err(reason) => Err(EngineError::TransferRejected(reason)),
        }
    }
}

/// Result of a create-if-absent call.
#[derive(Clone, Debug, PartialEq)]
pub enum Opened {
    Created(Wallet),
    Existing(Wallet),
}

impl Opened {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn wallet(&self) -> &Wallet {
        match self {
            Self::Created(wallet) | Self::Existing(wallet) => wallet,
        }
    }

    pub fn into_wallet(self) -> Wallet {
        match self {
            Self::Created(wallet) | Self::Existing(wallet) => wallet,
        }
    }
}
