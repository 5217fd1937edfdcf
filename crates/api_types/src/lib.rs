//! Wire types shared by the HTTP server, the bus intake and clients.
//!
//! Field names follow the camelCase JSON used by the other services on the
//! bus.

use serde::{Deserialize, Serialize};

pub mod wallet {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub email: String,
        pub balance: f64,
        pub is_enable: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletList {
        pub wallets: Vec<WalletView>,
    }

    /// Body of `POST /add`.
    ///
    /// `balance` is only honoured for administrators.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletNew {
        pub email: String,
        #[serde(default)]
        pub balance: f64,
        pub is_enable: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletFind {
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletRef {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceUpdate {
        pub email: String,
        pub balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EnableUpdate {
        pub email: String,
        pub is_enable: bool,
    }
}

pub mod events {
    use chrono::NaiveDateTime;

    use super::*;

    /// A user was registered by the user service.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserData {
        pub email: String,
        pub name: Option<String>,
        pub surname: Option<String>,
        pub registration_date: Option<NaiveDateTime>,
        pub role: String,
    }

    /// An entity that needs a wallet without being a user (rewards, ...).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct GeneralData {
        pub id: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum RequestType {
        Deposit,
        Refill,
        Subtract,
        Disable,
        Enable,
        /// Any kind this service does not know about.
        #[serde(other)]
        Unknown,
    }

    /// Adjust an existing wallet.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GeneralRequest {
        pub email: String,
        pub request_type: RequestType,
        #[serde(default)]
        pub amount: f64,
    }
}

pub mod transaction {
    use super::*;

    /// Peer-to-peer transfer request.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestTransaction {
        pub id: String,
        pub sender_email: String,
        pub receiver_email: String,
        pub amount: f64,
    }

    /// The single reply produced for every transfer request.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransferReply {
        /// The transfer id.
        pub response: String,
        pub code: u16,
    }
}
