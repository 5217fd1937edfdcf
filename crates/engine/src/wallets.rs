//! The module contains `Wallet` struct and its implementation.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// A wallet.
///
/// A wallet holds the balance of a single account, identified by its account
/// key (the owner's e-mail). A disabled wallet can neither send nor receive
/// funds.
#[derive(Clone, Debug, PartialEq)]
pub struct Wallet {
    /// Stable identifier for this wallet.
    ///
    /// Generated once when the wallet is opened and persisted in the
    /// database; every later save overwrites the row with this id.
    pub id: Uuid,
    pub account_key: String,
    pub balance: f64,
    pub enabled: bool,
}

impl Wallet {
    pub fn new(account_key: String, balance: f64, enabled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_key,
            balance: clamp_balance(balance),
            enabled,
        }
    }

    pub fn deposit(&mut self, amount: f64) {
        self.balance = clamp_balance(self.balance + amount);
    }

    /// Subtract `amount`, flooring the balance at zero.
    pub fn subtract(&mut self, amount: f64) {
        self.balance = clamp_balance(self.balance - amount);
    }

    pub fn set_balance(&mut self, balance: f64) {
        self.balance = clamp_balance(balance);
    }

    pub fn reset(&mut self) {
        self.balance = 0.0;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether this wallet may send `amount` as a transfer.
    ///
    /// Clamping never applies to transfers: the whole amount must be covered.
    pub fn can_send(&self, amount: f64) -> bool {
        self.enabled && self.balance >= amount
    }

    pub fn can_receive(&self) -> bool {
        self.enabled
    }
}

/// Negative balances are never stored.
fn clamp_balance(balance: f64) -> f64 {
    if balance <= 0.0 { 0.0 } else { balance }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub account_key: String,
    pub balance: f64,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            account_key: ActiveValue::Set(value.account_key.clone()),
            balance: ActiveValue::Set(value.balance),
            enabled: ActiveValue::Set(value.enabled),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(value: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&value.id, "wallet")?,
            account_key: value.account_key,
            balance: value.balance,
            enabled: value.enabled,
        })
    }
}
