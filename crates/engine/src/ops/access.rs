//! Authorization against an explicit caller identity.
//!
//! The HTTP layer resolves who is calling and passes a [`Caller`] in; the
//! engine never reads ambient session state.

use crate::{EngineError, Opened, ResultEngine, util::normalize_account_key};

use super::Engine;

/// The identity a request is made on behalf of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub account_key: String,
    pub role: String,
}

impl Caller {
    pub fn new(account_key: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            account_key: account_key.into(),
            role: role.into(),
        }
    }
}

impl Engine {
    pub fn is_admin(&self, caller: &Caller) -> bool {
        self.policy.is_admin(&caller.role)
    }

    pub fn require_admin(&self, caller: &Caller) -> ResultEngine<()> {
        if !self.is_admin(caller) {
            return Err(EngineError::Forbidden(format!(
                "{} is not an administrator",
                caller.account_key
            )));
        }
        Ok(())
    }

    /// Allow the owner of `account_key` or an administrator.
    pub fn require_owner_or_admin(&self, caller: &Caller, account_key: &str) -> ResultEngine<()> {
        let account_key = normalize_account_key(account_key)?;
        if caller.account_key.trim() == account_key || self.is_admin(caller) {
            return Ok(());
        }
        Err(EngineError::Forbidden(format!(
            "user not allowed to access wallet owner: {account_key}"
        )))
    }

    /// Open a wallet on behalf of `caller`.
    ///
    /// Only administrators choose the opening balance; everybody else starts
    /// at zero. An existing wallet is returned as is.
    pub async fn open_wallet(
        &self,
        caller: &Caller,
        account_key: &str,
        balance: f64,
        enabled: bool,
    ) -> ResultEngine<Opened> {
        self.require_owner_or_admin(caller, account_key)?;
        let balance = if self.is_admin(caller) { balance } else { 0.0 };
        self.create_if_absent(account_key, balance, enabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn engine() -> Engine {
        Engine::builder().build().await.unwrap()
    }

    #[tokio::test]
    async fn owner_and_admin_are_allowed() {
        let engine = engine().await;
        let owner = Caller::new("alice@example.com", "utente");
        let admin = Caller::new("root@example.com", "ADMIN");

        assert!(
            engine
                .require_owner_or_admin(&owner, "alice@example.com")
                .is_ok()
        );
        assert!(
            engine
                .require_owner_or_admin(&admin, "alice@example.com")
                .is_ok()
        );
        assert!(engine.require_admin(&admin).is_ok());
    }

    #[tokio::test]
    async fn strangers_are_forbidden() {
        let engine = engine().await;
        let stranger = Caller::new("mallory@example.com", "utente");

        assert_eq!(
            engine
                .require_owner_or_admin(&stranger, "alice@example.com")
                .unwrap_err(),
            EngineError::Forbidden(
                "user not allowed to access wallet owner: alice@example.com".to_string()
            )
        );
        assert!(matches!(
            engine.require_admin(&stranger),
            Err(EngineError::Forbidden(_))
        ));
    }
}
