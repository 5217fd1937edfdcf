use crate::{
    EngineError, Opened, ResultEngine, Wallet, store,
    util::{ensure_finite, ensure_non_negative, normalize_account_key},
};

use super::Engine;

impl Engine {
    /// Return the wallet of `account_key`.
    pub async fn wallet(&self, account_key: &str) -> ResultEngine<Wallet> {
        let account_key = normalize_account_key(account_key)?;
        store::find_by_key(&self.database, &account_key)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(account_key))
    }

    /// Return the wallet of `account_key`, if any.
    pub async fn find_wallet(&self, account_key: &str) -> ResultEngine<Option<Wallet>> {
        let account_key = normalize_account_key(account_key)?;
        store::find_by_key(&self.database, &account_key).await
    }

    /// Every wallet, ordered by account key.
    pub async fn wallets(&self) -> ResultEngine<Vec<Wallet>> {
        store::find_all(&self.database).await
    }

    /// Open a wallet unless one already exists for `account_key`.
    ///
    /// Calling it twice never creates a second wallet: the second call
    /// returns [`Opened::Existing`] untouched.
    pub async fn create_if_absent(
        &self,
        account_key: &str,
        initial_balance: f64,
        enabled: bool,
    ) -> ResultEngine<Opened> {
        let account_key = normalize_account_key(account_key)?;
        ensure_finite(initial_balance, "initial")?;

        let _guard = self.locks.lock(&account_key).await;
        if let Some(existing) = store::find_by_key(&self.database, &account_key).await? {
            tracing::debug!(account_key = %account_key, "wallet already exists");
            return Ok(Opened::Existing(existing));
        }

        let wallet = store::save(
            &self.database,
            &Wallet::new(account_key, initial_balance, enabled),
        )
        .await?;
        tracing::info!(
            account_key = %wallet.account_key,
            balance = wallet.balance,
            "wallet created"
        );
        Ok(Opened::Created(wallet))
    }

    pub async fn deposit(&self, account_key: &str, amount: f64) -> ResultEngine<Wallet> {
        ensure_non_negative(amount, "deposit")?;
        self.mutate(account_key, |wallet| wallet.deposit(amount))
            .await
    }

    /// Subtract `amount`; the balance floors at zero instead of failing.
    pub async fn subtract(&self, account_key: &str, amount: f64) -> ResultEngine<Wallet> {
        ensure_non_negative(amount, "subtract")?;
        self.mutate(account_key, |wallet| wallet.subtract(amount))
            .await
    }

    pub async fn refill_to_default(
        &self,
        account_key: &str,
        default_amount: f64,
    ) -> ResultEngine<Wallet> {
        ensure_finite(default_amount, "refill")?;
        self.mutate(account_key, |wallet| wallet.set_balance(default_amount))
            .await
    }

    pub async fn set_enabled(&self, account_key: &str, enabled: bool) -> ResultEngine<Wallet> {
        self.mutate(account_key, |wallet| wallet.set_enabled(enabled))
            .await
    }

    /// Overwrite the balance. Restricting this to administrators is up to
    /// the caller.
    pub async fn set_balance(&self, account_key: &str, balance: f64) -> ResultEngine<Wallet> {
        ensure_finite(balance, "balance")?;
        self.mutate(account_key, |wallet| wallet.set_balance(balance))
            .await
    }

    pub async fn reset(&self, account_key: &str) -> ResultEngine<Wallet> {
        self.mutate(account_key, Wallet::reset).await
    }

    /// Read-modify-write of a single wallet inside its exclusive section.
    async fn mutate<F>(&self, account_key: &str, change: F) -> ResultEngine<Wallet>
    where
        F: FnOnce(&mut Wallet),
    {
        let account_key = normalize_account_key(account_key)?;
        let _guard = self.locks.lock(&account_key).await;

        let mut wallet = store::find_by_key(&self.database, &account_key)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(account_key.clone()))?;
        let before = wallet.balance;
        change(&mut wallet);
        if !wallet.balance.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "balance of {account_key} would overflow"
            )));
        }

        let wallet = store::save(&self.database, &wallet).await?;
        tracing::debug!(
            account_key = %wallet.account_key,
            before,
            after = wallet.balance,
            enabled = wallet.enabled,
            "wallet updated"
        );
        Ok(wallet)
    }
}
