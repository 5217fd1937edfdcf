//! Wallet persistence.
//!
//! Every function is generic over [`ConnectionTrait`] so the same code runs
//! on the pool and inside a [`DatabaseTransaction`].
//!
//! [`DatabaseTransaction`]: sea_orm::DatabaseTransaction

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{ResultEngine, Wallet, wallets};

/// Look a wallet up by its account key.
pub(crate) async fn find_by_key<C>(db: &C, account_key: &str) -> ResultEngine<Option<Wallet>>
where
    C: ConnectionTrait,
{
    wallets::Entity::find()
        .filter(wallets::Column::AccountKey.eq(account_key))
        .one(db)
        .await?
        .map(Wallet::try_from)
        .transpose()
}

/// Upsert by id: overwrite the stored row, or insert it when absent.
pub(crate) async fn save<C>(db: &C, wallet: &Wallet) -> ResultEngine<Wallet>
where
    C: ConnectionTrait,
{
    let active = wallets::ActiveModel::from(wallet);
    let model = match active.clone().update(db).await {
        Ok(model) => model,
        Err(DbErr::RecordNotUpdated) => active.insert(db).await?,
        Err(err) => return Err(err.into()),
    };
    Wallet::try_from(model)
}

/// All wallets, ordered by account key.
pub(crate) async fn find_all<C>(db: &C) -> ResultEngine<Vec<Wallet>>
where
    C: ConnectionTrait,
{
    wallets::Entity::find()
        .order_by_asc(wallets::Column::AccountKey)
        .all(db)
        .await?
        .into_iter()
        .map(Wallet::try_from)
        .collect()
}
