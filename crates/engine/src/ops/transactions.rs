//! Transaction recording: the single immediate path, bulk ingestion, and the
//! windowed listing.

use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    BankTransaction, EngineError, NewTransaction, ResultEngine, TimeFrame, counters, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Records one transaction: the amount is folded into the counter and
    /// root first, then the row is persisted `applied = true`, all in one
    /// unit of work — a crash can never leave one without the other.
    ///
    /// Returns `None` (with nothing persisted) when the counter does not
    /// exist for this owner.
    pub async fn add_transaction(
        &self,
        user_id: i32,
        item: NewTransaction,
    ) -> ResultEngine<Option<BankTransaction>> {
        with_tx!(self, |db_tx| {
            let alias_id = self
                .resolve_bank_alias(&db_tx, user_id, item.bank_alias_id)
                .await?;

            match self
                .apply_immediate_in(&db_tx, user_id, item.counter_id, item.amount)
                .await?
            {
                None => Ok(None),
                Some(counter) => {
                    let model = transactions::ActiveModel {
                        user_id: ActiveValue::Set(user_id),
                        counter_id: ActiveValue::Set(counter.id),
                        bank_alias_id: ActiveValue::Set(alias_id),
                        amount_cents: ActiveValue::Set(item.amount.cents()),
                        created_at: ActiveValue::Set(item.created_at.unwrap_or_else(Utc::now)),
                        applied: ActiveValue::Set(true),
                        ..Default::default()
                    }
                    .insert(&db_tx)
                    .await?;
                    Ok(Some(model.into()))
                }
            }
        })
    }

    /// Bulk ingestion for a batch sharing one bank alias.
    ///
    /// All rows are inserted `applied = false` in one batch write, then each
    /// distinct counter is swept once — equivalent to applying every item
    /// individually, at a fraction of the root-update cost. Items whose
    /// counter is unknown or foreign are skipped, so one bad id cannot sink
    /// the batch. An empty batch is rejected outright.
    pub async fn add_bulk_transactions(
        &self,
        user_id: i32,
        bank_alias_id: Option<i32>,
        items: Vec<NewTransaction>,
    ) -> ResultEngine<()> {
        if items.is_empty() {
            return Err(EngineError::EmptyBatch);
        }

        with_tx!(self, |db_tx| {
            let alias_id = self.resolve_bank_alias(&db_tx, user_id, bank_alias_id).await?;

            let requested: BTreeSet<i32> = items.iter().map(|item| item.counter_id).collect();
            let owned: Vec<counters::Model> = counters::Entity::find()
                .filter(counters::Column::UserId.eq(user_id))
                .filter(counters::Column::Id.is_in(requested.iter().copied()))
                .all(&db_tx)
                .await?;
            let owned_ids: BTreeSet<i32> = owned.iter().map(|counter| counter.id).collect();
            for counter_id in requested.difference(&owned_ids) {
                tracing::warn!(
                    user_id,
                    counter_id = *counter_id,
                    "skipping bulk items for unknown cash counter"
                );
            }

            let rows: Vec<transactions::ActiveModel> = items
                .into_iter()
                .filter(|item| owned_ids.contains(&item.counter_id))
                .map(|item| transactions::ActiveModel {
                    user_id: ActiveValue::Set(user_id),
                    counter_id: ActiveValue::Set(item.counter_id),
                    bank_alias_id: ActiveValue::Set(alias_id),
                    amount_cents: ActiveValue::Set(item.amount.cents()),
                    // Each missing stamp defaults independently, not to one
                    // shared batch timestamp.
                    created_at: ActiveValue::Set(item.created_at.unwrap_or_else(Utc::now)),
                    applied: ActiveValue::Set(false),
                    ..Default::default()
                })
                .collect();

            if !rows.is_empty() {
                transactions::Entity::insert_many(rows).exec(&db_tx).await?;
            }
            for counter_id in owned_ids {
                self.sweep_unapplied_in(&db_tx, user_id, counter_id).await?;
            }
            Ok(())
        })
    }

    /// Lists the owner's transactions inside a time window, newest first.
    pub async fn list_transactions(
        &self,
        user_id: i32,
        frame: TimeFrame,
    ) -> ResultEngine<Vec<BankTransaction>> {
        let (from_date, to_date) = frame.resolve(Utc::now())?;

        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::CreatedAt.gte(from_date))
                .filter(transactions::Column::CreatedAt.lte(to_date))
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }
}
