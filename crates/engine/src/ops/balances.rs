//! Balance propagation: the only code allowed to touch counter balances.
//!
//! Two update modes keep counters consistent with their transactions:
//!
//! - [`Engine::apply_immediate`] folds one amount into a counter and the
//!   owner's root right away.
//! - [`Engine::sweep_unapplied`] folds every not-yet-applied transaction of
//!   one counter in a single batch, flipping exactly the rows it summed.
//!
//! All balance writes are in-place increments executed by the store
//! (`amount_cents = amount_cents + ?`), never an application-side
//! read-modify-write, so concurrent callers cannot lose updates as long as
//! the store serializes writers.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{Amount, CashCounter, EngineError, ResultEngine, counters, transactions, util::slugify};

use super::{Engine, with_tx};

impl Engine {
    /// Folds `amount` into one counter and the owner's root, atomically.
    ///
    /// Returns the refreshed counter, or `None` when no counter matches the
    /// owner and id (nothing is changed in that case). The caller persists
    /// the transaction record itself, inside the same unit of work where it
    /// needs one.
    pub async fn apply_immediate(
        &self,
        user_id: i32,
        counter_id: i32,
        amount: Amount,
    ) -> ResultEngine<Option<CashCounter>> {
        with_tx!(self, |db_tx| {
            self.apply_immediate_in(&db_tx, user_id, counter_id, amount)
                .await
        })
    }

    pub(super) async fn apply_immediate_in(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
        counter_id: i32,
        amount: Amount,
    ) -> ResultEngine<Option<CashCounter>> {
        let Some(counter) = self.find_counter_scoped(db_tx, user_id, counter_id).await? else {
            return Ok(None);
        };

        self.increment_counter(db_tx, user_id, counter.id, amount)
            .await?;
        // A counter is incremented exactly once per application; when the
        // target is the root itself there is no second node to update.
        if counter.parent_id.is_some() {
            self.increment_root(db_tx, user_id, amount).await?;
        }
        tracing::debug!(user_id, counter_id, amount = %amount, "applied amount");

        let refreshed = self.require_counter(db_tx, user_id, counter.id).await?;
        Ok(Some(refreshed.into()))
    }

    /// Folds every unapplied transaction of one counter into its balance and
    /// the root's, then marks those rows applied.
    ///
    /// No-op when the counter does not exist for this owner or when there is
    /// nothing unapplied, which makes the call idempotent: a second sweep
    /// with no new rows in between changes nothing.
    pub async fn sweep_unapplied(&self, user_id: i32, counter_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.sweep_unapplied_in(&db_tx, user_id, counter_id).await
        })
    }

    pub(super) async fn sweep_unapplied_in(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
        counter_id: i32,
    ) -> ResultEngine<()> {
        let Some(counter) = self.find_counter_scoped(db_tx, user_id, counter_id).await? else {
            return Ok(());
        };

        let unapplied: Vec<transactions::Model> = transactions::Entity::find()
            .filter(transactions::Column::CounterId.eq(counter.id))
            .filter(transactions::Column::Applied.eq(false))
            .all(db_tx)
            .await?;
        if unapplied.is_empty() {
            return Ok(());
        }

        let mut total = Amount::ZERO;
        for row in &unapplied {
            total = total
                .checked_add(Amount::new(row.amount_cents))
                .ok_or_else(|| {
                    EngineError::InvalidAmount("unapplied sum overflows".to_string())
                })?;
        }

        // Flip by id so the applied set is exactly the summed set: a row
        // created after the read above stays unapplied for the next sweep.
        let ids: Vec<i32> = unapplied.iter().map(|row| row.id).collect();
        transactions::Entity::update_many()
            .col_expr(transactions::Column::Applied, Expr::value(true))
            .filter(transactions::Column::Id.is_in(ids))
            .exec(db_tx)
            .await?;

        self.increment_counter(db_tx, user_id, counter.id, total)
            .await?;
        if counter.parent_id.is_some() {
            self.increment_root(db_tx, user_id, total).await?;
        }
        tracing::info!(
            user_id,
            counter_id,
            swept = unapplied.len(),
            total = %total,
            "swept unapplied transactions"
        );

        Ok(())
    }

    /// Returns the owner's root counter, creating it with its deterministic
    /// name when missing.
    pub async fn root_counter(&self, user_id: i32) -> ResultEngine<CashCounter> {
        with_tx!(self, |db_tx| {
            let model = self.root_counter_in(&db_tx, user_id).await?;
            Ok(model.into())
        })
    }

    pub(super) async fn root_counter_in(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<counters::Model> {
        if let Some(model) = self.find_root_counter(db_tx, user_id).await? {
            return Ok(model);
        }

        // Self-healing fallback: the root is normally created at
        // registration and never deleted.
        let user = self.require_user(db_tx, user_id).await?;
        let name = format!("{}-root-counter", user.username);
        let model = counters::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            parent_id: ActiveValue::Set(None),
            name: ActiveValue::Set(name.clone()),
            slug: ActiveValue::Set(slugify(&name)),
            bank_alias_id: ActiveValue::Set(None),
            amount_cents: ActiveValue::Set(0),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(db_tx)
        .await?;
        tracing::warn!(user_id, "root counter was missing, recreated");
        Ok(model)
    }

    /// In-place, store-side increment of one owner-scoped counter row.
    async fn increment_counter(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
        counter_id: i32,
        amount: Amount,
    ) -> ResultEngine<()> {
        counters::Entity::update_many()
            .col_expr(
                counters::Column::AmountCents,
                Expr::col(counters::Column::AmountCents).add(amount.cents()),
            )
            .filter(counters::Column::Id.eq(counter_id))
            .filter(counters::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;
        Ok(())
    }

    /// Same increment, targeted at the owner's root row.
    async fn increment_root(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
        amount: Amount,
    ) -> ResultEngine<()> {
        self.root_counter_in(db_tx, user_id).await?;
        counters::Entity::update_many()
            .col_expr(
                counters::Column::AmountCents,
                Expr::col(counters::Column::AmountCents).add(amount.cents()),
            )
            .filter(counters::Column::UserId.eq(user_id))
            .filter(counters::Column::ParentId.is_null())
            .exec(db_tx)
            .await?;
        Ok(())
    }
}
