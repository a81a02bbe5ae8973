//! Cash-counter creation and reads.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{CashCounter, ResultEngine, counters, util::slugify};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Creates a counter as a child of the owner's root, with a zero balance.
    ///
    /// The optional bank alias must belong to the same owner.
    pub async fn add_cash_counter(
        &self,
        user_id: i32,
        name: &str,
        bank_alias_id: Option<i32>,
    ) -> ResultEngine<CashCounter> {
        let name = normalize_required_name(name, "cash counter")?;

        with_tx!(self, |db_tx| {
            let alias_id = self.resolve_bank_alias(&db_tx, user_id, bank_alias_id).await?;
            let root = self.root_counter_in(&db_tx, user_id).await?;

            let model = counters::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                parent_id: ActiveValue::Set(Some(root.id)),
                name: ActiveValue::Set(name.clone()),
                slug: ActiveValue::Set(slugify(&name)),
                bank_alias_id: ActiveValue::Set(alias_id),
                amount_cents: ActiveValue::Set(0),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(user_id, counter_id = model.id, "created cash counter");
            Ok(model.into())
        })
    }

    /// Owner-scoped counter detail.
    pub async fn cash_counter(&self, user_id: i32, counter_id: i32) -> ResultEngine<CashCounter> {
        with_tx!(self, |db_tx| {
            let model = self.require_counter(&db_tx, user_id, counter_id).await?;
            Ok(model.into())
        })
    }

    /// Lists the owner's counters carrying exactly the given bank alias
    /// (`None` matches counters without one, the root included).
    pub async fn list_cash_counters(
        &self,
        user_id: i32,
        bank_alias_id: Option<i32>,
    ) -> ResultEngine<Vec<CashCounter>> {
        with_tx!(self, |db_tx| {
            let mut query = counters::Entity::find().filter(counters::Column::UserId.eq(user_id));
            query = match bank_alias_id {
                Some(alias_id) => query.filter(counters::Column::BankAliasId.eq(alias_id)),
                None => query.filter(counters::Column::BankAliasId.is_null()),
            };
            let models = query.order_by_asc(counters::Column::Id).all(&db_tx).await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }
}
