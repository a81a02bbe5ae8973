//! Bank-alias creation and reads.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{BankAlias, ResultEngine, bank_aliases};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Get-or-create semantics: one alias per (owner, name).
    pub async fn add_bank_alias(&self, user_id: i32, name: &str) -> ResultEngine<BankAlias> {
        let name = normalize_required_name(name, "bank alias")?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let existing = bank_aliases::Entity::find()
                .filter(bank_aliases::Column::UserId.eq(user_id))
                .filter(bank_aliases::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            let model = match existing {
                Some(model) => model,
                None => {
                    bank_aliases::ActiveModel {
                        user_id: ActiveValue::Set(user_id),
                        name: ActiveValue::Set(name),
                        ..Default::default()
                    }
                    .insert(&db_tx)
                    .await?
                }
            };
            Ok(model.into())
        })
    }

    pub async fn list_bank_aliases(&self, user_id: i32) -> ResultEngine<Vec<BankAlias>> {
        with_tx!(self, |db_tx| {
            let models = bank_aliases::Entity::find()
                .filter(bank_aliases::Column::UserId.eq(user_id))
                .order_by_asc(bank_aliases::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }
}
