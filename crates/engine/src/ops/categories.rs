//! Transaction-category creation and reads.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{ResultEngine, TransactionCategory, categories};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub async fn add_transaction_category(
        &self,
        user_id: i32,
        name: &str,
    ) -> ResultEngine<TransactionCategory> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let model = categories::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                name: ActiveValue::Set(name),
                icon: ActiveValue::Set(None),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(model.into())
        })
    }

    pub async fn list_transaction_categories(
        &self,
        user_id: i32,
    ) -> ResultEngine<Vec<TransactionCategory>> {
        with_tx!(self, |db_tx| {
            let models = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }
}
