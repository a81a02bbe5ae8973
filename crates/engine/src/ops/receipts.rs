//! Receipt attachment: blob through the collaborator, metadata row in the
//! store.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    BlobStore, NewReceipt, Receipt, ResultEngine, TimeFrame, attachments::stored_path, receipts,
};

use super::{Engine, with_tx};

impl Engine {
    /// Stores the image bytes under the owner's prefix, then persists the
    /// metadata row. The blob write happens before and outside the unit of
    /// work: a storage failure leaves no row behind, and no balance state is
    /// involved either way.
    pub async fn add_receipt(
        &self,
        user_id: i32,
        receipt: NewReceipt,
        store: &dyn BlobStore,
    ) -> ResultEngine<Receipt> {
        let reference = stored_path(user_id, &receipt.filename);
        store.put(&reference, &receipt.bytes)?;

        with_tx!(self, |db_tx| {
            let alias_id = self
                .resolve_bank_alias(&db_tx, user_id, receipt.bank_alias_id)
                .await?;

            let model = receipts::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                bank_alias_id: ActiveValue::Set(alias_id),
                image: ActiveValue::Set(reference.clone()),
                created_at: ActiveValue::Set(receipt.created_at.unwrap_or_else(Utc::now)),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(user_id, receipt_id = model.id, "stored receipt");
            Ok(model.into())
        })
    }

    /// Lists the owner's receipts inside a time window, newest first.
    pub async fn list_receipts(
        &self,
        user_id: i32,
        frame: TimeFrame,
    ) -> ResultEngine<Vec<Receipt>> {
        let (from_date, to_date) = frame.resolve(Utc::now())?;

        with_tx!(self, |db_tx| {
            let models = receipts::Entity::find()
                .filter(receipts::Column::UserId.eq(user_id))
                .filter(receipts::Column::CreatedAt.gte(from_date))
                .filter(receipts::Column::CreatedAt.lte(to_date))
                .order_by_desc(receipts::Column::CreatedAt)
                .order_by_asc(receipts::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }
}
