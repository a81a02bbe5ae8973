//! Owner-scoped lookups shared by the operation modules.
//!
//! Every query here filters by owner **and** id in the same statement,
//! never "find by id, then compare the owner": a cross-owner id must be
//! indistinguishable from an id that does not exist.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, bank_aliases, counters, users};

use super::Engine;

impl Engine {
    /// Counter lookup for the noop-on-missing write paths: absent or foreign
    /// counters come back as `None`, never as an error.
    pub(super) async fn find_counter_scoped(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
        counter_id: i32,
    ) -> ResultEngine<Option<counters::Model>> {
        counters::Entity::find()
            .filter(counters::Column::Id.eq(counter_id))
            .filter(counters::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_counter(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
        counter_id: i32,
    ) -> ResultEngine<counters::Model> {
        self.find_counter_scoped(db, user_id, counter_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("cash counter not exists".to_string()))
    }

    /// The unique parentless counter of a user, if it exists.
    pub(super) async fn find_root_counter(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<Option<counters::Model>> {
        counters::Entity::find()
            .filter(counters::Column::UserId.eq(user_id))
            .filter(counters::Column::ParentId.is_null())
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Validates an optional bank-alias reference against the owner before
    /// any mutation; a foreign or unknown alias rejects the whole request.
    pub(super) async fn resolve_bank_alias(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
        bank_alias_id: Option<i32>,
    ) -> ResultEngine<Option<i32>> {
        let Some(alias_id) = bank_alias_id else {
            return Ok(None);
        };
        bank_aliases::Entity::find()
            .filter(bank_aliases::Column::Id.eq(alias_id))
            .filter(bank_aliases::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .map(|model| Some(model.id))
            .ok_or_else(|| EngineError::KeyNotFound("bank alias not exists".to_string()))
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
