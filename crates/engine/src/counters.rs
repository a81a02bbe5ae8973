//! Cash counters: the balance-holding nodes of the engine.
//!
//! Counters form a two-level tree per user. The single parentless row is the
//! **root** and always carries the sum of every other counter's balance for
//! that user; children are created on demand and hold the per-counter
//! balances that transactions target. Balances are only ever mutated by the
//! balance ops, through in-place increments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Amount;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "counters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub bank_alias_id: Option<i32>,
    pub amount_cents: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    BankTransactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A cash counter as returned by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashCounter {
    pub id: i32,
    pub user_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub bank_alias_id: Option<i32>,
    pub amount: Amount,
    pub updated_at: DateTimeUtc,
}

impl CashCounter {
    /// `true` for the single parentless counter of a user.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl From<Model> for CashCounter {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            parent_id: model.parent_id,
            name: model.name,
            slug: model.slug,
            bank_alias_id: model.bank_alias_id,
            amount: Amount::new(model.amount_cents),
            updated_at: model.updated_at,
        }
    }
}
