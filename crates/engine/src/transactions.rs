//! Bank transaction records.
//!
//! A row is immutable after insert except for the `applied` flag: `false`
//! means the amount has not yet been folded into the target counter and
//! root, `true` means it has been folded exactly once. The single-creation
//! path inserts rows already applied; bulk ingestion inserts them unapplied
//! and relies on the sweep to flip them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Amount;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub counter_id: i32,
    pub bank_alias_id: Option<i32>,
    pub amount_cents: i64,
    pub created_at: DateTimeUtc,
    pub applied: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::counters::Entity",
        from = "Column::CounterId",
        to = "super::counters::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Counter,
}

impl Related<super::counters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A recorded transaction as returned by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: i32,
    pub user_id: i32,
    pub counter_id: i32,
    pub bank_alias_id: Option<i32>,
    pub amount: Amount,
    pub created_at: DateTimeUtc,
    pub applied: bool,
}

impl From<Model> for BankTransaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            counter_id: model.counter_id,
            bank_alias_id: model.bank_alias_id,
            amount: Amount::new(model.amount_cents),
            created_at: model.created_at,
            applied: model.applied,
        }
    }
}
