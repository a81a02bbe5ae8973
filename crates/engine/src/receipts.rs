//! Receipt attachments: metadata rows pointing at an opaque stored blob.
//! The blob itself lives behind the [`BlobStore`] collaborator and never
//! enters the database.
//!
//! [`BlobStore`]: crate::BlobStore

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub bank_alias_id: Option<i32>,
    pub image: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i32,
    pub bank_alias_id: Option<i32>,
    pub image: String,
    pub created_at: DateTimeUtc,
}

impl From<Model> for Receipt {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            bank_alias_id: model.bank_alias_id,
            image: model.image,
            created_at: model.created_at,
        }
    }
}
