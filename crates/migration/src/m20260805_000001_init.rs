//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for myfin:
//!
//! - `users`: account rows anchoring ownership
//! - `bank_aliases`: per-user bank tags
//! - `counters`: balance-holding cash counters (one root per user)
//! - `transaction_categories`: per-user reporting tags
//! - `bank_transactions`: immutable transaction records with the `applied`
//!   flag driving the sweep
//! - `receipts`: attachment metadata pointing at externally stored blobs

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Password,
    Email,
}

#[derive(Iden)]
enum BankAliases {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(Iden)]
enum Counters {
    Table,
    Id,
    UserId,
    ParentId,
    Name,
    Slug,
    BankAliasId,
    AmountCents,
    UpdatedAt,
}

#[derive(Iden)]
enum TransactionCategories {
    Table,
    Id,
    UserId,
    Name,
    Icon,
}

#[derive(Iden)]
enum BankTransactions {
    Table,
    Id,
    UserId,
    CounterId,
    BankAliasId,
    AmountCents,
    CreatedAt,
    Applied,
}

#[derive(Iden)]
enum Receipts {
    Table,
    Id,
    UserId,
    BankAliasId,
    Image,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Bank aliases
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BankAliases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAliases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAliases::UserId).integer().not_null())
                    .col(ColumnDef::new(BankAliases::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_aliases-user_id")
                            .from(BankAliases::Table, BankAliases::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_aliases-user_id-name-unique")
                    .table(BankAliases::Table)
                    .col(BankAliases::UserId)
                    .col(BankAliases::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Counters
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Counters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Counters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Counters::UserId).integer().not_null())
                    .col(ColumnDef::new(Counters::ParentId).integer())
                    .col(ColumnDef::new(Counters::Name).string().not_null())
                    .col(ColumnDef::new(Counters::Slug).string().not_null())
                    .col(ColumnDef::new(Counters::BankAliasId).integer())
                    .col(
                        ColumnDef::new(Counters::AmountCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Counters::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-counters-user_id")
                            .from(Counters::Table, Counters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-counters-parent_id")
                            .from(Counters::Table, Counters::ParentId)
                            .to(Counters::Table, Counters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-counters-bank_alias_id")
                            .from(Counters::Table, Counters::BankAliasId)
                            .to(BankAliases::Table, BankAliases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-counters-user_id")
                    .table(Counters::Table)
                    .col(Counters::UserId)
                    .to_owned(),
            )
            .await?;

        // One root (parent_id IS NULL) per user. Partial indexes are not
        // expressible through the index builder, so raw SQL it is.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"idx-counters-user_id-root-unique\" \
                 ON \"counters\" (\"user_id\") WHERE \"parent_id\" IS NULL;",
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Transaction categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TransactionCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransactionCategories::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionCategories::Name)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransactionCategories::Icon).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_categories-user_id")
                            .from(TransactionCategories::Table, TransactionCategories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction_categories-user_id")
                    .table(TransactionCategories::Table)
                    .col(TransactionCategories::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Bank transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BankTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankTransactions::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(BankTransactions::CounterId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankTransactions::BankAliasId).integer())
                    .col(
                        ColumnDef::new(BankTransactions::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankTransactions::Applied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_transactions-user_id")
                            .from(BankTransactions::Table, BankTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_transactions-counter_id")
                            .from(BankTransactions::Table, BankTransactions::CounterId)
                            .to(Counters::Table, Counters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_transactions-bank_alias_id")
                            .from(BankTransactions::Table, BankTransactions::BankAliasId)
                            .to(BankAliases::Table, BankAliases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Sweep scans by (counter, applied); listings scan by (user, time).
        manager
            .create_index(
                Index::create()
                    .name("idx-bank_transactions-counter_id-applied")
                    .table(BankTransactions::Table)
                    .col(BankTransactions::CounterId)
                    .col(BankTransactions::Applied)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_transactions-user_id-created_at")
                    .table(BankTransactions::Table)
                    .col(BankTransactions::UserId)
                    .col(BankTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Receipts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Receipts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Receipts::UserId).integer().not_null())
                    .col(ColumnDef::new(Receipts::BankAliasId).integer())
                    .col(ColumnDef::new(Receipts::Image).string().not_null())
                    .col(ColumnDef::new(Receipts::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-receipts-user_id")
                            .from(Receipts::Table, Receipts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-receipts-bank_alias_id")
                            .from(Receipts::Table, Receipts::BankAliasId)
                            .to(BankAliases::Table, BankAliases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-receipts-user_id-created_at")
                    .table(Receipts::Table)
                    .col(Receipts::UserId)
                    .col(Receipts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransactionCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Counters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAliases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
