// `MigrationTrait`'s async fns use an elided `SchemaManager` lifetime that
// cannot be written as `<'_>` in impls (E0195), so the idiom lint must be
// allowed in this module.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_bids_table::Migration),
            Box::new(m20250101_000003_create_bid_items_table::Migration),
            Box::new(m20250101_000004_create_ledger_entries_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_bids_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_bids_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bids::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bids::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bids::ClientOrg).string().not_null())
                        .col(ColumnDef::new(Bids::SolicitationNumber).string().not_null())
                        .col(ColumnDef::new(Bids::Subject).string().not_null())
                        .col(ColumnDef::new(Bids::OpeningDate).date().not_null())
                        .col(ColumnDef::new(Bids::ProposedValue).decimal().null())
                        .col(ColumnDef::new(Bids::Status).string().not_null())
                        .col(
                            ColumnDef::new(Bids::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Bids::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_bids_opening_date")
                        .table(Bids::Table)
                        .col(Bids::OpeningDate)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bids::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Bids {
        Table,
        Id,
        ClientOrg,
        SolicitationNumber,
        Subject,
        OpeningDate,
        ProposedValue,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000003_create_bid_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_bid_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Cascade deletion is performed explicitly by the bid service, not
            // by the foreign key.
            manager
                .create_table(
                    Table::create()
                        .table(BidItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(BidItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(BidItems::BidId).uuid().not_null())
                        .col(ColumnDef::new(BidItems::Description).string().not_null())
                        .col(ColumnDef::new(BidItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(BidItems::UnitCost).decimal().not_null())
                        .col(
                            ColumnDef::new(BidItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bid_items_bid")
                                .from(BidItems::Table, BidItems::BidId)
                                .to(Bids::Table, Bids::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BidItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum BidItems {
        Table,
        Id,
        BidId,
        Description,
        Quantity,
        UnitCost,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Bids {
        Table,
        Id,
    }
}

mod m20250101_000004_create_ledger_entries_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_ledger_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // No foreign key on bid_id: entries outlive bid deletion as
            // orphaned history, so a dangling reference must stay valid.
            manager
                .create_table(
                    Table::create()
                        .table(LedgerEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LedgerEntries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::EntryDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::Description)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LedgerEntries::Amount).decimal().not_null())
                        .col(ColumnDef::new(LedgerEntries::BidId).uuid().null())
                        .col(
                            ColumnDef::new(LedgerEntries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_ledger_entries_bid_id")
                        .table(LedgerEntries::Table)
                        .col(LedgerEntries::BidId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum LedgerEntries {
        Table,
        Id,
        EntryDate,
        Description,
        Amount,
        BidId,
        CreatedAt,
    }
}
