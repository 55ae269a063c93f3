//! Create guest table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guest::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Guest::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Guest::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Guest::Email).string_len(256))
                    .col(ColumnDef::new(Guest::Phone).string_len(64))
                    .col(ColumnDef::new(Guest::BridalParty).boolean().not_null().default(false))
                    .col(ColumnDef::new(Guest::NzInvite).boolean().not_null().default(false))
                    .col(ColumnDef::new(Guest::MyInvite).boolean().not_null().default(false))
                    .col(ColumnDef::new(Guest::Dinner).boolean().not_null().default(false))
                    .col(ColumnDef::new(Guest::Rsvp).boolean())
                    .col(ColumnDef::new(Guest::RsvpOthersYes).string_len(512))
                    .col(ColumnDef::new(Guest::RsvpOthersNo).string_len(512))
                    .col(ColumnDef::new(Guest::RsvpDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Guest::RsvpToken).string_len(24))
                    .col(ColumnDef::new(Guest::InvitedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Guest::RsvpViewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Guest::TableNumber).integer())
                    .col(ColumnDef::new(Guest::Notes).text())
                    .col(
                        ColumnDef::new(Guest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Guest::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: (first_name, last_name). Two independent write
        // paths (CRUD, import) must never race into a duplicate, so the
        // storage layer is the final arbiter.
        manager
            .create_index(
                Index::create()
                    .name("idx_guest_name")
                    .table(Guest::Table)
                    .col(Guest::FirstName)
                    .col(Guest::LastName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: rsvp_token (NULL allowed for legacy rows).
        manager
            .create_index(
                Index::create()
                    .name("idx_guest_token")
                    .table(Guest::Table)
                    .col(Guest::RsvpToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: list ordering (last_name, first_name)
        manager
            .create_index(
                Index::create()
                    .name("idx_guest_last_first")
                    .table(Guest::Table)
                    .col(Guest::LastName)
                    .col(Guest::FirstName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Guest {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    BridalParty,
    NzInvite,
    MyInvite,
    Dinner,
    Rsvp,
    RsvpOthersYes,
    RsvpOthersNo,
    RsvpDate,
    RsvpToken,
    InvitedAt,
    RsvpViewedAt,
    TableNumber,
    Notes,
    CreatedAt,
    UpdatedAt,
}
