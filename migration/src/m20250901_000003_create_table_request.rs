use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_table_user::User;
use crate::m20250901_000002_create_table_standards::Attachment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Request::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Request::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Request::RequesterId).uuid().not_null())
                    .col(ColumnDef::new(Request::ReceiverId).uuid().not_null())
                    .col(ColumnDef::new(Request::MadeOnId).uuid().not_null())
                    // PENDING | APPROVED | REJECTED | CANCELED
                    .col(
                        ColumnDef::new(Request::Status)
                            .string_len(10)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Request::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Request::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_requester")
                            .from(Request::Table, Request::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_receiver")
                            .from(Request::Table, Request::ReceiverId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_made_on")
                            .from(Request::Table, Request::MadeOnId)
                            .to(Attachment::Table, Attachment::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_requester_id")
                    .table(Request::Table)
                    .col(Request::RequesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_receiver_id")
                    .table(Request::Table)
                    .col(Request::ReceiverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_status")
                    .table(Request::Table)
                    .col(Request::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for index in [
            "idx_request_status",
            "idx_request_receiver_id",
            "idx_request_requester_id",
        ] {
            manager
                .drop_index(Index::drop().name(index).table(Request::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Request::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Request {
    Table,
    Id,
    RequesterId,
    ReceiverId,
    MadeOnId,
    Status,
    CreatedAt,
    UpdatedAt,
}
