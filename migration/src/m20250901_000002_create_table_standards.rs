use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_table_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================
        // ACADEMIC YEAR
        // ============================================
        manager
            .create_table(
                Table::create()
                    .table(AcademicYear::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AcademicYear::Id).uuid().not_null().primary_key())
                    // ACTIVE | ARCHIVED
                    .col(ColumnDef::new(AcademicYear::Status).string_len(8).not_null())
                    .col(ColumnDef::new(AcademicYear::StartDate).date().not_null())
                    .col(ColumnDef::new(AcademicYear::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(AcademicYear::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(AcademicYear::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_academic_year_start_date")
                    .table(AcademicYear::Table)
                    .col(AcademicYear::StartDate)
                    .to_owned(),
            )
            .await?;

        // ============================================
        // STANDARD + ASSIGNEES
        // ============================================
        manager
            .create_table(
                Table::create()
                    .table(Standard::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Standard::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Standard::AcademicYearId).uuid().not_null())
                    .col(ColumnDef::new(Standard::Title).string_len(255).not_null())
                    // ACADEMIC | PRAGMATIC
                    .col(ColumnDef::new(Standard::Type).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Standard::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Standard::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_standard_academic_year")
                            .from(Standard::Table, Standard::AcademicYearId)
                            .to(AcademicYear::Table, AcademicYear::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_standard_academic_year_id")
                    .table(Standard::Table)
                    .col(Standard::AcademicYearId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StandardAssignee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StandardAssignee::StandardId).uuid().not_null())
                    .col(ColumnDef::new(StandardAssignee::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_standard_assignee")
                            .col(StandardAssignee::StandardId)
                            .col(StandardAssignee::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_standard_assignee_standard")
                            .from(StandardAssignee::Table, StandardAssignee::StandardId)
                            .to(Standard::Table, Standard::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_standard_assignee_user")
                            .from(StandardAssignee::Table, StandardAssignee::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================
        // POINTER / ELEMENT
        // ============================================
        manager
            .create_table(
                Table::create()
                    .table(Pointer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pointer::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pointer::StandardId).uuid().not_null())
                    .col(ColumnDef::new(Pointer::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Pointer::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Pointer::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pointer_standard")
                            .from(Pointer::Table, Pointer::StandardId)
                            .to(Standard::Table, Standard::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Element::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Element::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Element::PointerId).uuid().not_null())
                    .col(ColumnDef::new(Element::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Element::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Element::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_element_pointer")
                            .from(Element::Table, Element::PointerId)
                            .to(Pointer::Table, Pointer::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================
        // ATTACHMENT + SHARES
        // ============================================
        manager
            .create_table(
                Table::create()
                    .table(Attachment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attachment::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Attachment::ElementId).uuid().not_null())
                    .col(
                        ColumnDef::new(Attachment::Title)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Attachment::File).string().null())
                    .col(ColumnDef::new(Attachment::FileName).string().null())
                    .col(ColumnDef::new(Attachment::UploadedBy).uuid().null())
                    .col(ColumnDef::new(Attachment::UploadedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Attachment::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Attachment::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_element")
                            .from(Attachment::Table, Attachment::ElementId)
                            .to(Element::Table, Element::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_uploaded_by")
                            .from(Attachment::Table, Attachment::UploadedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attachment_element_id")
                    .table(Attachment::Table)
                    .col(Attachment::ElementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttachmentShare::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttachmentShare::AttachmentId).uuid().not_null())
                    .col(ColumnDef::new(AttachmentShare::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_attachment_share")
                            .col(AttachmentShare::AttachmentId)
                            .col(AttachmentShare::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_share_attachment")
                            .from(AttachmentShare::Table, AttachmentShare::AttachmentId)
                            .to(Attachment::Table, Attachment::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_share_user")
                            .from(AttachmentShare::Table, AttachmentShare::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttachmentShare::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attachment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Element::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pointer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StandardAssignee::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Standard::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYear::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum AcademicYear {
    Table,
    Id,
    Status,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Standard {
    Table,
    Id,
    AcademicYearId,
    Title,
    Type,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StandardAssignee {
    Table,
    StandardId,
    UserId,
}

#[derive(DeriveIden)]
enum Pointer {
    Table,
    Id,
    StandardId,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Element {
    Table,
    Id,
    PointerId,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Attachment {
    Table,
    Id,
    ElementId,
    Title,
    File,
    FileName,
    UploadedBy,
    UploadedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttachmentShare {
    Table,
    AttachmentId,
    UserId,
}
