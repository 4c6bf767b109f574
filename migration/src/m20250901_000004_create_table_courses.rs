use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_table_user::User;
use crate::m20250901_000002_create_table_standards::AcademicYear;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Course::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Course::AcademicYearId).uuid().not_null())
                    .col(ColumnDef::new(Course::ProfessorId).uuid().null())
                    .col(ColumnDef::new(Course::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Course::Code).string_len(50).not_null())
                    .col(ColumnDef::new(Course::Level).integer().not_null())
                    .col(ColumnDef::new(Course::Semester).integer().not_null())
                    .col(ColumnDef::new(Course::CreditHours).integer().not_null())
                    // AI | CS | NT | IS, only for level > 2
                    .col(ColumnDef::new(Course::Department).string_len(50).null())
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Course::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_academic_year")
                            .from(Course::Table, Course::AcademicYearId)
                            .to(AcademicYear::Table, AcademicYear::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_professor")
                            .from(Course::Table, Course::ProfessorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_academic_year_id")
                    .table(Course::Table)
                    .col(Course::AcademicYearId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseFile::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CourseFile::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CourseFile::CourseId).uuid().not_null())
                    .col(ColumnDef::new(CourseFile::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(CourseFile::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(CourseFile::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_file_course")
                            .from(CourseFile::Table, CourseFile::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseAttachment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseAttachment::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseAttachment::CourseFileId).uuid().not_null())
                    .col(ColumnDef::new(CourseAttachment::File).string().not_null())
                    .col(ColumnDef::new(CourseAttachment::FileName).string().not_null())
                    .col(
                        ColumnDef::new(CourseAttachment::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(CourseAttachment::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_attachment_course_file")
                            .from(CourseAttachment::Table, CourseAttachment::CourseFileId)
                            .to(CourseFile::Table, CourseFile::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseAttachment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseFile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
    AcademicYearId,
    ProfessorId,
    Title,
    Code,
    Level,
    Semester,
    CreditHours,
    Department,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseFile {
    Table,
    Id,
    CourseId,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseAttachment {
    Table,
    Id,
    CourseFileId,
    File,
    FileName,
    CreatedAt,
    UpdatedAt,
}
