//! `SeaORM` entities

pub mod prelude;

pub mod academic_year;
pub mod attachment;
pub mod attachment_share;
pub mod course;
pub mod course_attachment;
pub mod course_file;
pub mod element;
pub mod pointer;
pub mod request;
pub mod sea_orm_active_enums;
pub mod standard;
pub mod standard_assignee;
pub mod user;
