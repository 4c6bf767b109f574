pub mod academic_years;
pub mod attachments;
pub mod auth;
pub mod course_attachments;
pub mod course_files;
pub mod courses;
pub mod elements;
pub mod error_mapper;
pub mod files;
pub mod health;
pub mod pointers;
pub mod requests;
pub mod standards;
pub mod users;

