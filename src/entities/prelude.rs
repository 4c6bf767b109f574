//! `SeaORM` entity prelude

pub use super::academic_year::Entity as AcademicYear;
pub use super::attachment::Entity as Attachment;
pub use super::attachment_share::Entity as AttachmentShare;
pub use super::course::Entity as Course;
pub use super::course_attachment::Entity as CourseAttachment;
pub use super::course_file::Entity as CourseFile;
pub use super::element::Entity as Element;
pub use super::pointer::Entity as Pointer;
pub use super::request::Entity as Request;
pub use super::standard::Entity as Standard;
pub use super::standard_assignee::Entity as StandardAssignee;
pub use super::user::Entity as User;
