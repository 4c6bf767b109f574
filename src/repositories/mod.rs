pub mod academic_year_repository;
pub mod attachment_repository;
pub mod cascade;
pub mod course_attachment_repository;
pub mod course_file_repository;
pub mod course_repository;
pub mod element_repository;
pub mod pointer_repository;
pub mod request_repository;
pub mod standard_repository;
pub mod user_repository;

pub use academic_year_repository::{AcademicYearFilter, AcademicYearRepository};
pub use attachment_repository::{AttachmentFilter, AttachmentRepository};
pub use cascade::OwnershipCascade;
pub use course_attachment_repository::{CourseAttachmentFilter, CourseAttachmentRepository};
pub use course_file_repository::{CourseFileFilter, CourseFileRepository};
pub use course_repository::{CourseFilter, CourseRepository};
pub use element_repository::{ElementFilter, ElementRepository};
pub use pointer_repository::{PointerFilter, PointerRepository};
pub use request_repository::{RequestFilter, RequestRepository};
pub use standard_repository::{StandardFilter, StandardRepository};
pub use user_repository::{UserFilter, UserRepository};

use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};

/// Case-insensitive substring match on a text column.
pub(crate) fn icontains<T: ColumnTrait>(column: T, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", needle.trim().to_lowercase());
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column)))).like(pattern)
}

pub(crate) fn non_empty(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}
