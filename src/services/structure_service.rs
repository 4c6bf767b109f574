use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{AcademicYearStatus, Department, StandardType};
use crate::repositories::{
    AcademicYearRepository, AttachmentRepository, CourseFileRepository, CourseRepository,
    ElementRepository, PointerRepository, StandardRepository,
};
use crate::services::error::{ServiceError, map_db_error};

#[derive(Debug, Serialize, ToSchema)]
pub struct YearStructure {
    pub academic_year: YearSummary,
    pub standards: Vec<StandardNode>,
    pub courses: Vec<CourseNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct YearSummary {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AcademicYearStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StandardNode {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub standard_type: StandardType,
    pub pointers: Vec<PointerNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PointerNode {
    pub id: Uuid,
    pub title: String,
    pub elements: Vec<ElementNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ElementNode {
    pub id: Uuid,
    pub title: String,
    pub attachments: Vec<LeafNode>,
}

/// Leaf entry: never the file itself or who uploaded it.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeafNode {
    pub id: Uuid,
    pub title: String,
    pub has_file: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseNode {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub level: i32,
    pub semester: i32,
    pub credit_hours: i32,
    pub department: Option<Department>,
    pub course_files: Vec<LeafNode>,
}

pub struct StructureService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StructureService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Read-only projection of one year. Each level is fetched in a single
    /// query and grouped by parent.
    pub async fn structure(&self, academic_year_id: Uuid) -> Result<YearStructure, ServiceError> {
        let year = AcademicYearRepository::new(self.db)
            .find_by_id(academic_year_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Academic year not found."))?;

        let standards = StandardRepository::new(self.db)
            .find_by_year(year.id)
            .await
            .map_err(map_db_error)?;
        let standard_ids: Vec<Uuid> = standards.iter().map(|s| s.id).collect();

        let pointers = PointerRepository::new(self.db)
            .find_by_standards(&standard_ids)
            .await
            .map_err(map_db_error)?;
        let pointer_ids: Vec<Uuid> = pointers.iter().map(|p| p.id).collect();

        let elements = ElementRepository::new(self.db)
            .find_by_pointers(&pointer_ids)
            .await
            .map_err(map_db_error)?;
        let element_ids: Vec<Uuid> = elements.iter().map(|e| e.id).collect();

        let attachments = AttachmentRepository::new(self.db)
            .find_by_elements(&element_ids)
            .await
            .map_err(map_db_error)?;

        let mut attachments_by_element: HashMap<Uuid, Vec<LeafNode>> = HashMap::new();
        for attachment in attachments {
            attachments_by_element
                .entry(attachment.element_id)
                .or_default()
                .push(LeafNode {
                    id: attachment.id,
                    has_file: attachment.has_file(),
                    title: attachment.title,
                });
        }

        let mut elements_by_pointer: HashMap<Uuid, Vec<ElementNode>> = HashMap::new();
        for element in elements {
            elements_by_pointer
                .entry(element.pointer_id)
                .or_default()
                .push(ElementNode {
                    id: element.id,
                    attachments: attachments_by_element.remove(&element.id).unwrap_or_default(),
                    title: element.title,
                });
        }

        let mut pointers_by_standard: HashMap<Uuid, Vec<PointerNode>> = HashMap::new();
        for pointer in pointers {
            pointers_by_standard
                .entry(pointer.standard_id)
                .or_default()
                .push(PointerNode {
                    id: pointer.id,
                    elements: elements_by_pointer.remove(&pointer.id).unwrap_or_default(),
                    title: pointer.title,
                });
        }

        let standards = standards
            .into_iter()
            .map(|standard| StandardNode {
                id: standard.id,
                standard_type: standard.r#type,
                pointers: pointers_by_standard.remove(&standard.id).unwrap_or_default(),
                title: standard.title,
            })
            .collect();

        let courses = CourseRepository::new(self.db)
            .find_by_year(year.id)
            .await
            .map_err(map_db_error)?;
        let course_ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();

        let file_repo = CourseFileRepository::new(self.db);
        let course_files = file_repo
            .find_by_courses(&course_ids)
            .await
            .map_err(map_db_error)?;
        let file_ids: Vec<Uuid> = course_files.iter().map(|f| f.id).collect();
        let with_attachments = file_repo
            .ids_with_attachments(&file_ids)
            .await
            .map_err(map_db_error)?;

        let mut files_by_course: HashMap<Uuid, Vec<LeafNode>> = HashMap::new();
        for file in course_files {
            files_by_course.entry(file.course_id).or_default().push(LeafNode {
                id: file.id,
                has_file: with_attachments.contains(&file.id),
                title: file.title,
            });
        }

        let courses = courses
            .into_iter()
            .map(|course| CourseNode {
                id: course.id,
                course_files: files_by_course.remove(&course.id).unwrap_or_default(),
                title: course.title,
                code: course.code,
                level: course.level,
                semester: course.semester,
                credit_hours: course.credit_hours,
                department: course.department,
            })
            .collect();

        Ok(YearStructure {
            academic_year: YearSummary {
                id: year.id,
                start_date: year.start_date,
                end_date: year.end_date,
                status: year.status,
            },
            standards,
            courses,
        })
    }
}
