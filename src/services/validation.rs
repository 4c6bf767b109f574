use chrono::NaiveDate;

use crate::entities::sea_orm_active_enums::Department;
use crate::services::error::ServiceError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_COURSE_CODE_LEN: usize = 50;

pub fn validate_year_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), ServiceError> {
    if start_date >= end_date {
        return Err(ServiceError::validation("End date must be after start date."));
    }
    Ok(())
}

/// Length in characters, as the database columns count it.
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.chars().count() > max {
        return Err(ServiceError::validation(format!(
            "{field} may not exceed {max} characters."
        )));
    }
    Ok(())
}

/// Trimmed non-empty title.
pub fn require_title(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty.")));
    }
    check_length(field, trimmed, MAX_TITLE_LEN)?;
    Ok(trimmed.to_string())
}

pub fn validate_course_code(code: &str) -> Result<String, ServiceError> {
    let code = require_title("Code", code)?;
    check_length("Code", &code, MAX_COURSE_CODE_LEN)?;
    Ok(code)
}

pub struct CourseFields<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub level: i32,
    pub semester: i32,
    pub credit_hours: i32,
    pub department: Option<Department>,
}

pub fn validate_course(fields: &CourseFields<'_>) -> Result<(), ServiceError> {
    require_title("Title", fields.title)?;
    validate_course_code(fields.code)?;

    if !(1..=4).contains(&fields.level) {
        return Err(ServiceError::validation("Level must be between 1 and 4."));
    }
    if !(1..=2).contains(&fields.semester) {
        return Err(ServiceError::validation("Semester must be 1 or 2."));
    }
    if !(0..=4).contains(&fields.credit_hours) {
        return Err(ServiceError::validation(
            "Credit hours must be between 0 and 4.",
        ));
    }
    validate_department(Some(fields.level), fields.department)
}

/// A department may only be chosen for courses above level 2.
pub fn validate_department(
    level: Option<i32>,
    department: Option<Department>,
) -> Result<(), ServiceError> {
    match (department, level) {
        (None, _) => Ok(()),
        (Some(_), Some(level)) if level > 2 => Ok(()),
        (Some(_), _) => Err(ServiceError::validation(
            "Department can only be set if level is greater than 2.",
        )),
    }
}

pub fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ServiceError::validation("Enter a valid email address."));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(level: i32, department: Option<Department>) -> CourseFields<'static> {
        CourseFields {
            title: "Compilers",
            code: "CS401",
            level,
            semester: 1,
            credit_hours: 3,
            department,
        }
    }

    #[test]
    fn department_requires_level_above_two() {
        assert!(validate_course(&course(1, Some(Department::ComputerScience))).is_err());
        assert!(validate_course(&course(2, Some(Department::Network))).is_err());
        assert!(validate_department(None, Some(Department::InformationSystems)).is_err());

        for department in [
            Department::ArtificialIntelligence,
            Department::ComputerScience,
            Department::Network,
            Department::InformationSystems,
        ] {
            assert!(validate_course(&course(3, Some(department))).is_ok());
            assert!(validate_course(&course(4, Some(department))).is_ok());
        }
        assert!(validate_course(&course(1, None)).is_ok());
    }

    #[test]
    fn course_ranges_are_enforced() {
        assert!(validate_course(&course(5, None)).is_err());
        assert!(validate_course(&course(0, None)).is_err());

        let mut fields = course(2, None);
        fields.semester = 3;
        assert!(validate_course(&fields).is_err());

        let mut fields = course(2, None);
        fields.credit_hours = 5;
        assert!(validate_course(&fields).is_err());

        let mut fields = course(2, None);
        fields.code = "  ";
        assert!(validate_course(&fields).is_err());
    }

    #[test]
    fn lengths_follow_the_columns() {
        let code = "C".repeat(MAX_COURSE_CODE_LEN);
        assert_eq!(validate_course_code(&code).unwrap(), code);

        let err = validate_course_code(&format!("{code}X")).unwrap_err();
        assert_eq!(err.message(), "Code may not exceed 50 characters.");

        let title = "é".repeat(MAX_TITLE_LEN);
        assert!(require_title("Title", &title).is_ok());
        assert!(require_title("Title", &format!("{title}é")).is_err());
    }

    #[test]
    fn year_must_end_after_it_starts() {
        let start = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert!(validate_year_dates(start, end).is_ok());
        assert!(validate_year_dates(end, start).is_err());
        assert!(validate_year_dates(start, start).is_err());
    }

    #[test]
    fn email_and_password_rules() {
        assert_eq!(validate_email(" TA1@Example.com ").unwrap(), "ta1@example.com");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("password123").is_ok());
    }
}
