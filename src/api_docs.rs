use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "QAU API",
        description = "Quality assurance artifacts: academic years, standards, courses and file sharing requests"
    ),
    paths(
        routes::health::route::health,
        routes::auth::route::obtain_token,
        routes::users::route::list_users,
        routes::users::route::create_user,
        routes::users::route::get_user,
        routes::users::route::update_user,
        routes::users::route::delete_user,
        routes::users::route::current_user,
        routes::academic_years::route::list_academic_years,
        routes::academic_years::route::create_academic_year,
        routes::academic_years::route::get_academic_year,
        routes::academic_years::route::update_academic_year,
        routes::academic_years::route::delete_academic_year,
        routes::academic_years::route::academic_year_structure,
        routes::academic_years::route::create_new_year,
        routes::standards::route::list_standards,
        routes::standards::route::create_standard,
        routes::standards::route::get_standard,
        routes::standards::route::update_standard,
        routes::standards::route::delete_standard,
        routes::pointers::route::list_pointers,
        routes::pointers::route::create_pointer,
        routes::pointers::route::get_pointer,
        routes::pointers::route::update_pointer,
        routes::pointers::route::delete_pointer,
        routes::elements::route::list_elements,
        routes::elements::route::create_element,
        routes::elements::route::get_element,
        routes::elements::route::update_element,
        routes::elements::route::delete_element,
        routes::attachments::route::list_attachments,
        routes::attachments::route::create_attachment,
        routes::attachments::route::get_attachment,
        routes::attachments::route::update_attachment,
        routes::attachments::route::delete_attachment,
        routes::attachments::route::upload_file,
        routes::attachments::route::remove_file,
        routes::attachments::route::download_file,
        routes::requests::route::list_requests,
        routes::requests::route::create_request,
        routes::requests::route::get_request,
        routes::requests::route::update_request,
        routes::requests::route::delete_request,
        routes::requests::route::approve_request,
        routes::requests::route::reject_request,
        routes::requests::route::cancel_request,
        routes::courses::route::list_courses,
        routes::courses::route::create_course,
        routes::courses::route::get_course,
        routes::courses::route::update_course,
        routes::courses::route::delete_course,
        routes::course_files::route::list_course_files,
        routes::course_files::route::create_course_file,
        routes::course_files::route::get_course_file,
        routes::course_files::route::update_course_file,
        routes::course_files::route::delete_course_file,
        routes::course_attachments::route::list_course_attachments,
        routes::course_attachments::route::create_course_attachment,
        routes::course_attachments::route::get_course_attachment,
        routes::course_attachments::route::delete_course_attachment,
        routes::course_attachments::route::download_course_attachment,
    ),
    components(schemas(routes::error_mapper::ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health"),
        (name = "Authentication", description = "Bearer token issuance"),
        (name = "Users"),
        (name = "Academic Years", description = "Years, their structure and year replication"),
        (name = "Standards"),
        (name = "Pointers"),
        (name = "Elements"),
        (name = "Attachments", description = "Attachment placeholders and their files"),
        (name = "Requests", description = "Download access requests and their approval"),
        (name = "Courses"),
        (name = "Course Files"),
        (name = "Course Attachments")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_actions_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/requests/{request_id}/approve"));
        assert!(doc.paths.paths.contains_key("/api/v1/academic-years/create_new_year"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
