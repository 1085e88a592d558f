use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::Course;

/// Query payload for the catalog endpoint. Empty strings and zero flags mean
/// "no restriction". Field spellings (including `OnleyNTUST`) are the wire
/// format and must not be corrected.
#[derive(Debug, Clone, Serialize)]
pub struct QueryCoursesRequest {
    #[serde(rename = "Semester")]
    pub semester: String,
    #[serde(rename = "CourseNo")]
    pub course_no: String,
    #[serde(rename = "CourseName")]
    pub course_name: String,
    #[serde(rename = "CourseTeacher")]
    pub course_teacher: String,
    #[serde(rename = "Dimension")]
    pub dimension: String,
    #[serde(rename = "CourseNotes")]
    pub course_notes: String,
    #[serde(rename = "ForeignLanguage")]
    pub foreign_language: i32,
    #[serde(rename = "OnlyGeneral")]
    pub only_general: i32,
    #[serde(rename = "OnleyNTUST")]
    pub only_ntust: i32,
    #[serde(rename = "OnlyMaster")]
    pub only_master: i32,
    #[serde(rename = "OnlyUnderGraduate")]
    pub only_undergraduate: i32,
    #[serde(rename = "OnlyNode")]
    pub only_node: i32,
    #[serde(rename = "Language")]
    pub language: String,
}

impl QueryCoursesRequest {
    /// Unrestricted snapshot query for one semester. The teacher filter is a
    /// single space, not an empty string; that is the upstream's "any
    /// teacher" spelling.
    pub fn unrestricted(semester: &str) -> Self {
        Self {
            semester: semester.to_string(),
            course_no: String::new(),
            course_name: String::new(),
            course_teacher: " ".to_string(),
            dimension: String::new(),
            course_notes: String::new(),
            foreign_language: 0,
            only_general: 0,
            only_ntust: 0,
            only_master: 0,
            only_undergraduate: 0,
            only_node: 0,
            language: "zh".to_string(),
        }
    }
}

/// Decodes a catalog response body into course records.
///
/// The body must be a JSON array. Individual records that fail to map are
/// logged and dropped so one malformed entry cannot discard the batch.
pub fn decode_courses(body: &str) -> Result<Vec<Course>, AppError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| AppError::Catalog(format!("unexpected catalog response shape: {e}")))?;

    let mut courses = Vec::with_capacity(raw.len());
    for record in raw {
        match decode_course(record) {
            Ok(course) => courses.push(course),
            Err(e) => {
                warn!("skipping malformed course record: {e}");
            }
        }
    }
    Ok(courses)
}

fn decode_course(record: serde_json::Value) -> Result<Course, AppError> {
    let course: Course = serde_json::from_value(record)
        .map_err(|e| AppError::Catalog(format!("course record has unexpected fields: {e}")))?;

    if course.course_no.trim().is_empty() {
        return Err(AppError::Catalog("course record has no CourseNo".to_string()));
    }

    Ok(course)
}
